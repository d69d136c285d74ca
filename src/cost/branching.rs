use serde::{Deserialize, Serialize};

use crate::cost::CostFunction;
use crate::point::{Point, FEATURE_MEAN_INTENSITY};
use crate::segment::TrackSegment;

/*------------------------------------------------------------------------------
BranchingCost (merge / split events)
------------------------------------------------------------------------------*/

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchingCostConfig {
    /// Largest allowed frame gap between the segment end and the branch
    /// point. The classical setting is 1: the branch point sits in the
    /// frame right after the segment ends.
    pub max_frame_gap: usize,
    /// Gating radius in calibrated units.
    pub max_distance: f64,
    /// Intensity-ratio window; a ratio outside `[ratio_min, ratio_max]`
    /// is physically implausible and gated out.
    pub ratio_min: f64,
    pub ratio_max: f64,
    /// Feature holding the representative intensity of a point.
    pub intensity_feature: String,
}

impl Default for BranchingCostConfig {
    fn default() -> Self {
        Self {
            max_frame_gap: 1,
            max_distance: f64::MAX,
            ratio_min: 0.0,
            ratio_max: f64::MAX,
            intensity_feature: FEATURE_MEAN_INTENSITY.to_string(),
        }
    }
}

/// A candidate branch point: the point inside another track where a
/// merge (or split, looking backwards in time) may attach, together with
/// the intensity of its sibling, the point the branch track carries at the
/// other side of the event.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchCandidate {
    pub middle: Point,
    pub sibling_intensity: f64,
}

/// Cost of attaching a track segment's terminal point to a branch point.
///
/// With `d` the distance between the two points and
/// `p = I_middle / (I_sibling + I_end)` the intensity ratio, the cost is
/// `d^2 * p` when `p >= 1` and `d^2 / p^2` otherwise: a ratio consistent
/// with mass conservation is cheap, one far from 1 in either direction is
/// penalized nonlinearly, and implausible ratios are gated out.
#[derive(Debug, Clone)]
pub struct BranchingCost {
    config: BranchingCostConfig,
}

impl BranchingCost {
    pub fn new(config: BranchingCostConfig) -> Self {
        Self { config }
    }
}

impl CostFunction<TrackSegment, BranchCandidate> for BranchingCost {
    fn cost(
        &self,
        source: &TrackSegment,
        target: &BranchCandidate,
    ) -> Option<f64> {
        let end = source.last();
        let middle = &target.middle;

        // Gates come first, so the ratio formula never sees a division by
        // zero or an out-of-window ratio.
        if middle.frame() < end.frame()
            || middle.frame() - end.frame() > self.config.max_frame_gap
        {
            return None;
        }

        let d2 = end.squared_distance_to(middle);
        let r2 = self.config.max_distance * self.config.max_distance;
        if !d2.is_finite() || d2 > r2 {
            return None;
        }

        let i_end = end.feature(&self.config.intensity_feature)?;
        let i_middle = middle.feature(&self.config.intensity_feature)?;
        let p = i_middle / (target.sibling_intensity + i_end);
        if !p.is_finite() || p < self.config.ratio_min || p > self.config.ratio_max
        {
            return None;
        }

        let cost = if p >= 1.0 { d2 * p } else { d2 / (p * p) };
        if cost.is_finite() {
            Some(cost)
        } else {
            None
        }
    }
}
