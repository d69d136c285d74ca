use serde::{Deserialize, Serialize};

use crate::cost::CostFunction;
use crate::point::Point;

/*------------------------------------------------------------------------------
SquareDistanceCost
------------------------------------------------------------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceCostConfig {
    /// Gating radius in calibrated units. A pair further apart than this
    /// is forbidden; the boundary itself still links.
    pub max_distance: f64,
}

/// Frame-to-frame linking cost: squared Euclidean distance between the two
/// positions, gated by `max_distance`.
#[derive(Debug, Clone, Copy)]
pub struct SquareDistanceCost {
    config: DistanceCostConfig,
}

impl SquareDistanceCost {
    pub fn new(config: DistanceCostConfig) -> Self {
        Self { config }
    }
}

impl CostFunction<Point, Point> for SquareDistanceCost {
    fn cost(&self, source: &Point, target: &Point) -> Option<f64> {
        let d2 = source.squared_distance_to(target);
        let r2 = self.config.max_distance * self.config.max_distance;
        if !d2.is_finite() || d2 > r2 {
            return None;
        }
        Some(d2)
    }
}
