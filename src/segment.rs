use crate::error::LinkError;
use crate::point::Point;

/*------------------------------------------------------------------------------
TrackSegment struct
------------------------------------------------------------------------------*/

/// A maximal gap-free run of linked points, strictly increasing in frame.
/// Segments are the source/target elements of the gap-closing, merging and
/// splitting passes, where linking operates above the single-frame level.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSegment {
    points: Vec<Point>,
}

impl TrackSegment {
    /// Validates frame monotonicity and gap-freeness.
    pub fn new(points: Vec<Point>) -> Result<Self, LinkError> {
        if points.is_empty() {
            return Err(LinkError::EmptyInput(
                "a track segment needs at least one point".to_string(),
            ));
        }
        for w in points.windows(2) {
            if w[1].frame() != w[0].frame() + 1 {
                return Err(LinkError::BadEntry(format!(
                    "segment frames must be consecutive, got {} then {}",
                    w[0].frame(),
                    w[1].frame()
                )));
            }
        }
        Ok(Self { points })
    }

    #[inline(always)]
    pub fn first(&self) -> &Point {
        &self.points[0]
    }

    #[inline(always)]
    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
