use nalgebra::Point3;
use std::collections::HashMap;

/*------------------------------------------------------------------------------
Point struct
------------------------------------------------------------------------------*/

pub const FEATURE_FRAME: &str = "frame";
pub const FEATURE_MEAN_INTENSITY: &str = "mean_intensity";

/// A detection: an identity, a calibrated spatial position (unused
/// dimensions stay at zero), a frame index and named scalar features.
///
/// Points are produced by detection upstream and only read here; there is
/// no mutating API besides [`Point::with_feature`] at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    id: u64,
    position: Point3<f64>,
    frame: usize,
    features: HashMap<String, f64>,
}

impl Point {
    pub fn new(id: u64, position: Point3<f64>, frame: usize) -> Self {
        let mut features = HashMap::new();
        features.insert(FEATURE_FRAME.to_string(), frame as f64);
        Self {
            id,
            position,
            frame,
            features,
        }
    }

    /// 2D convenience constructor, z = 0.
    pub fn new_2d(id: u64, x: f64, y: f64, frame: usize) -> Self {
        Self::new(id, Point3::new(x, y, 0.0), frame)
    }

    /// Builder-style feature attachment, used while assembling a point
    /// from detection output.
    pub fn with_feature(mut self, name: &str, value: f64) -> Self {
        self.features.insert(name.to_string(), value);
        self
    }

    #[inline(always)]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline(always)]
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    #[inline(always)]
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }

    pub fn squared_distance_to(&self, other: &Point) -> f64 {
        (self.position - other.position).norm_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearly_eq::assert_nearly_eq;

    #[test]
    fn test_frame_feature_is_set() {
        let p = Point::new_2d(1, 0.0, 0.0, 7);
        assert_nearly_eq!(p.feature(FEATURE_FRAME).unwrap(), 7.0);
    }

    #[test]
    fn test_squared_distance() {
        let a = Point::new_2d(1, 0.0, 0.0, 0);
        let b = Point::new_2d(2, 3.0, 4.0, 1);
        assert_nearly_eq!(a.squared_distance_to(&b), 25.0);
    }

    #[test]
    fn test_with_feature() {
        let p = Point::new_2d(1, 0.0, 0.0, 0)
            .with_feature(FEATURE_MEAN_INTENSITY, 120.5);
        assert_nearly_eq!(p.feature(FEATURE_MEAN_INTENSITY).unwrap(), 120.5);
        assert!(p.feature("no_such_feature").is_none());
    }
}
