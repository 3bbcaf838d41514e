//! Tolerance configuration shared by every ring.

use crate::bounds::Aabb2;
use num_traits::Float;

/// Floor applied to every ring epsilon, whatever the ring's size.
pub const GLOBAL_MIN_EPSILON: f64 = 1e-6;

/// Explicit tolerances used to derive a ring's epsilon and angular limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// Factor applied to the shorter bounding-box side.
    pub relative_epsilon: f64,
    /// Lower bound of the derived epsilon.
    pub min_epsilon: f64,
    /// Smallest allowed angle between two adjacent edges, in radians.
    pub min_adjacent_angle: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            relative_epsilon: 1e-3,
            min_epsilon: GLOBAL_MIN_EPSILON,
            min_adjacent_angle: 1e-3,
        }
    }
}

impl Tolerances {
    /// `max(min(width, height) * relative_epsilon, min_epsilon)`.
    ///
    /// An empty ring (no bounds) gets the floor.
    pub fn ring_epsilon<F: Float>(&self, bounds: Option<Aabb2<F>>) -> F {
        let floor = lit::<F>(self.min_epsilon);
        match bounds {
            Some(b) => (b.min_extent() * lit(self.relative_epsilon)).max(floor),
            None => floor,
        }
    }

    #[inline]
    pub fn min_angle<F: Float>(&self) -> F {
        lit(self.min_adjacent_angle)
    }
}

/// Converts an `f64` constant into `F`.
///
/// Every `f64` literal used by this crate is representable in `f32` and `f64`.
#[inline]
pub(crate) fn lit<F: Float>(v: f64) -> F {
    F::from(v).unwrap_or_else(F::nan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;
    use approx::assert_relative_eq;

    #[test]
    fn test_ring_epsilon_scales_with_short_side() {
        let t = Tolerances::default();
        let b = Aabb2::new(Point2::new(0.0_f64, 0.0), Point2::new(100.0, 4.0));
        assert_relative_eq!(t.ring_epsilon(Some(b)), 0.004, epsilon = 1e-15);
    }

    #[test]
    fn test_ring_epsilon_floor() {
        let t = Tolerances::default();
        let tiny = Aabb2::new(Point2::new(0.0_f64, 0.0), Point2::new(1e-6, 1e-6));
        assert_eq!(t.ring_epsilon(Some(tiny)), GLOBAL_MIN_EPSILON);
        assert_eq!(t.ring_epsilon::<f64>(None), GLOBAL_MIN_EPSILON);
    }
}
