//! 2D line segment type.

use super::{Point2, Vec2};
use num_traits::Float;

/// A ring edge: a line segment between two consecutive vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    #[inline]
    pub fn length_squared(self) -> F {
        self.start.distance_squared(self.end)
    }

    #[inline]
    pub fn length(self) -> F {
        self.start.distance(self.end)
    }

    #[inline]
    pub fn midpoint(self) -> Point2<F> {
        self.start.midpoint(self.end)
    }

    /// Returns the point at parameter `t` along the segment.
    ///
    /// Values outside [0, 1] extrapolate beyond the segment.
    #[inline]
    pub fn point_at(self, t: F) -> Point2<F> {
        self.start.lerp(self.end, t)
    }

    /// Computes the closest point on the segment to the given point.
    ///
    /// Returns a tuple of (closest_point, parameter_t) where t is in [0, 1].
    pub fn closest_point(self, p: Point2<F>) -> (Point2<F>, F) {
        let v = self.direction();
        let len_sq = v.magnitude_squared();

        if len_sq <= F::epsilon() {
            return (self.start, F::zero());
        }

        let t = (p - self.start).dot(v) / len_sq;
        let t_clamped = t.max(F::zero()).min(F::one());

        (self.point_at(t_clamped), t_clamped)
    }

    #[inline]
    pub fn distance_squared_to_point(self, p: Point2<F>) -> F {
        let (closest, _) = self.closest_point(p);
        p.distance_squared(closest)
    }

    #[inline]
    pub fn distance_to_point(self, p: Point2<F>) -> F {
        self.distance_squared_to_point(p).sqrt()
    }

    /// Distance from `p` to the infinite line through this segment.
    ///
    /// Falls back to the distance to `start` when the segment is degenerate.
    pub fn distance_to_line(self, p: Point2<F>) -> F {
        let v = self.direction();
        let len = v.magnitude();
        if len <= F::epsilon() {
            return self.start.distance(p);
        }
        v.cross(p - self.start).abs() / len
    }

    /// Returns `true` if the segment is shorter than `eps`.
    #[inline]
    pub fn is_degenerate(self, eps: F) -> bool {
        self.length_squared() <= eps * eps
    }
}

impl<F: Float> From<(Point2<F>, Point2<F>)> for Segment2<F> {
    fn from((start, end): (Point2<F>, Point2<F>)) -> Self {
        Self::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment2<f64> {
        Segment2::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn test_closest_point_clamps() {
        let s = seg(0.0, 0.0, 10.0, 0.0);

        let (c, t) = s.closest_point(Point2::new(5.0, 5.0));
        assert_relative_eq!(c.x, 5.0, epsilon = 1e-10);
        assert_relative_eq!(t, 0.5, epsilon = 1e-10);

        let (c, t) = s.closest_point(Point2::new(-5.0, 0.0));
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(t, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_distance_to_line_vs_segment() {
        let s = seg(0.0, 0.0, 1.0, 0.0);
        let p = Point2::new(5.0, 0.0);
        assert_relative_eq!(s.distance_to_line(p), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.distance_to_point(p), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_segment() {
        let s = seg(5.0, 5.0, 5.0, 5.0);
        assert!(s.is_degenerate(1e-10));
        assert_relative_eq!(s.distance_to_line(Point2::new(8.0, 9.0)), 5.0, epsilon = 1e-12);
        assert!(!seg(0.0, 0.0, 1.0, 0.0).is_degenerate(1e-10));
    }
}
