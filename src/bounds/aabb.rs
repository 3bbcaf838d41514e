//! Axis-aligned bounding rectangle of a ring.

use crate::primitives::Point2;
use num_traits::Float;

/// A 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2<F> {
    /// Minimum corner (smallest x and y values).
    pub min: Point2<F>,
    /// Maximum corner (largest x and y values).
    pub max: Point2<F>,
}

impl<F: Float> Aabb2<F> {
    /// Creates a new AABB from min and max corners.
    ///
    /// Does not validate that min <= max.
    #[inline]
    pub fn new(min: Point2<F>, max: Point2<F>) -> Self {
        Self { min, max }
    }

    /// Creates an AABB containing a single point.
    #[inline]
    pub fn from_point(p: Point2<F>) -> Self {
        Self { min: p, max: p }
    }

    /// Creates an AABB from an iterator of points.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2<F>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        let mut aabb = Self::from_point(first);
        for p in iter {
            aabb.add_point(p);
        }
        Some(aabb)
    }

    #[inline]
    pub fn width(self) -> F {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> F {
        self.max.y - self.min.y
    }

    /// Length of the shorter side.
    #[inline]
    pub fn min_extent(self) -> F {
        self.width().min(self.height())
    }

    #[inline]
    pub fn center(self) -> Point2<F> {
        self.min.midpoint(self.max)
    }

    /// Grows the box in place so it includes `p`.
    #[inline]
    pub fn add_point(&mut self, p: Point2<F>) {
        self.min = Point2::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Point2::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    /// Returns `true` if this AABB contains the given point, boundary included.
    #[inline]
    pub fn contains_point(self, p: Point2<F>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns `true` if `other` lies entirely inside this box, boundary included.
    #[inline]
    pub fn contains_aabb(self, other: Self) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Returns `true` if this AABB intersects another AABB (touching counts).
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = vec![
            Point2::new(1.0, 2.0),
            Point2::new(-3.0, 5.0),
            Point2::new(4.0, -1.0),
        ];
        let aabb: Aabb2<f64> = Aabb2::from_points(points).unwrap();
        assert_eq!(aabb.min, Point2::new(-3.0, -1.0));
        assert_eq!(aabb.max, Point2::new(4.0, 5.0));
        assert_eq!(aabb.width(), 7.0);
        assert_eq!(aabb.height(), 6.0);
        assert_eq!(aabb.min_extent(), 6.0);
    }

    #[test]
    fn test_from_points_empty() {
        let points: Vec<Point2<f64>> = vec![];
        assert!(Aabb2::from_points(points).is_none());
    }

    #[test]
    fn test_add_point() {
        let mut aabb: Aabb2<f64> = Aabb2::from_point(Point2::new(1.0, 1.0));
        aabb.add_point(Point2::new(-1.0, 3.0));
        assert_eq!(aabb.min, Point2::new(-1.0, 1.0));
        assert_eq!(aabb.max, Point2::new(1.0, 3.0));
        assert_eq!(aabb.center(), Point2::new(0.0, 2.0));
    }

    #[test]
    fn test_contains() {
        let aabb: Aabb2<f64> = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));

        assert!(aabb.contains_point(Point2::new(5.0, 5.0)));
        assert!(aabb.contains_point(Point2::new(10.0, 10.0)));
        assert!(!aabb.contains_point(Point2::new(-1.0, 5.0)));

        let inner = Aabb2::new(Point2::new(2.0, 2.0), Point2::new(3.0, 3.0));
        assert!(aabb.contains_aabb(inner));
        assert!(!inner.contains_aabb(aabb));
    }

    #[test]
    fn test_intersects() {
        let a: Aabb2<f64> = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let b = Aabb2::new(Point2::new(5.0, 5.0), Point2::new(15.0, 15.0));
        let c = Aabb2::new(Point2::new(20.0, 20.0), Point2::new(30.0, 30.0));
        let touching = Aabb2::new(Point2::new(10.0, 0.0), Point2::new(12.0, 1.0));

        assert!(a.intersects(b));
        assert!(b.intersects(a));
        assert!(!a.intersects(c));
        assert!(a.intersects(touching));
    }
}
