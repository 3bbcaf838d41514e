//! Geometric predicates with explicit tolerance.
//!
//! Every tolerance here is a *distance*, so callers can pass a ring epsilon
//! straight through and keep the tests scale-invariant.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;
use std::f64::consts::PI;

use super::config::lit;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `c` is to the left of `a -> b`.
    CounterClockwise,
    /// `c` is to the right of `a -> b`.
    Clockwise,
    /// `c` lies within tolerance of the line through `a` and `b`.
    Collinear,
}

/// Orientation of `c` relative to the directed line `a -> b`.
///
/// `eps` is the distance from `c` to that line below which the three points
/// count as collinear.
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let ab = b - a;
    let cross = ab.cross(c - a);
    let threshold = eps * ab.magnitude();

    if cross > threshold {
        Orientation::CounterClockwise
    } else if cross < -threshold {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns `true` if `b` lies within `eps` of the line through `a` and `c`.
///
/// A spike that folds straight back (`a` within `eps` of `c`) is collinear too.
#[inline]
pub fn is_collinear<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> bool {
    if a.approx_eq(c, eps) {
        return true;
    }
    Segment2::new(a, c).distance_to_line(b) <= eps
}

/// Checks if a point lies within `eps` of a segment.
#[inline]
pub fn point_on_segment<F: Float>(p: Point2<F>, segment: Segment2<F>, eps: F) -> bool {
    segment.distance_squared_to_point(p) <= eps * eps
}

/// Result of a segment intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<F> {
    /// Segments do not intersect.
    None,
    /// Segments meet at a single point.
    Point {
        /// The intersection point.
        point: Point2<F>,
        /// Parameter along first segment (0 = start, 1 = end).
        t1: F,
        /// Parameter along second segment (0 = start, 1 = end).
        t2: F,
    },
    /// Segments are collinear and share a stretch of positive length.
    Overlapping {
        /// Start of the shared stretch, ordered along the first segment.
        start: Point2<F>,
        /// End of the shared stretch, ordered along the first segment.
        end: Point2<F>,
    },
}

impl<F: Float> SegmentIntersection<F> {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, SegmentIntersection::None)
    }
}

/// Tests if two line segments intersect, with a distance tolerance.
///
/// Endpoint contacts are reported as `Point` with a parameter of 0 or 1.
pub fn segments_intersect<F: Float>(
    s1: Segment2<F>,
    s2: Segment2<F>,
    eps: F,
) -> SegmentIntersection<F> {
    let d1 = s1.direction();
    let d2 = s2.direction();
    let len1 = d1.magnitude();
    let len2 = d2.magnitude();

    if len1 <= eps || len2 <= eps {
        return degenerate_intersection(s1, s2, eps);
    }

    let cross = d1.cross(d2);

    // Lateral drift of the shorter segment relative to the other's direction.
    if (cross / (len1 * len2)).abs() * len1.min(len2) <= eps {
        return collinear_intersection(s1, s2, eps);
    }

    let d = s2.start - s1.start;
    let t1 = d.cross(d2) / cross;
    let t2 = d.cross(d1) / cross;

    let slack1 = eps / len1;
    let slack2 = eps / len2;
    let within = |t: F, slack: F| t >= -slack && t <= F::one() + slack;

    if within(t1, slack1) && within(t2, slack2) {
        let t1 = t1.max(F::zero()).min(F::one());
        let t2 = t2.max(F::zero()).min(F::one());
        SegmentIntersection::Point {
            point: s1.point_at(t1),
            t1,
            t2,
        }
    } else {
        SegmentIntersection::None
    }
}

fn degenerate_intersection<F: Float>(
    s1: Segment2<F>,
    s2: Segment2<F>,
    eps: F,
) -> SegmentIntersection<F> {
    if s1.is_degenerate(eps) {
        if point_on_segment(s1.start, s2, eps) {
            let (_, t2) = s2.closest_point(s1.start);
            return SegmentIntersection::Point {
                point: s1.start,
                t1: F::zero(),
                t2,
            };
        }
    } else if point_on_segment(s2.start, s1, eps) {
        let (point, t1) = s1.closest_point(s2.start);
        return SegmentIntersection::Point {
            point,
            t1,
            t2: F::zero(),
        };
    }
    SegmentIntersection::None
}

fn collinear_intersection<F: Float>(
    s1: Segment2<F>,
    s2: Segment2<F>,
    eps: F,
) -> SegmentIntersection<F> {
    if s1.distance_to_line(s2.start) > eps && s1.distance_to_line(s2.end) > eps {
        return SegmentIntersection::None;
    }

    let d1 = s1.direction();
    let len_sq = d1.magnitude_squared();
    let len = len_sq.sqrt();

    let ta = (s2.start - s1.start).dot(d1) / len_sq;
    let tb = (s2.end - s1.start).dot(d1) / len_sq;
    let (lo, hi) = if ta <= tb { (ta, tb) } else { (tb, ta) };

    let from = lo.max(F::zero());
    let to = hi.min(F::one());

    if (from - to) * len > eps {
        return SegmentIntersection::None;
    }

    if (to - from) * len <= eps {
        let point = s1.point_at(from);
        let (_, t2) = s2.closest_point(point);
        return SegmentIntersection::Point { point, t1: from, t2 };
    }

    SegmentIntersection::Overlapping {
        start: s1.point_at(from),
        end: s1.point_at(to),
    }
}

/// Where a point lies relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    /// Within tolerance of one of the ring's edges.
    Boundary,
}

/// Sum of the signed turn angles subtended at `p` by every ring edge.
///
/// Approximately `±2π` for points inside, `0` for points outside.
pub fn winding_angle_sum<F: Float>(ring: &[Point2<F>], p: Point2<F>) -> F {
    let n = ring.len();
    let mut sum = F::zero();
    for i in 0..n {
        let a = ring[i] - p;
        let b = ring[(i + 1) % n] - p;
        sum = sum + a.signed_angle_to(b);
    }
    sum
}

/// Classifies `p` against the ring by angle sum, with an `eps` boundary band.
pub fn classify_point<F: Float>(ring: &[Point2<F>], p: Point2<F>, eps: F) -> Containment {
    let n = ring.len();
    if n < 3 {
        return Containment::Outside;
    }

    let on_edge = (0..n).any(|i| point_on_segment(p, Segment2::new(ring[i], ring[(i + 1) % n]), eps));
    if on_edge {
        return Containment::Boundary;
    }

    if winding_angle_sum(ring, p).abs() > lit(PI) {
        Containment::Inside
    } else {
        Containment::Outside
    }
}
