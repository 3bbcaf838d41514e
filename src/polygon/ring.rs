//! The winding-aware point ring every other algorithm builds on.

use crate::bounds::Aabb2;
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{classify_point, lit, Containment, Tolerances};
use num_traits::Float;

/// Rotational direction in which a ring lists its vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingOrder {
    /// Negative signed area.
    Clockwise,
    /// Positive signed area.
    AntiClockwise,
    /// Not determinable (fewer than three vertices or zero area).
    Unknown,
}

impl WindingOrder {
    /// The reverse direction. `Unknown` stays `Unknown`.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            WindingOrder::Clockwise => WindingOrder::AntiClockwise,
            WindingOrder::AntiClockwise => WindingOrder::Clockwise,
            WindingOrder::Unknown => WindingOrder::Unknown,
        }
    }
}

/// An ordered, implicitly closed sequence of points.
///
/// The ring keeps its bounding box, its winding order and a size-derived
/// epsilon current across every mutation. All tolerance-sensitive tests on
/// the ring use that epsilon rather than a global constant.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRing<F> {
    points: Vec<Point2<F>>,
    bounds: Option<Aabb2<F>>,
    winding: WindingOrder,
    // Order requested while the points could not yet tell their own.
    pending_winding: Option<WindingOrder>,
    epsilon: F,
    tolerances: Tolerances,
}

impl<F: Float> Default for PointRing<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> PointRing<F> {
    /// Creates an empty ring with default tolerances.
    pub fn new() -> Self {
        Self::with_tolerances(Tolerances::default())
    }

    /// Creates an empty ring that derives its epsilon from `tolerances`.
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self {
            points: Vec::new(),
            bounds: None,
            winding: WindingOrder::Unknown,
            pending_winding: None,
            epsilon: tolerances.ring_epsilon(None),
            tolerances,
        }
    }

    /// Creates a ring from points in boundary order.
    pub fn from_points(points: Vec<Point2<F>>) -> Self {
        Self::from_points_with(points, Tolerances::default())
    }

    /// Creates a ring from points in boundary order with explicit tolerances.
    pub fn from_points_with(points: Vec<Point2<F>>, tolerances: Tolerances) -> Self {
        let mut ring = Self::with_tolerances(tolerances);
        ring.points = points;
        ring.refresh();
        ring
    }

    /// An empty ring sharing this ring's tolerances.
    pub fn empty_like(&self) -> Self {
        Self::with_tolerances(self.tolerances)
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when the ring has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The vertices in boundary order.
    #[inline]
    pub fn points(&self) -> &[Point2<F>] {
        &self.points
    }

    /// The vertex at `index`. Panics when out of range.
    #[inline]
    pub fn point(&self, index: usize) -> Point2<F> {
        self.points[index]
    }

    /// Size-derived tolerance: `max(min(width, height) * relative, minimum)`.
    #[inline]
    pub fn epsilon(&self) -> F {
        self.epsilon
    }

    /// Bounding box of the vertices, `None` while the ring is empty.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb2<F>> {
        self.bounds
    }

    /// Tolerances the epsilon is derived from.
    #[inline]
    pub fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    /// The current winding tag.
    #[inline]
    pub fn winding_order(&self) -> WindingOrder {
        self.winding
    }

    /// Appends a point at the end of the boundary.
    pub fn push(&mut self, p: Point2<F>) {
        self.points.push(p);
        self.refresh();
    }

    /// Inserts a point so that it ends up at `index`.
    pub fn insert(&mut self, index: usize, p: Point2<F>) {
        self.points.insert(index, p);
        self.refresh();
    }

    /// Removes and returns the point at `index`.
    pub fn remove(&mut self, index: usize) -> Point2<F> {
        let p = self.points.remove(index);
        self.refresh();
        p
    }

    /// Moves the point at `index` to `p`.
    pub fn set_point(&mut self, index: usize, p: Point2<F>) {
        self.points[index] = p;
        self.refresh();
    }

    /// Removes every point. The winding tag is kept.
    pub fn clear(&mut self) {
        self.points.clear();
        self.refresh();
    }

    /// Replaces all points at once, recomputing derived state a single time.
    pub(crate) fn replace_points(&mut self, points: Vec<Point2<F>>) {
        self.points = points;
        self.refresh();
    }

    /// Requests a winding order, reversing the points in place when the ring
    /// currently runs the other way.
    ///
    /// While the points are too few or too flat to have an orientation the
    /// request is held, and applied by reversal as soon as a later mutation
    /// gives the ring a measurable order. Requesting `Unknown` is a no-op.
    pub fn set_winding_order(&mut self, order: WindingOrder) {
        if order == WindingOrder::Unknown {
            return;
        }
        match self.measured_winding() {
            WindingOrder::Unknown => self.pending_winding = Some(order),
            measured => {
                if measured != order {
                    self.points.reverse();
                }
                self.pending_winding = None;
            }
        }
        self.winding = order;
    }

    /// Returns a copy with the opposite vertex order.
    pub fn reversed(&self) -> Self {
        let mut ring = self.clone();
        ring.points.reverse();
        ring.winding = ring.winding.opposite();
        ring.pending_winding = ring.pending_winding.map(WindingOrder::opposite);
        ring
    }

    /// Index after `index`, wrapping to 0.
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.points.len() {
            0
        } else {
            index + 1
        }
    }

    /// Index before `index`, wrapping to the last vertex.
    #[inline]
    pub fn previous_index(&self, index: usize) -> usize {
        if index == 0 {
            self.points.len().saturating_sub(1)
        } else {
            index - 1
        }
    }

    /// The edge leaving vertex `index`.
    #[inline]
    pub fn edge(&self, index: usize) -> Segment2<F> {
        Segment2::new(self.points[index], self.points[self.next_index(index)])
    }

    /// Iterates over all edges in boundary order.
    pub fn edges(&self) -> impl Iterator<Item = Segment2<F>> + '_ {
        (0..self.points.len()).map(move |i| self.edge(i))
    }

    /// Signed area by the shoelace formula. Positive for anticlockwise rings.
    pub fn signed_area(&self) -> F {
        signed_area(&self.points)
    }

    /// Unsigned enclosed area.
    pub fn area(&self) -> F {
        self.signed_area().abs()
    }

    /// Total length of the closed boundary.
    pub fn perimeter(&self) -> F {
        if self.points.len() < 2 {
            return F::zero();
        }
        self.edges().fold(F::zero(), |acc, e| acc + e.length())
    }

    /// Area-weighted centroid over a triangle fan rooted at the first vertex.
    ///
    /// Returns `None` for fewer than three vertices or a zero-area ring.
    pub fn centroid(&self) -> Option<Point2<F>> {
        let n = self.points.len();
        if n < 3 {
            return None;
        }

        let origin = self.points[0];
        let three = lit::<F>(3.0);
        let mut total = F::zero();
        let mut cx = F::zero();
        let mut cy = F::zero();

        for i in 1..n - 1 {
            let a = self.points[i];
            let b = self.points[i + 1];
            let w = (a - origin).cross(b - origin) / lit(2.0);
            total = total + w;
            cx = cx + w * (origin.x + a.x + b.x) / three;
            cy = cy + w * (origin.y + a.y + b.y) / three;
        }

        if total.abs() <= self.epsilon * self.epsilon {
            return None;
        }
        Some(Point2::new(cx / total, cy / total))
    }

    /// Classifies `p` with the angle-sum test, using this ring's epsilon as
    /// the boundary band.
    pub fn classify_point(&self, p: Point2<F>) -> Containment {
        classify_point(&self.points, p, self.epsilon)
    }

    /// `true` for points inside or on the boundary.
    pub fn contains_point(&self, p: Point2<F>) -> bool {
        self.classify_point(p) != Containment::Outside
    }

    /// `true` when every vertex of `other` lies inside or on this ring.
    pub fn contains_ring(&self, other: &PointRing<F>) -> bool {
        !other.is_empty() && other.points.iter().all(|&p| self.contains_point(p))
    }

    /// `true` when both rings have bounds and those bounds touch or overlap.
    pub fn bounds_intersect(&self, other: &PointRing<F>) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => a.intersects(b),
            _ => false,
        }
    }

    /// Index of the first vertex within `eps` of `p`.
    pub fn find_point(&self, p: Point2<F>, eps: F) -> Option<usize> {
        self.points.iter().position(|q| q.approx_eq(p, eps))
    }

    fn refresh(&mut self) {
        self.bounds = Aabb2::from_points(self.points.iter().copied());
        self.epsilon = self.tolerances.ring_epsilon(self.bounds);

        let measured = self.measured_winding();
        if measured == WindingOrder::Unknown {
            return;
        }
        match self.pending_winding.take() {
            Some(requested) => {
                if requested != measured {
                    self.points.reverse();
                }
                self.winding = requested;
            }
            None => self.winding = measured,
        }
    }

    /// Orientation read off the signed area, `Unknown` within `epsilon²` of zero.
    fn measured_winding(&self) -> WindingOrder {
        let area = signed_area(&self.points);
        let floor = self.epsilon * self.epsilon;
        if area > floor {
            WindingOrder::AntiClockwise
        } else if area < -floor {
            WindingOrder::Clockwise
        } else {
            WindingOrder::Unknown
        }
    }
}

impl<F: Float> From<Vec<Point2<F>>> for PointRing<F> {
    fn from(points: Vec<Point2<F>>) -> Self {
        Self::from_points(points)
    }
}

/// Shoelace signed area of a closed point sequence.
pub(crate) fn signed_area<F: Float>(points: &[Point2<F>]) -> F {
    let n = points.len();
    if n < 3 {
        return F::zero();
    }

    let mut twice = F::zero();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice = twice + a.x * b.y - b.x * a.y;
    }
    twice / lit(2.0)
}
