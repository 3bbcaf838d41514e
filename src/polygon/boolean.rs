//! Polygon boolean operations by edge-intersection tracing.
//!
//! Both rings are normalised to anticlockwise order, every crossing between
//! them is spliced into both rings, and the result is traced by walking one
//! ring and hopping onto the other at shared vertices. Union and intersection
//! walk both rings forward; subtraction walks the subject forward and the clip
//! backward.
//!
//! # Example
//!
//! ```
//! use ringprep::polygon::{BooleanOpEngine, PointRing, PolyUnionError};
//! use ringprep::Point2;
//!
//! let a: PointRing<f64> = PointRing::from_points(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 4.0),
//!     Point2::new(0.0, 4.0),
//! ]);
//! let b: PointRing<f64> = PointRing::from_points(vec![
//!     Point2::new(2.0, 0.0),
//!     Point2::new(6.0, 0.0),
//!     Point2::new(6.0, 4.0),
//!     Point2::new(2.0, 4.0),
//! ]);
//!
//! let union = BooleanOpEngine::union(&a, &b).unwrap();
//! assert_eq!(union.status, PolyUnionError::None);
//! assert!((union.ring.area() - 24.0).abs() < 1e-9);
//! ```

use std::cmp::Ordering;
use std::ops::{BitOr, BitOrAssign};

use num_traits::Float;
use tracing::{debug, trace, warn};

use super::ring::{PointRing, WindingOrder};
use crate::error::GeometryError;
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{
    classify_point, point_on_segment, segments_intersect, Containment, SegmentIntersection,
};

/// Outcome status of a boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolyUnionError {
    /// The operation traced a result.
    #[default]
    None,
    /// The rings share no boundary point. The result is empty.
    NoIntersections,
    /// Every vertex of the first ring is inside or on the second.
    Poly1InsidePoly2,
    /// Tracing exceeded its step bound and was aborted. The result is empty.
    InfiniteLoop,
}

/// Set of operation kinds evaluated by [`BooleanOpEngine::run`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OpFlags(u8);

impl OpFlags {
    pub const NONE: Self = Self(0);
    pub const UNION: Self = Self(1);
    pub const INTERSECT: Self = Self(1 << 1);
    pub const SUBTRACT: Self = Self(1 << 2);

    /// The raw flag bits.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// `true` when every flag of `other` is set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` when no flag is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for OpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Debug for OpFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (Self::UNION, "UNION"),
            (Self::INTERSECT, "INTERSECT"),
            (Self::SUBTRACT, "SUBTRACT"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|&(_, name)| name)
        .collect();
        if names.is_empty() {
            write!(f, "OpFlags(NONE)")
        } else {
            write!(f, "OpFlags({})", names.join(" | "))
        }
    }
}

/// A single boolean operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Union,
    Intersect,
    Subtract,
}

/// Ring and direction the tracer is currently walking.
///
/// `A` is the first operand (the subject of a subtraction), `B` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    ForwardOnA,
    BackwardOnB,
    ForwardOnB,
    BackwardOnA,
}

impl TraceState {
    /// `true` while the tracer walks the first ring.
    #[inline]
    pub fn on_a(self) -> bool {
        matches!(self, TraceState::ForwardOnA | TraceState::BackwardOnA)
    }

    /// `true` when the tracer follows the ring's own vertex order.
    #[inline]
    pub fn is_forward(self) -> bool {
        matches!(self, TraceState::ForwardOnA | TraceState::ForwardOnB)
    }

    /// State after hopping to the other ring at a shared vertex.
    ///
    /// Union and intersection keep the direction. Subtraction reverses it.
    pub fn hop(self, op: Operation) -> Self {
        use TraceState::*;
        match (op, self) {
            (Operation::Subtract, ForwardOnA) => BackwardOnB,
            (Operation::Subtract, BackwardOnB) => ForwardOnA,
            (Operation::Subtract, ForwardOnB) => BackwardOnA,
            (Operation::Subtract, BackwardOnA) => ForwardOnB,
            (_, ForwardOnA) => ForwardOnB,
            (_, ForwardOnB) => ForwardOnA,
            (_, BackwardOnA) => BackwardOnB,
            (_, BackwardOnB) => BackwardOnA,
        }
    }
}

/// Position of a ring edge relative to the other ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    Inside,
    Outside,
    /// Lies on the other ring's boundary, running the same way.
    SharedSame,
    /// Lies on the other ring's boundary, running the opposite way.
    SharedOpposite,
}

impl EdgeClass {
    /// The class that makes a tracer in `state` hop onto this edge.
    fn hop_target(op: Operation, state: TraceState) -> Self {
        match op {
            Operation::Union => EdgeClass::Outside,
            Operation::Intersect => EdgeClass::Inside,
            Operation::Subtract if state.is_forward() => EdgeClass::Outside,
            Operation::Subtract => EdgeClass::Inside,
        }
    }

    /// `true` if a tracer in `state` may follow an edge of this class.
    fn accepted(self, op: Operation, state: TraceState) -> bool {
        let shared = match op {
            Operation::Union | Operation::Intersect => EdgeClass::SharedSame,
            Operation::Subtract => EdgeClass::SharedOpposite,
        };
        self == Self::hop_target(op, state) || self == shared
    }
}

/// A crossing between an edge of each input ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeIntersectInfo<F> {
    /// Edge of the first ring, as it was before splicing.
    pub edge_a: Segment2<F>,
    /// Edge of the second ring, as it was before splicing.
    pub edge_b: Segment2<F>,
    /// Index of `edge_a` in the normalised first ring.
    pub index_a: usize,
    /// Index of `edge_b` in the normalised second ring.
    pub index_b: usize,
    /// Canonical crossing point shared by both rings.
    pub point: Point2<F>,
}

/// Working state of one boolean-operation call.
///
/// Holds winding-normalised copies of both rings with every crossing spliced
/// in, the maps between coincident vertices, and the lazily filled edge
/// classification tables.
#[derive(Debug, Clone)]
pub struct OperationContext<F> {
    a: PointRing<F>,
    b: PointRing<F>,
    eps: F,
    intersections: Vec<EdgeIntersectInfo<F>>,
    twin_a: Vec<Option<usize>>,
    twin_b: Vec<Option<usize>>,
    class_a: Vec<Option<EdgeClass>>,
    class_b: Vec<Option<EdgeClass>>,
    start: Option<usize>,
    status: PolyUnionError,
}

impl<F: Float> OperationContext<F> {
    /// Normalises both rings, splices their crossings and locates the first
    /// vertex of `a` outside `b`.
    pub fn new(a: &PointRing<F>, b: &PointRing<F>) -> Result<Self, GeometryError> {
        for ring in [a, b] {
            if ring.len() < 3 {
                return Err(GeometryError::NotEnoughVertices { len: ring.len() });
            }
        }

        let mut a = a.clone();
        let mut b = b.clone();
        a.set_winding_order(WindingOrder::AntiClockwise);
        b.set_winding_order(WindingOrder::AntiClockwise);
        let eps = a.epsilon().min(b.epsilon());

        let intersections = find_intersections(&a, &b, eps);
        debug!(
            crossings = intersections.len(),
            len_a = a.len(),
            len_b = b.len(),
            "boolean operation setup"
        );

        let mut per_edge_a = vec![Vec::new(); a.len()];
        let mut per_edge_b = vec![Vec::new(); b.len()];
        for info in &intersections {
            per_edge_a[info.index_a].push((info.edge_a.closest_point(info.point).1, info.point));
            per_edge_b[info.index_b].push((info.edge_b.closest_point(info.point).1, info.point));
        }
        let spliced_a = splice(&a, per_edge_a, eps);
        let spliced_b = splice(&b, per_edge_b, eps);
        a.replace_points(spliced_a);
        b.replace_points(spliced_b);

        let twin_a: Vec<_> = a.points().iter().map(|&p| b.find_point(p, eps)).collect();
        let twin_b: Vec<_> = b.points().iter().map(|&p| a.find_point(p, eps)).collect();

        let mut ctx = Self {
            class_a: vec![None; a.len()],
            class_b: vec![None; b.len()],
            a,
            b,
            eps,
            intersections,
            twin_a,
            twin_b,
            start: None,
            status: PolyUnionError::None,
        };

        if ctx.intersections.is_empty() {
            ctx.status = PolyUnionError::NoIntersections;
            return Ok(ctx);
        }

        ctx.start = ctx
            .a
            .points()
            .iter()
            .position(|&p| classify_point(ctx.b.points(), p, eps) == Containment::Outside);
        if ctx.start.is_none() {
            ctx.status = PolyUnionError::Poly1InsidePoly2;
        }
        Ok(ctx)
    }

    /// The normalised, spliced first ring.
    pub fn first(&self) -> &PointRing<F> {
        &self.a
    }

    /// The normalised, spliced second ring.
    pub fn second(&self) -> &PointRing<F> {
        &self.b
    }

    /// Every boundary contact found between the two input rings.
    pub fn intersections(&self) -> &[EdgeIntersectInfo<F>] {
        &self.intersections
    }

    /// Tolerance used for every test in this call.
    pub fn epsilon(&self) -> F {
        self.eps
    }

    /// Status determined during setup.
    pub fn status(&self) -> PolyUnionError {
        self.status
    }

    /// Evaluates one operation over the prepared rings.
    pub fn evaluate(&mut self, op: Operation) -> (PointRing<F>, PolyUnionError) {
        match self.status {
            PolyUnionError::NoIntersections => return (self.a.empty_like(), self.status),
            PolyUnionError::Poly1InsidePoly2 => {
                let ring = match op {
                    Operation::Union => self.b.clone(),
                    Operation::Intersect => self.a.clone(),
                    Operation::Subtract => self.a.empty_like(),
                };
                return (ring, self.status);
            }
            _ => {}
        }

        let Some(outside) = self.start else {
            return (self.a.empty_like(), self.status);
        };
        let start = match op {
            Operation::Intersect => match self.intersect_start(outside) {
                Some(i) => i,
                None => return (self.a.empty_like(), PolyUnionError::None),
            },
            _ => outside,
        };

        self.trace(op, start)
    }

    fn trace(&mut self, op: Operation, start: usize) -> (PointRing<F>, PolyUnionError) {
        let bound = self.a.len() + self.b.len();
        let start_twin = self.twin_a[start];
        let mut state = TraceState::ForwardOnA;
        let mut index = start;
        let mut points = Vec::new();

        loop {
            points.push(self.ring(state).point(index));
            if points.len() > bound {
                warn!(?op, steps = points.len(), bound, "boolean trace did not close");
                return (self.a.empty_like(), PolyUnionError::InfiniteLoop);
            }

            if let Some(twin) = self.twin(state, index) {
                let hopped = state.hop(op);
                let current = self.continuation(state, index);
                let other = self.continuation(hopped, twin);
                let hop = other == EdgeClass::hop_target(op, hopped)
                    || (!current.accepted(op, state) && other.accepted(op, hopped));
                trace!(?state, index, ?current, ?other, hop, "shared vertex");
                if hop {
                    state = hopped;
                    index = twin;
                }
            }

            index = self.advance(state, index);
            let closed = if state.on_a() {
                index == start
            } else {
                Some(index) == start_twin
            };
            if closed {
                break;
            }
        }

        (
            PointRing::from_points_with(points, self.a.tolerances()),
            PolyUnionError::None,
        )
    }

    /// First shared vertex after `outside` from which an intersection
    /// boundary can be followed.
    fn intersect_start(&mut self, outside: usize) -> Option<usize> {
        let n = self.a.len();
        let state = TraceState::ForwardOnA;
        let hopped = state.hop(Operation::Intersect);
        (1..=n).map(|k| (outside + k) % n).find(|&i| match self.twin_a[i] {
            Some(twin) => {
                self.continuation(state, i).accepted(Operation::Intersect, state)
                    || self.continuation(hopped, twin).accepted(Operation::Intersect, hopped)
            }
            None => false,
        })
    }

    fn ring(&self, state: TraceState) -> &PointRing<F> {
        if state.on_a() {
            &self.a
        } else {
            &self.b
        }
    }

    fn twin(&self, state: TraceState, index: usize) -> Option<usize> {
        if state.on_a() {
            self.twin_a[index]
        } else {
            self.twin_b[index]
        }
    }

    fn advance(&self, state: TraceState, index: usize) -> usize {
        let ring = self.ring(state);
        if state.is_forward() {
            ring.next_index(index)
        } else {
            ring.previous_index(index)
        }
    }

    /// Class of the edge a tracer in `state` would follow from `index`.
    fn continuation(&mut self, state: TraceState, index: usize) -> EdgeClass {
        let edge = if state.is_forward() {
            index
        } else {
            self.ring(state).previous_index(index)
        };
        let eps = self.eps;
        let (memo, ring, other) = if state.on_a() {
            (&mut self.class_a, &self.a, &self.b)
        } else {
            (&mut self.class_b, &self.b, &self.a)
        };
        *memo[edge].get_or_insert_with(|| classify_edge(ring.edge(edge), other, eps))
    }
}

/// Combined output of [`BooleanOpEngine::run`]. Only requested kinds are set.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanOutput<F> {
    pub union: Option<PointRing<F>>,
    pub intersection: Option<PointRing<F>>,
    pub difference: Option<PointRing<F>>,
    /// Setup status, or `InfiniteLoop` if any requested kind aborted.
    pub status: PolyUnionError,
}

/// Result ring and status of a single operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpOutcome<F> {
    pub ring: PointRing<F>,
    pub status: PolyUnionError,
}

/// Entry points for union, intersection and subtraction of two rings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanOpEngine;

impl BooleanOpEngine {
    /// Evaluates every kind in `flags` over one shared [`OperationContext`].
    pub fn run<F: Float>(
        a: &PointRing<F>,
        b: &PointRing<F>,
        flags: OpFlags,
    ) -> Result<BooleanOutput<F>, GeometryError> {
        let mut ctx = OperationContext::new(a, b)?;
        let mut status = ctx.status();
        let mut eval = |flag: OpFlags, op: Operation, status: &mut PolyUnionError| {
            if !flags.contains(flag) {
                return None;
            }
            let (ring, result) = ctx.evaluate(op);
            if result == PolyUnionError::InfiniteLoop {
                *status = result;
            }
            Some(ring)
        };

        let union = eval(OpFlags::UNION, Operation::Union, &mut status);
        let intersection = eval(OpFlags::INTERSECT, Operation::Intersect, &mut status);
        let difference = eval(OpFlags::SUBTRACT, Operation::Subtract, &mut status);

        Ok(BooleanOutput {
            union,
            intersection,
            difference,
            status,
        })
    }

    pub fn union<F: Float>(a: &PointRing<F>, b: &PointRing<F>) -> Result<OpOutcome<F>, GeometryError> {
        Self::single(a, b, Operation::Union)
    }

    pub fn intersect<F: Float>(a: &PointRing<F>, b: &PointRing<F>) -> Result<OpOutcome<F>, GeometryError> {
        Self::single(a, b, Operation::Intersect)
    }

    /// `a` minus `b`.
    pub fn subtract<F: Float>(a: &PointRing<F>, b: &PointRing<F>) -> Result<OpOutcome<F>, GeometryError> {
        Self::single(a, b, Operation::Subtract)
    }

    fn single<F: Float>(
        a: &PointRing<F>,
        b: &PointRing<F>,
        op: Operation,
    ) -> Result<OpOutcome<F>, GeometryError> {
        let (ring, status) = OperationContext::new(a, b)?.evaluate(op);
        Ok(OpOutcome { ring, status })
    }
}

/// Every crossing between edges of `a` and `b`, with overlap endpoints
/// reported as separate crossings and coincident points canonicalised.
fn find_intersections<F: Float>(a: &PointRing<F>, b: &PointRing<F>, eps: F) -> Vec<EdgeIntersectInfo<F>> {
    let mut found = Vec::new();
    let mut canonical: Vec<Point2<F>> = Vec::new();

    for index_a in 0..a.len() {
        let edge_a = a.edge(index_a);
        for index_b in 0..b.len() {
            let edge_b = b.edge(index_b);
            let points = match segments_intersect(edge_a, edge_b, eps) {
                SegmentIntersection::None => continue,
                SegmentIntersection::Point { point, .. } => [Some(point), None],
                SegmentIntersection::Overlapping { start, end } => [Some(start), Some(end)],
            };
            for point in points.into_iter().flatten() {
                let point = match canonical.iter().find(|q| q.approx_eq(point, eps)) {
                    Some(&q) => q,
                    None => {
                        canonical.push(point);
                        point
                    }
                };
                found.push(EdgeIntersectInfo {
                    edge_a,
                    edge_b,
                    index_a,
                    index_b,
                    point,
                });
            }
        }
    }
    found
}

/// Inserts each edge's crossings after its start vertex, ordered along the
/// edge, skipping points the ring already has.
fn splice<F: Float>(ring: &PointRing<F>, per_edge: Vec<Vec<(F, Point2<F>)>>, eps: F) -> Vec<Point2<F>> {
    let mut out = Vec::with_capacity(ring.len() + per_edge.iter().map(Vec::len).sum::<usize>());
    for (i, mut crossings) in per_edge.into_iter().enumerate() {
        out.push(ring.point(i));
        crossings.sort_by(|l, r| l.0.partial_cmp(&r.0).unwrap_or(Ordering::Equal));
        for (_, p) in crossings {
            if ring.find_point(p, eps).is_none() && !out.iter().any(|q| q.approx_eq(p, eps)) {
                out.push(p);
            }
        }
    }
    out
}

fn classify_edge<F: Float>(edge: Segment2<F>, other: &PointRing<F>, eps: F) -> EdgeClass {
    let mid = edge.midpoint();
    match classify_point(other.points(), mid, eps) {
        Containment::Inside => EdgeClass::Inside,
        Containment::Outside => EdgeClass::Outside,
        Containment::Boundary => {
            let same = other
                .edges()
                .find(|e| point_on_segment(mid, *e, eps))
                .map_or(true, |e| e.direction().dot(edge.direction()) > F::zero());
            if same {
                EdgeClass::SharedSame
            } else {
                EdgeClass::SharedOpposite
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring(coords: &[(f64, f64)]) -> PointRing<f64> {
        PointRing::from_points(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    fn square(x: f64, y: f64, size: f64) -> PointRing<f64> {
        ring(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
    }

    fn a() -> PointRing<f64> {
        square(0.0, 0.0, 4.0)
    }

    fn b() -> PointRing<f64> {
        ring(&[(2.0, 0.0), (6.0, 0.0), (6.0, 4.0), (2.0, 4.0)])
    }

    #[test]
    fn test_overlapping_squares_union() {
        let out = BooleanOpEngine::union(&a(), &b()).unwrap();
        assert_eq!(out.status, PolyUnionError::None);
        assert_eq!(out.ring.len(), 8);
        assert_relative_eq!(out.ring.area(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overlapping_squares_intersect() {
        let out = BooleanOpEngine::intersect(&a(), &b()).unwrap();
        assert_eq!(out.status, PolyUnionError::None);
        assert_eq!(
            out.ring.points(),
            &[
                Point2::new(2.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 4.0),
                Point2::new(2.0, 4.0),
            ]
        );
        assert_relative_eq!(out.ring.area(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overlapping_squares_subtract_both_ways() {
        let ab = BooleanOpEngine::subtract(&a(), &b()).unwrap();
        assert_eq!(ab.status, PolyUnionError::None);
        assert_relative_eq!(ab.ring.area(), 8.0, epsilon = 1e-9);
        assert!(ab.ring.points().iter().all(|p| p.x <= 2.0));

        let ba = BooleanOpEngine::subtract(&b(), &a()).unwrap();
        assert_eq!(ba.status, PolyUnionError::None);
        assert_relative_eq!(ba.ring.area(), 8.0, epsilon = 1e-9);
        assert!(ba.ring.points().iter().all(|p| p.x >= 4.0));
    }

    #[test]
    fn test_crossing_squares() {
        let b = square(2.0, 2.0, 4.0);
        let union = BooleanOpEngine::union(&a(), &b).unwrap();
        assert_relative_eq!(union.ring.area(), 28.0, epsilon = 1e-9);

        let inter = BooleanOpEngine::intersect(&a(), &b).unwrap();
        assert_relative_eq!(inter.ring.area(), 4.0, epsilon = 1e-9);

        let diff = BooleanOpEngine::subtract(&a(), &b).unwrap();
        assert_relative_eq!(diff.ring.area(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clockwise_input_is_normalised() {
        let out = BooleanOpEngine::union(&a().reversed(), &b()).unwrap();
        assert_relative_eq!(out.ring.area(), 24.0, epsilon = 1e-9);
        assert_eq!(out.ring.winding_order(), WindingOrder::AntiClockwise);
    }

    #[test]
    fn test_disjoint_squares() {
        let far = square(10.0, 10.0, 4.0);
        let out = BooleanOpEngine::union(&a(), &far).unwrap();
        assert_eq!(out.status, PolyUnionError::NoIntersections);
        assert!(out.ring.is_empty());
    }

    #[test]
    fn test_poly1_inside_poly2_fallbacks() {
        let inner = square(0.0, 0.0, 2.0);
        let outer = a();

        let union = BooleanOpEngine::union(&inner, &outer).unwrap();
        assert_eq!(union.status, PolyUnionError::Poly1InsidePoly2);
        assert_relative_eq!(union.ring.area(), 16.0, epsilon = 1e-9);

        let inter = BooleanOpEngine::intersect(&inner, &outer).unwrap();
        assert_relative_eq!(inter.ring.area(), 4.0, epsilon = 1e-9);

        let diff = BooleanOpEngine::subtract(&inner, &outer).unwrap();
        assert!(diff.ring.is_empty());
    }

    #[test]
    fn test_run_multiple_kinds() {
        let out = BooleanOpEngine::run(&a(), &b(), OpFlags::UNION | OpFlags::INTERSECT).unwrap();
        assert_eq!(out.status, PolyUnionError::None);
        assert_relative_eq!(out.union.unwrap().area(), 24.0, epsilon = 1e-9);
        assert_relative_eq!(out.intersection.unwrap().area(), 8.0, epsilon = 1e-9);
        assert!(out.difference.is_none());
    }

    #[test]
    fn test_too_few_vertices() {
        let line = ring(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            BooleanOpEngine::union(&line, &a()).unwrap_err(),
            GeometryError::NotEnoughVertices { len: 2 }
        );
    }

    #[test]
    fn test_context_splices_crossings() {
        let ctx = OperationContext::new(&a(), &b()).unwrap();
        assert_eq!(ctx.first().len(), 6);
        assert_eq!(ctx.second().len(), 6);
        assert!(ctx.first().find_point(Point2::new(2.0, 4.0), 1e-9).is_some());
        assert!(ctx.second().find_point(Point2::new(4.0, 0.0), 1e-9).is_some());
        assert!(!ctx.intersections().is_empty());
    }

    #[test]
    fn test_trace_that_never_returns_aborts() {
        let mut ctx = OperationContext::new(&a(), &b()).unwrap();
        // With no way back from the second ring the union walk cannot close.
        ctx.twin_b = vec![None; ctx.b.len()];

        let (ring, status) = ctx.evaluate(Operation::Union);
        assert_eq!(status, PolyUnionError::InfiniteLoop);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_trace_state_transitions() {
        use TraceState::*;
        for op in [Operation::Union, Operation::Intersect] {
            assert_eq!(ForwardOnA.hop(op), ForwardOnB);
            assert_eq!(ForwardOnB.hop(op), ForwardOnA);
        }
        assert_eq!(ForwardOnA.hop(Operation::Subtract), BackwardOnB);
        assert_eq!(BackwardOnB.hop(Operation::Subtract), ForwardOnA);
        assert_eq!(ForwardOnB.hop(Operation::Subtract), BackwardOnA);
        assert_eq!(BackwardOnA.hop(Operation::Subtract), ForwardOnB);

        for state in [ForwardOnA, BackwardOnB, ForwardOnB, BackwardOnA] {
            for op in [Operation::Union, Operation::Intersect, Operation::Subtract] {
                assert_eq!(state.hop(op).hop(op), state);
                assert_ne!(state.hop(op).on_a(), state.on_a());
            }
        }
    }

    #[test]
    fn test_edge_acceptance() {
        use TraceState::*;
        assert!(EdgeClass::Outside.accepted(Operation::Union, ForwardOnA));
        assert!(EdgeClass::SharedSame.accepted(Operation::Intersect, ForwardOnB));
        assert!(!EdgeClass::SharedSame.accepted(Operation::Subtract, ForwardOnA));
        assert!(EdgeClass::Inside.accepted(Operation::Subtract, BackwardOnB));
        assert!(!EdgeClass::Inside.accepted(Operation::Subtract, ForwardOnA));
    }

    #[test]
    fn test_flags_debug() {
        assert_eq!(format!("{:?}", OpFlags::UNION | OpFlags::SUBTRACT), "OpFlags(UNION | SUBTRACT)");
        assert!(OpFlags::NONE.is_empty());
    }
}
