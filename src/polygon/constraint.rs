//! Constraint edges handed to a downstream constrained triangulator.
//!
//! Points are stored once in an arena and referred to by [`PointId`]; rings
//! that share a boundary point end up referring to the same id, so an edge
//! shared by two contours is registered a single time.

use std::collections::HashMap;

use num_traits::Float;

use crate::primitives::Point2;

/// Index of a canonical point in a [`ConstraintSet`].
pub type PointId = u32;

/// Order-independent key of an edge between two point ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeCode(u64);

impl EdgeCode {
    /// Key for the edge between `a` and `b`, in either direction.
    pub fn new(a: PointId, b: PointId) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self((u64::from(lo) << 32) | u64::from(hi))
    }

    /// The packed key: smaller id in the high 32 bits.
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// The two endpoint ids, smaller first.
    #[inline]
    pub fn endpoints(self) -> (PointId, PointId) {
        ((self.0 >> 32) as PointId, self.0 as PointId)
    }
}

/// A boundary segment the triangulator must keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintEdge {
    pub start: PointId,
    pub end: PointId,
}

impl ConstraintEdge {
    /// Lookup key of this edge.
    #[inline]
    pub fn code(self) -> EdgeCode {
        EdgeCode::new(self.start, self.end)
    }
}

/// Shared arena of canonical points and the constraint edges between them.
#[derive(Debug, Clone)]
pub struct ConstraintSet<F> {
    points: Vec<Point2<F>>,
    edges: Vec<ConstraintEdge>,
    lookup: HashMap<EdgeCode, usize>,
}

impl<F: Float> Default for ConstraintSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> ConstraintSet<F> {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            edges: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Id of the stored point within `eps` of `p`, storing `p` if there is
    /// none.
    pub fn canonical_point(&mut self, p: Point2<F>, eps: F) -> PointId {
        if let Some(i) = self.points.iter().position(|q| q.approx_eq(p, eps)) {
            return i as PointId;
        }
        self.points.push(p);
        (self.points.len() - 1) as PointId
    }

    /// The canonical point stored under `id`.
    #[inline]
    pub fn point(&self, id: PointId) -> Point2<F> {
        self.points[id as usize]
    }

    /// All canonical points, indexed by [`PointId`].
    pub fn points(&self) -> &[Point2<F>] {
        &self.points
    }

    /// The registered edge between `a` and `b`, in either direction.
    pub fn try_get_constraint(&self, a: PointId, b: PointId) -> Option<ConstraintEdge> {
        self.lookup.get(&EdgeCode::new(a, b)).map(|&i| self.edges[i])
    }

    /// Registers the edge `a -> b` unless an edge between the two points
    /// already exists. Returns the stored edge.
    pub fn add_constraint(&mut self, a: PointId, b: PointId) -> ConstraintEdge {
        if let Some(edge) = self.try_get_constraint(a, b) {
            return edge;
        }
        let edge = ConstraintEdge { start: a, end: b };
        self.lookup.insert(edge.code(), self.edges.len());
        self.edges.push(edge);
        edge
    }

    /// Constraint edges in registration order.
    pub fn edges(&self) -> &[ConstraintEdge] {
        &self.edges
    }

    /// Number of constraint edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// `true` when no edge has been registered.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_code_is_order_independent() {
        assert_eq!(EdgeCode::new(3, 7), EdgeCode::new(7, 3));
        assert_ne!(EdgeCode::new(3, 7), EdgeCode::new(3, 8));
        assert_eq!(EdgeCode::new(7, 3).endpoints(), (3, 7));
        assert_eq!(EdgeCode::new(1, 2).value(), (1u64 << 32) | 2);
    }

    #[test]
    fn test_canonical_points_are_reused() {
        let mut set = ConstraintSet::new();
        let a = set.canonical_point(Point2::new(0.0, 0.0), 1e-3);
        let b = set.canonical_point(Point2::new(1.0, 0.0), 1e-3);
        let c = set.canonical_point(Point2::new(0.0005, 0.0), 1e-3);
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(set.points().len(), 2);
        assert_eq!(set.point(b), Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_add_constraint_is_idempotent() {
        let mut set: ConstraintSet<f64> = ConstraintSet::new();
        let first = set.add_constraint(0, 1);
        let again = set.add_constraint(1, 0);
        assert_eq!(first, again);
        assert_eq!(set.len(), 1);
        assert_eq!(set.try_get_constraint(1, 0), Some(first));
        assert_eq!(set.try_get_constraint(0, 2), None);
    }
}
