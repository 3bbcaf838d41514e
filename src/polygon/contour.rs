//! Contours: rings that own a tree of nested holes.
//!
//! [`Contour::initialize_holes`] turns an arbitrary list of hole rings into a
//! tree of non-overlapping siblings and registers every boundary edge with a
//! shared [`ConstraintSet`]:
//!
//! 1. duplicate holes (same vertices, any start vertex, either direction) are
//!    dropped;
//! 2. a hole lying inside a sibling is nested under it, and crossing siblings
//!    are replaced by their union with the overlap kept as a nested hole;
//! 3. each surviving hole is wound for its depth, snapped to the canonical
//!    points of the set and emitted as constraint edges, then resolved in
//!    turn.
//!
//! # Example
//!
//! ```
//! use ringprep::polygon::{ConstraintSet, Contour, PointRing};
//! use ringprep::Point2;
//!
//! let square = |x: f64, y: f64, s: f64| {
//!     PointRing::from_points(vec![
//!         Point2::new(x, y),
//!         Point2::new(x + s, y),
//!         Point2::new(x + s, y + s),
//!         Point2::new(x, y + s),
//!     ])
//! };
//!
//! let mut contour = Contour::new(square(0.0, 0.0, 10.0));
//! contour.add_hole(square(1.0, 1.0, 2.0));
//! contour.add_hole(square(6.0, 6.0, 2.0));
//!
//! let mut constraints = ConstraintSet::new();
//! contour.prepare(&mut constraints).unwrap();
//!
//! assert_eq!(contour.num_holes(), 2);
//! assert_eq!(constraints.len(), 12);
//! ```

use std::collections::VecDeque;

use num_traits::Float;
use tracing::{debug, warn};

use super::boolean::{BooleanOpEngine, BooleanOutput, OpFlags, PolyUnionError};
use super::constraint::{ConstraintSet, PointId};
use super::ring::{PointRing, WindingOrder};
use crate::error::GeometryError;
use crate::tolerance::segments_intersect;

/// A ring with nested child holes.
///
/// Depth 0 is solid; polarity alternates with depth, so a hole's hole is
/// solid again.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour<F> {
    ring: PointRing<F>,
    holes: Vec<Contour<F>>,
    depth: usize,
    vertex_ids: Vec<PointId>,
}

impl<F: Float> From<PointRing<F>> for Contour<F> {
    fn from(ring: PointRing<F>) -> Self {
        Self::new(ring)
    }
}

impl<F: Float> Contour<F> {
    /// A solid, top-level contour.
    pub fn new(ring: PointRing<F>) -> Self {
        Self::with_depth(ring, 0)
    }

    fn with_depth(ring: PointRing<F>, depth: usize) -> Self {
        Self {
            ring,
            holes: Vec::new(),
            depth,
            vertex_ids: Vec::new(),
        }
    }

    /// Adds a direct hole and returns it so it can receive holes of its own.
    pub fn add_hole(&mut self, ring: PointRing<F>) -> &mut Contour<F> {
        let depth = self.depth + 1;
        self.holes.push(Self::with_depth(ring, depth));
        let last = self.holes.len() - 1;
        &mut self.holes[last]
    }

    /// Number of direct holes.
    pub fn num_holes(&self) -> usize {
        self.holes.len()
    }

    /// Direct holes, in insertion order.
    pub fn holes(&self) -> &[Contour<F>] {
        &self.holes
    }

    /// The direct hole at `index`. Panics when out of range.
    pub fn hole(&self, index: usize) -> &Contour<F> {
        &self.holes[index]
    }

    /// The boundary ring.
    pub fn ring(&self) -> &PointRing<F> {
        &self.ring
    }

    /// Mutable access to the boundary. Invalidates the vertex ids.
    pub fn ring_mut(&mut self) -> &mut PointRing<F> {
        self.vertex_ids.clear();
        &mut self.ring
    }

    /// Nesting depth: 0 for a top-level solid, odd for holes.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `true` at odd depth.
    pub fn is_hole(&self) -> bool {
        self.depth % 2 == 1
    }

    /// Canonical point ids of the boundary, set once constraints are emitted.
    pub fn vertex_ids(&self) -> &[PointId] {
        &self.vertex_ids
    }

    /// Registers this contour's boundary and resolves its hole tree.
    pub fn prepare(&mut self, constraints: &mut ConstraintSet<F>) -> Result<(), GeometryError> {
        self.register_boundary(constraints);
        self.initialize_holes(constraints)
    }

    /// Winds the boundary for its depth, snaps it to canonical points and
    /// emits one constraint edge per boundary edge.
    pub fn register_boundary(&mut self, constraints: &mut ConstraintSet<F>) {
        let winding = if self.is_hole() {
            WindingOrder::Clockwise
        } else {
            WindingOrder::AntiClockwise
        };
        self.ring.set_winding_order(winding);

        let eps = self.ring.epsilon();
        let ids: Vec<PointId> = self
            .ring
            .points()
            .iter()
            .map(|&p| constraints.canonical_point(p, eps))
            .collect();
        self.ring
            .replace_points(ids.iter().map(|&id| constraints.point(id)).collect());

        for (i, &a) in ids.iter().enumerate() {
            let b = ids[(i + 1) % ids.len()];
            if a != b {
                constraints.add_constraint(a, b);
            }
        }
        self.vertex_ids = ids;
    }

    /// Resolves the direct holes into non-overlapping, non-duplicate
    /// siblings, emits their constraints and recurses into each of them.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors from the boolean engine used to merge crossing
    /// holes.
    pub fn initialize_holes(&mut self, constraints: &mut ConstraintSet<F>) -> Result<(), GeometryError> {
        self.dedup_holes();
        self.nest_and_merge_holes()?;
        for hole in &mut self.holes {
            hole.register_boundary(constraints);
            hole.initialize_holes(constraints)?;
        }
        Ok(())
    }

    fn dedup_holes(&mut self) {
        let mut kept: Vec<Contour<F>> = Vec::with_capacity(self.holes.len());
        for hole in std::mem::take(&mut self.holes) {
            match kept.iter_mut().find(|k| same_shape(&k.ring, &hole.ring)) {
                Some(original) => {
                    debug!(depth = hole.depth, len = hole.ring.len(), "dropping duplicate hole");
                    for child in hole.holes {
                        original.adopt(child);
                    }
                }
                None => kept.push(hole),
            }
        }
        self.holes = kept;
    }

    fn nest_and_merge_holes(&mut self) -> Result<(), GeometryError> {
        let mut pending: VecDeque<Contour<F>> = std::mem::take(&mut self.holes).into();
        let mut settled: Vec<Contour<F>> = Vec::new();

        'pending: while let Some(mut x) = pending.pop_front() {
            let mut i = 0;
            while i < settled.len() {
                match relate(&x.ring, &settled[i].ring) {
                    Relation::Disjoint => i += 1,
                    Relation::Contains => {
                        debug!(depth = x.depth, "nesting sibling hole");
                        let inner = settled.remove(i);
                        x.adopt(inner);
                    }
                    Relation::ContainedBy => {
                        debug!(depth = x.depth, "nesting hole under sibling");
                        settled[i].adopt(x);
                        continue 'pending;
                    }
                    Relation::Crossing => match merge(&x, &settled[i])? {
                        Some(merged) => {
                            debug!(depth = x.depth, len = merged.ring.len(), "merged crossing holes");
                            settled.remove(i);
                            pending.push_front(merged);
                            continue 'pending;
                        }
                        None => i += 1,
                    },
                }
            }
            settled.push(x);
        }

        self.holes = settled;
        Ok(())
    }

    /// Takes ownership of `child` as a direct hole, re-depthing its subtree.
    fn adopt(&mut self, mut child: Contour<F>) {
        child.set_depth(self.depth + 1);
        self.holes.push(child);
    }

    fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        for hole in &mut self.holes {
            hole.set_depth(depth + 1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Disjoint,
    /// The first ring encloses the second.
    Contains,
    ContainedBy,
    Crossing,
}

fn relate<F: Float>(x: &PointRing<F>, y: &PointRing<F>) -> Relation {
    if !x.bounds_intersect(y) {
        return Relation::Disjoint;
    }

    let eps = x.epsilon().min(y.epsilon());
    let touching = x
        .edges()
        .any(|ex| y.edges().any(|ey| !segments_intersect(ex, ey, eps).is_none()));

    if encloses(x, y, touching) {
        Relation::Contains
    } else if encloses(y, x, touching) {
        Relation::ContainedBy
    } else if touching {
        Relation::Crossing
    } else {
        Relation::Disjoint
    }
}

/// `outer` encloses `inner` if every vertex of `inner` is inside or on it
/// and, when the boundaries touch, every edge midpoint is too.
fn encloses<F: Float>(outer: &PointRing<F>, inner: &PointRing<F>, touching: bool) -> bool {
    outer.contains_ring(inner) && (!touching || inner.edges().all(|e| outer.contains_point(e.midpoint())))
}

/// Union of two crossing holes, owning both sets of children plus the
/// intersection as a nested hole. `None` when the rings cannot be merged.
///
/// Only one intersection ring is traced. When two holes overlap in several
/// disjoint regions the extra regions are lost; this is detected by an area
/// balance check and logged.
fn merge<F: Float>(x: &Contour<F>, y: &Contour<F>) -> Result<Option<Contour<F>>, GeometryError> {
    let output = BooleanOpEngine::run(&x.ring, &y.ring, OpFlags::UNION | OpFlags::INTERSECT)?;
    Ok(merged_contour(x, y, output))
}

fn merged_contour<F: Float>(x: &Contour<F>, y: &Contour<F>, output: BooleanOutput<F>) -> Option<Contour<F>> {
    let mut union = match (output.status, output.union) {
        (PolyUnionError::None | PolyUnionError::Poly1InsidePoly2, Some(ring)) if ring.len() >= 3 => ring,
        (status, _) => {
            warn!(?status, depth = x.depth, "could not merge crossing holes, keeping both");
            return None;
        }
    };
    // Shared edges leave collinear splice points behind.
    union.simplify(F::zero());

    let overlap = output.intersection.filter(|overlap| {
        let floor = overlap.epsilon() * overlap.epsilon();
        overlap.len() >= 3 && overlap.area() > floor
    });

    let overlap_area = overlap.as_ref().map_or(F::zero(), PointRing::area);
    let tolerance = union.epsilon() * (x.ring.perimeter() + y.ring.perimeter());
    if !overlap_accounted(x.ring.area(), y.ring.area(), union.area(), overlap_area, tolerance) {
        warn!(
            depth = x.depth,
            union_area = union.area().to_f64(),
            overlap_area = overlap_area.to_f64(),
            "merged holes overlap in more than one region, extra overlaps dropped"
        );
    }

    let mut merged = Contour::with_depth(union, x.depth);
    for child in x.holes.iter().chain(&y.holes) {
        merged.adopt(child.clone());
    }
    if let Some(overlap) = overlap {
        merged.adopt(Contour::new(overlap));
    }
    Some(merged)
}

/// `true` when `|X| + |Y| - |X ∪ Y|` matches the traced overlap area.
fn overlap_accounted<F: Float>(x_area: F, y_area: F, union_area: F, overlap_area: F, tolerance: F) -> bool {
    (x_area + y_area - union_area - overlap_area).abs() <= tolerance
}

/// Same vertices up to a rotation of the start vertex, in either direction.
fn same_shape<F: Float>(a: &PointRing<F>, b: &PointRing<F>) -> bool {
    let n = a.len();
    if n == 0 || n != b.len() {
        return false;
    }
    let eps = a.epsilon().min(b.epsilon());
    let (pa, pb) = (a.points(), b.points());

    (0..n).any(|offset| {
        let forward = (0..n).all(|i| pa[i].approx_eq(pb[(i + offset) % n], eps));
        forward || (0..n).all(|i| pa[i].approx_eq(pb[(offset + n - i) % n], eps))
    })
}
