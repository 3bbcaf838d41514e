//! Decomposition of self-intersecting rings into simple rings.
//!
//! The ring is loaded into a throwaway [`SplitGraph`] whose nodes live in an
//! arena and refer to each other by index. Crossings are materialised as
//! nodes, coincident nodes are merged, and the outer boundary is traced by
//! always taking the rightmost untravelled link. Each time the trace returns
//! to a node it already emitted, the enclosed loop becomes its own ring.
//!
//! # Example
//!
//! ```
//! use ringprep::polygon::{PointRing, SelfIntersectionSplitter};
//! use ringprep::Point2;
//!
//! let figure8 = PointRing::from_points(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 4.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(0.0, 4.0),
//! ]);
//!
//! let parts = SelfIntersectionSplitter::split(&figure8).unwrap();
//! assert_eq!(parts.len(), 2);
//! assert!(parts.iter().all(|r| r.is_simple()));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::f64::consts::PI;

use num_traits::Float;
use tracing::debug;

use super::ring::{PointRing, WindingOrder};
use crate::error::GeometryError;
use crate::primitives::{Point2, Segment2, Vec2};
use crate::tolerance::{lit, segments_intersect, SegmentIntersection};

/// A graph vertex: a position and the indices of its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitGraphNode<F> {
    pub position: Point2<F>,
    pub links: BTreeSet<usize>,
    /// Cleared when the node is merged into another.
    pub active: bool,
}

/// Arena of [`SplitGraphNode`]s addressed by index.
#[derive(Debug, Clone)]
pub struct SplitGraph<F> {
    nodes: Vec<SplitGraphNode<F>>,
    eps: F,
}

impl<F: Float> SplitGraph<F> {
    /// One node per ring vertex, each linked to its ring neighbours.
    pub fn from_ring(ring: &PointRing<F>) -> Self {
        let mut graph = Self {
            nodes: ring
                .points()
                .iter()
                .map(|&position| SplitGraphNode {
                    position,
                    links: BTreeSet::new(),
                    active: true,
                })
                .collect(),
            eps: ring.epsilon(),
        };
        for i in 0..ring.len() {
            graph.link(i, ring.next_index(i));
        }
        graph
    }

    /// All nodes, merged ones included.
    pub fn nodes(&self) -> &[SplitGraphNode<F>] {
        &self.nodes
    }

    /// Number of nodes not merged away.
    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.active).count()
    }

    /// Undirected links between active nodes, each listed once as `(lo, hi)`.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.active)
            .flat_map(|(i, n)| n.links.range(i + 1..).map(move |&j| (i, j)))
            .collect()
    }

    /// Merges every pair of active nodes closer than the ring epsilon.
    ///
    /// Fails rather than leave fewer than three active nodes.
    pub fn collapse(&mut self) -> Result<(), GeometryError> {
        let n = self.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if !self.nodes[i].active || !self.nodes[j].active {
                    continue;
                }
                if !self.nodes[i].position.approx_eq(self.nodes[j].position, self.eps) {
                    continue;
                }
                let active = self.active_count();
                if active <= 3 {
                    return Err(GeometryError::GraphCollapsed { active });
                }
                self.merge(j, i);
            }
        }
        Ok(())
    }

    /// Splits crossing links at their crossing point until no link crosses
    /// another away from a shared node.
    pub fn resolve_intersections(&mut self) -> Result<(), GeometryError> {
        let size = self.nodes.len() + 1;
        self.resolve_within(16 * size * size)
    }

    /// Fails when crossings remain after `limit` splits.
    fn resolve_within(&mut self, limit: usize) -> Result<(), GeometryError> {
        for _ in 0..limit {
            if !self.split_first_crossing() {
                return Ok(());
            }
        }
        if self.split_first_crossing() {
            return Err(GeometryError::ConvergenceFailed { iterations: limit });
        }
        Ok(())
    }

    /// Traces the boundary from the lowest (then rightmost) node and returns
    /// each closed loop as a list of points.
    pub fn trace(&self) -> Result<Vec<Vec<Point2<F>>>, GeometryError> {
        let start = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.active && !n.links.is_empty())
            .min_by(|(_, l), (_, r)| {
                let (l, r) = (l.position, r.position);
                l.y.partial_cmp(&r.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(r.x.partial_cmp(&l.x).unwrap_or(std::cmp::Ordering::Equal))
            })
            .map(|(i, _)| i)
            .ok_or(GeometryError::GraphCollapsed { active: 0 })?;

        let max_steps = 4 * self.active_count();
        let mut travelled: HashSet<(usize, usize)> = HashSet::new();
        let mut path = vec![start];
        let mut loops = Vec::new();
        let mut current = start;
        let mut heading = Vec2::new(F::one(), F::zero());

        for step in 0..max_steps {
            let next = self
                .rightmost_link(current, heading, &travelled)
                .ok_or(GeometryError::TraceDidNotClose { steps: step })?;
            travelled.insert(edge_key(current, next));
            heading = self.nodes[next].position - self.nodes[current].position;
            current = next;

            if next == start {
                loops.push(self.positions(&path));
                return Ok(loops);
            }
            match path.iter().position(|&n| n == next) {
                Some(k) => {
                    loops.push(self.positions(&path[k..]));
                    path.truncate(k + 1);
                }
                None => path.push(next),
            }
        }

        Err(GeometryError::TraceDidNotClose { steps: max_steps })
    }

    /// Untravelled link of `node` with the smallest turn from `heading`.
    fn rightmost_link(
        &self,
        node: usize,
        heading: Vec2<F>,
        travelled: &HashSet<(usize, usize)>,
    ) -> Option<usize> {
        let pi = lit::<F>(PI);
        let origin = self.nodes[node].position;
        self.nodes[node]
            .links
            .iter()
            .copied()
            .filter(|&l| !travelled.contains(&edge_key(node, l)))
            .map(|l| {
                let turn = heading.signed_angle_to(self.nodes[l].position - origin);
                // A reversal is the last resort whichever sign atan2 gave it.
                let turn = if turn <= -pi + lit(1e-12) { pi } else { turn };
                (l, turn)
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(l, _)| l)
    }

    fn positions(&self, indices: &[usize]) -> Vec<Point2<F>> {
        indices.iter().map(|&i| self.nodes[i].position).collect()
    }

    fn link(&mut self, a: usize, b: usize) {
        if a != b {
            self.nodes[a].links.insert(b);
            self.nodes[b].links.insert(a);
        }
    }

    fn unlink(&mut self, a: usize, b: usize) {
        self.nodes[a].links.remove(&b);
        self.nodes[b].links.remove(&a);
    }

    /// Moves every link of `from` onto `into` and deactivates `from`.
    fn merge(&mut self, from: usize, into: usize) {
        let links = std::mem::take(&mut self.nodes[from].links);
        for l in links {
            self.nodes[l].links.remove(&from);
            self.link(into, l);
        }
        self.nodes[from].active = false;
    }

    /// Index of an active node within epsilon of `p`, creating one if needed.
    fn node_at(&mut self, p: Point2<F>) -> usize {
        if let Some(i) = self
            .nodes
            .iter()
            .position(|n| n.active && n.position.approx_eq(p, self.eps))
        {
            return i;
        }
        self.nodes.push(SplitGraphNode {
            position: p,
            links: BTreeSet::new(),
            active: true,
        });
        self.nodes.len() - 1
    }

    /// Routes the link `(a, b)` through `via`. Returns `false` if `via` is
    /// already an endpoint or the link no longer exists.
    fn split_edge(&mut self, (a, b): (usize, usize), via: usize) -> bool {
        if via == a || via == b || !self.nodes[a].links.contains(&b) {
            return false;
        }
        self.unlink(a, b);
        self.link(a, via);
        self.link(via, b);
        true
    }

    fn segment(&self, (a, b): (usize, usize)) -> Segment2<F> {
        Segment2::new(self.nodes[a].position, self.nodes[b].position)
    }

    fn split_first_crossing(&mut self) -> bool {
        let edges = self.edges();
        for (i, &e1) in edges.iter().enumerate() {
            for &e2 in &edges[i + 1..] {
                let points = match segments_intersect(self.segment(e1), self.segment(e2), self.eps) {
                    SegmentIntersection::None => continue,
                    SegmentIntersection::Point { point, .. } => [point, point],
                    SegmentIntersection::Overlapping { start, end } => [start, end],
                };
                for p in points {
                    let via = self.node_at(p);
                    let split1 = self.split_edge(e1, via);
                    let split2 = self.split_edge(e2, via);
                    if split1 || split2 {
                        return true;
                    }
                }
            }
        }
        false
    }
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Rebuilds simple rings from a possibly self-intersecting one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfIntersectionSplitter;

impl SelfIntersectionSplitter {
    /// Splits `ring` into simple, anticlockwise rings.
    ///
    /// A ring that is already simple is returned unchanged as the only
    /// element. Zero-area loops produced by the trace are dropped.
    ///
    /// # Errors
    ///
    /// Fails if the ring has fewer than three vertices, if merging coincident
    /// nodes leaves fewer than three, or if the graph cannot be resolved or
    /// traced back to its start.
    pub fn split<F: Float>(ring: &PointRing<F>) -> Result<Vec<PointRing<F>>, GeometryError> {
        if ring.len() < 3 {
            return Err(GeometryError::NotEnoughVertices { len: ring.len() });
        }
        if ring.is_simple() {
            return Ok(vec![ring.clone()]);
        }

        let mut graph = SplitGraph::from_ring(ring);
        graph.collapse()?;
        graph.resolve_intersections()?;
        graph.collapse()?;
        debug!(
            input = ring.len(),
            nodes = graph.active_count(),
            links = graph.edges().len(),
            "split graph resolved"
        );

        let area_floor = ring.epsilon() * ring.epsilon();
        let rings: Vec<_> = graph
            .trace()?
            .into_iter()
            .filter_map(|points| {
                let mut part = PointRing::from_points_with(points, ring.tolerances());
                part.set_winding_order(WindingOrder::AntiClockwise);
                part.simplify(F::zero());
                (part.len() >= 3 && part.area() > area_floor).then_some(part)
            })
            .collect();
        debug!(parts = rings.len(), "self-intersecting ring split");
        Ok(rings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring(coords: &[(f64, f64)]) -> PointRing<f64> {
        PointRing::from_points(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    #[test]
    fn test_figure_eight_splits_into_two_triangles() {
        let figure8 = ring(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);
        let parts = SelfIntersectionSplitter::split(&figure8).unwrap();

        assert_eq!(parts.len(), 2);
        for part in &parts {
            assert_eq!(part.len(), 3);
            assert!(part.is_simple());
            assert_eq!(part.winding_order(), WindingOrder::AntiClockwise);
            assert_relative_eq!(part.area(), 4.0, epsilon = 1e-9);
        }
        // The lobes wind in opposite senses, so the raw shoelace of the input
        // cancels to zero while the split rings cover both lobes.
        assert_relative_eq!(figure8.area(), 0.0, epsilon = 1e-9);
        let total: f64 = parts.iter().map(|p| p.area()).sum();
        assert_relative_eq!(total, 8.0, epsilon = 1e-9);
    }

    fn graph(points: &[(f64, f64)], links: &[(usize, usize)]) -> SplitGraph<f64> {
        let mut graph = SplitGraph {
            nodes: points
                .iter()
                .map(|&(x, y)| SplitGraphNode {
                    position: Point2::new(x, y),
                    links: BTreeSet::new(),
                    active: true,
                })
                .collect(),
            eps: 1e-6,
        };
        for &(a, b) in links {
            graph.link(a, b);
        }
        graph
    }

    #[test]
    fn test_trace_with_dangling_tail_fails() {
        // A triangle hanging off a tail that starts at the lowest node: the
        // walk can never get back to where it started.
        let lollipop = graph(
            &[(0.0, 0.0), (2.0, 1.0), (4.0, 2.0), (2.0, 3.0)],
            &[(0, 1), (1, 2), (2, 3), (3, 1)],
        );
        assert!(matches!(
            lollipop.trace(),
            Err(GeometryError::TraceDidNotClose { .. })
        ));
    }

    #[test]
    fn test_crossing_resolution_respects_limit() {
        let figure8 = ring(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);

        let mut starved = SplitGraph::from_ring(&figure8);
        assert_eq!(
            starved.resolve_within(0),
            Err(GeometryError::ConvergenceFailed { iterations: 0 })
        );

        let mut graph = SplitGraph::from_ring(&figure8);
        assert_eq!(graph.resolve_within(1), Ok(()));
        assert_eq!(graph.active_count(), 5);
    }

    #[test]
    fn test_touching_vertex_splits() {
        // Two triangles meeting at (2, 2).
        let bow = ring(&[(0.0, 0.0), (2.0, 2.0), (4.0, 0.0), (4.0, 4.0), (2.0, 2.0), (0.0, 4.0)]);
        let parts = SelfIntersectionSplitter::split(&bow).unwrap();
        assert_eq!(parts.len(), 2);
        let total: f64 = parts.iter().map(|p| p.area()).sum();
        assert_relative_eq!(total, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_simple_ring_is_returned_unchanged() {
        let square = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let parts = SelfIntersectionSplitter::split(&square).unwrap();
        assert_eq!(parts, vec![square]);
    }

    #[test]
    fn test_graph_materialises_crossing() {
        let figure8 = ring(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);
        let mut graph = SplitGraph::from_ring(&figure8);
        assert_eq!(graph.edges().len(), 4);

        graph.resolve_intersections().unwrap();
        assert_eq!(graph.active_count(), 5);
        assert_eq!(graph.edges().len(), 6);
        let centre = &graph.nodes()[4];
        assert_eq!(centre.position, Point2::new(2.0, 2.0));
        assert_eq!(centre.links.len(), 4);
    }

    #[test]
    fn test_collapse_below_three_fails() {
        let sliver = ring(&[(0.0, 0.0), (1e-9, 0.0), (0.0, 1e-9), (5.0, 5.0)]);
        let err = SelfIntersectionSplitter::split(&sliver).unwrap_err();
        assert!(matches!(err, GeometryError::GraphCollapsed { .. }));
    }

    #[test]
    fn test_too_few_vertices() {
        let line = ring(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(
            SelfIntersectionSplitter::split(&line).unwrap_err(),
            GeometryError::NotEnoughVertices { len: 2 }
        );
    }
}
