//! In-place ring cleanup: short-edge/collinear removal and parallel-edge merging.
//!
//! Both passes repeat until nothing more can be removed and never contract a
//! ring below three vertices.

use super::ring::PointRing;
use crate::primitives::Point2;
use crate::tolerance::is_collinear;
use num_traits::Float;

const MIN_VERTICES: usize = 3;

impl<F: Float> PointRing<F> {
    /// Removes vertices closer than `bias` to their predecessor, and vertices
    /// collinear with their neighbours (within the ring epsilon).
    ///
    /// Surviving vertices keep their original order. Returns the number of
    /// vertices removed.
    ///
    /// # Example
    ///
    /// ```
    /// use ringprep::polygon::PointRing;
    /// use ringprep::Point2;
    ///
    /// let mut ring = PointRing::from_points(vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(2.0, 0.0), // midpoint of the bottom edge
    ///     Point2::new(4.0, 0.0),
    ///     Point2::new(4.0, 4.0),
    ///     Point2::new(0.0, 4.0),
    /// ]);
    ///
    /// assert_eq!(ring.simplify(0.0), 1);
    /// assert_eq!(ring.len(), 4);
    /// ```
    pub fn simplify(&mut self, bias: F) -> usize {
        let eps = self.epsilon();
        let removed = contract(self.points(), |prev, cur, next| {
            prev.distance(cur) < bias || is_collinear(prev, cur, next, eps)
        });
        self.apply(removed)
    }

    /// Removes vertices where the incoming and outgoing edges point the same
    /// way: `|d_in × d_out| < tolerance` and `d_in · d_out > 0` on unit
    /// directions. Zero-length edges are merged too.
    ///
    /// Returns the number of vertices removed.
    pub fn merge_parallel_edges(&mut self, tolerance: F) -> usize {
        let removed = contract(self.points(), |prev, cur, next| {
            match ((cur - prev).normalize(), (next - cur).normalize()) {
                (Some(d_in), Some(d_out)) => {
                    d_in.cross(d_out).abs() < tolerance && d_in.dot(d_out) > F::zero()
                }
                _ => true,
            }
        });
        self.apply(removed)
    }

    fn apply(&mut self, (points, removed): (Vec<Point2<F>>, usize)) -> usize {
        if removed > 0 {
            self.replace_points(points);
        }
        removed
    }
}

/// Repeatedly drops every vertex for which `drop(prev, cur, next)` holds,
/// stopping at three vertices. Returns the survivors and the removal count.
fn contract<F: Float>(
    points: &[Point2<F>],
    mut drop: impl FnMut(Point2<F>, Point2<F>, Point2<F>) -> bool,
) -> (Vec<Point2<F>>, usize) {
    let mut pts = points.to_vec();
    let mut removed = 0;

    loop {
        let mut changed = false;
        let mut i = 0;
        while i < pts.len() && pts.len() > MIN_VERTICES {
            let n = pts.len();
            let prev = pts[(i + n - 1) % n];
            let next = pts[(i + 1) % n];
            if drop(prev, pts[i], next) {
                pts.remove(i);
                removed += 1;
                changed = true;
            } else {
                i += 1;
            }
        }
        if !changed || pts.len() <= MIN_VERTICES {
            break;
        }
    }

    (pts, removed)
}
