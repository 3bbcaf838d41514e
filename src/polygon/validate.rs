//! Ring validation.
//!
//! Validation never fails: [`PointRing::check_polygon`] returns a
//! [`PolygonError`] bit-set and the caller decides whether to reject the ring
//! or repair it (see [`PointRing::simplify`] and
//! [`SelfIntersectionSplitter`](super::SelfIntersectionSplitter)).
//!
//! # Example
//!
//! ```
//! use ringprep::polygon::{PointRing, PolygonError};
//! use ringprep::Point2;
//!
//! let figure8 = PointRing::from_points(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(0.0, 2.0),
//! ]);
//!
//! let errors = figure8.check_polygon();
//! assert!(errors.contains(PolygonError::NOT_SIMPLE));
//! ```

use super::ring::PointRing;
use crate::primitives::Point2;
use crate::tolerance::{
    is_collinear, lit, orient2d, segments_intersect, Orientation, SegmentIntersection,
};
use num_traits::Float;
use std::f64::consts::PI;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bit-set of validation failures.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PolygonError(u16);

impl PolygonError {
    pub const NONE: Self = Self(0);
    pub const NOT_ENOUGH_VERTICES: Self = Self(1 << 0);
    pub const DEGENERATE: Self = Self(1 << 1);
    pub const NOT_SIMPLE: Self = Self(1 << 2);
    pub const AREA_TOO_SMALL: Self = Self(1 << 3);
    pub const SIDES_TOO_CLOSE_TO_PARALLEL: Self = Self(1 << 4);
    pub const NOT_CONVEX: Self = Self(1 << 5);
    pub const TOO_THIN: Self = Self(1 << 6);
    pub const UNKNOWN: Self = Self(1 << 7);

    const NAMED: [(Self, &'static str); 8] = [
        (Self::NOT_ENOUGH_VERTICES, "NOT_ENOUGH_VERTICES"),
        (Self::DEGENERATE, "DEGENERATE"),
        (Self::NOT_SIMPLE, "NOT_SIMPLE"),
        (Self::AREA_TOO_SMALL, "AREA_TOO_SMALL"),
        (Self::SIDES_TOO_CLOSE_TO_PARALLEL, "SIDES_TOO_CLOSE_TO_PARALLEL"),
        (Self::NOT_CONVEX, "NOT_CONVEX"),
        (Self::TOO_THIN, "TOO_THIN"),
        (Self::UNKNOWN, "UNKNOWN"),
    ];

    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// `true` when no failure is set.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// `true` when every flag of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Iterates over the single flags that are set.
    pub fn iter(self) -> impl Iterator<Item = Self> {
        Self::NAMED
            .into_iter()
            .map(|(flag, _)| flag)
            .filter(move |flag| self.contains(*flag))
    }
}

impl BitOr for PolygonError {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PolygonError {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PolygonError {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "PolygonError(NONE)");
        }
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "PolygonError({})", names.join(" | "))
    }
}

/// A crossing between two edges of the same ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfIntersection<F> {
    pub point: Point2<F>,
    /// Index of the first edge (the edge leaving vertex `edge1`).
    pub edge1: usize,
    /// Index of the second edge.
    pub edge2: usize,
}

impl<F: Float> PointRing<F> {
    /// Validates the ring and reports every failure found.
    ///
    /// With fewer than three vertices only `NOT_ENOUGH_VERTICES` is reported.
    pub fn check_polygon(&self) -> PolygonError {
        if self.len() < 3 {
            return PolygonError::NOT_ENOUGH_VERTICES;
        }

        let mut errors = PolygonError::NONE;
        if self.is_degenerate() {
            errors |= PolygonError::DEGENERATE;
        }
        if !self.is_simple() {
            errors |= PolygonError::NOT_SIMPLE;
        }
        if self.area() < self.epsilon() {
            errors |= PolygonError::AREA_TOO_SMALL;
        }
        if self.has_near_parallel_sides() {
            errors |= PolygonError::SIDES_TOO_CLOSE_TO_PARALLEL;
        }
        if self.is_too_thin() {
            errors |= PolygonError::TOO_THIN;
        }
        errors
    }

    /// [`check_polygon`](Self::check_polygon) plus `NOT_CONVEX`.
    pub fn check_convex_polygon(&self) -> PolygonError {
        let mut errors = self.check_polygon();
        if self.len() >= 3 && !self.is_convex() {
            errors |= PolygonError::NOT_CONVEX;
        }
        errors
    }

    /// `true` if a vertex coincides with its successor, or three consecutive
    /// vertices are collinear, within the ring epsilon.
    pub fn is_degenerate(&self) -> bool {
        let n = self.len();
        if n < 3 {
            return true;
        }
        let eps = self.epsilon();
        let pts = self.points();

        (0..n).any(|i| {
            let prev = pts[self.previous_index(i)];
            let cur = pts[i];
            let next = pts[self.next_index(i)];
            cur.approx_eq(next, eps) || is_collinear(prev, cur, next, eps)
        })
    }

    /// `true` if every non-collinear vertex turns the same way.
    pub fn is_convex(&self) -> bool {
        let n = self.len();
        if n < 3 {
            return true;
        }
        let eps = self.epsilon();
        let pts = self.points();
        let mut turn: Option<Orientation> = None;

        for i in 0..n {
            let o = orient2d(pts[i], pts[(i + 1) % n], pts[(i + 2) % n], eps);
            if o == Orientation::Collinear {
                continue;
            }
            match turn {
                None => turn = Some(o),
                Some(t) if t != o => return false,
                _ => {}
            }
        }
        true
    }

    /// `true` if no two non-adjacent edges touch and no adjacent edges fold
    /// back over each other. O(n²).
    pub fn is_simple(&self) -> bool {
        self.first_self_intersection().is_none()
    }

    /// Every contact between non-adjacent edges.
    pub fn self_intersections(&self) -> Vec<SelfIntersection<F>> {
        let mut found = Vec::new();
        self.scan_edge_pairs(|hit| {
            found.push(hit);
            false
        });
        found
    }

    fn first_self_intersection(&self) -> Option<SelfIntersection<F>> {
        let mut first = None;
        self.scan_edge_pairs(|hit| {
            first = Some(hit);
            true
        });
        first
    }

    /// Visits edge contacts until `visit` returns `true`.
    fn scan_edge_pairs(&self, mut visit: impl FnMut(SelfIntersection<F>) -> bool) {
        let n = self.len();
        if n < 3 {
            return;
        }
        let eps = self.epsilon();

        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                let hit = segments_intersect(self.edge(i), self.edge(j), eps);
                let point = match hit {
                    SegmentIntersection::None => continue,
                    SegmentIntersection::Point { point, .. } if !adjacent => point,
                    SegmentIntersection::Overlapping { start, .. } => start,
                    SegmentIntersection::Point { .. } => continue,
                };
                if visit(SelfIntersection {
                    point,
                    edge1: i,
                    edge2: j,
                }) {
                    return;
                }
            }
        }
    }

    /// Any interior angle narrower than the configured angular tolerance.
    fn has_near_parallel_sides(&self) -> bool {
        let n = self.len();
        let min_angle: F = self.tolerances().min_angle();
        let pts = self.points();

        (0..n).any(|i| {
            let cur = pts[i];
            let to_prev = pts[self.previous_index(i)] - cur;
            let to_next = pts[self.next_index(i)] - cur;
            if to_prev.normalize().is_none() || to_next.normalize().is_none() {
                return false;
            }
            to_prev.signed_angle_to(to_next).abs() < min_angle
        })
    }

    /// Isoperimetric ratio `4πA / P²` below the relative epsilon.
    fn is_too_thin(&self) -> bool {
        let perimeter = self.perimeter();
        if perimeter <= F::zero() {
            return true;
        }
        let ratio = lit::<F>(4.0 * PI) * self.area() / (perimeter * perimeter);
        ratio < lit(self.tolerances().relative_epsilon)
    }
}
