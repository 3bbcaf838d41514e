//! Ring preparation for constrained triangulation.
//!
//! This module provides the four stages a raw polygon goes through:
//! - [`PointRing`]: a winding-aware ring with validation and simplification
//! - [`BooleanOpEngine`]: union, intersection and subtraction of two rings
//! - [`SelfIntersectionSplitter`]: decomposition of self-intersecting rings
//! - [`Contour`]: hole-tree resolution and constraint-edge emission
//!
//! # Example
//!
//! ```
//! use ringprep::polygon::{ConstraintSet, Contour, PointRing, SelfIntersectionSplitter};
//! use ringprep::Point2;
//!
//! // A tangled outline becomes two simple lobes.
//! let tangled = PointRing::from_points(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 4.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(0.0, 4.0),
//! ]);
//! let lobes = SelfIntersectionSplitter::split(&tangled).unwrap();
//!
//! let mut constraints = ConstraintSet::new();
//! for lobe in lobes {
//!     let mut contour = Contour::new(lobe);
//!     contour.prepare(&mut constraints).unwrap();
//! }
//!
//! // The lobes share the crossing point, so six edges over five points.
//! assert_eq!(constraints.points().len(), 5);
//! assert_eq!(constraints.len(), 6);
//! ```

mod boolean;
mod constraint;
mod contour;
mod ring;
mod simplify;
mod split;
mod validate;

pub use boolean::{
    BooleanOpEngine, BooleanOutput, EdgeClass, EdgeIntersectInfo, OpFlags, OpOutcome, Operation,
    OperationContext, PolyUnionError, TraceState,
};
pub use constraint::{ConstraintEdge, ConstraintSet, EdgeCode, PointId};
pub use contour::Contour;
pub use ring::{PointRing, WindingOrder};
pub use split::{SelfIntersectionSplitter, SplitGraph, SplitGraphNode};
pub use validate::{PolygonError, SelfIntersection};
