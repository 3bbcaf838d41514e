//! ringprep - Polygon preparation for constrained triangulation
//!
//! Takes arbitrary rings, possibly self-intersecting and possibly carrying
//! overlapping holes, and turns them into a tree of simple, correctly wound,
//! non-overlapping rings plus the constraint edges a triangulator must keep.
//! Every tolerance-sensitive test uses an epsilon derived from the size of
//! the ring involved.

pub mod bounds;
pub mod error;
pub mod polygon;
pub mod primitives;
pub mod tolerance;

pub use bounds::Aabb2;
pub use error::GeometryError;
pub use polygon::{
    BooleanOpEngine, ConstraintSet, Contour, PointRing, PolyUnionError, PolygonError,
    SelfIntersectionSplitter, WindingOrder,
};
pub use primitives::{Point2, Segment2, Vec2};
pub use tolerance::{
    classify_point, orient2d, point_on_segment, segments_intersect, Containment, Orientation,
    SegmentIntersection, Tolerances,
};
