//! Epsilon-aware geometric predicates and tolerance configuration.
//!
//! All predicates take explicit tolerance parameters. No hidden epsilons are used;
//! rings derive theirs from [`Tolerances`].

mod config;
mod predicates;

pub(crate) use config::lit;
pub use config::{Tolerances, GLOBAL_MIN_EPSILON};
pub use predicates::{
    classify_point, is_collinear, orient2d, point_on_segment, segments_intersect,
    winding_angle_sum, Containment, Orientation, SegmentIntersection,
};
