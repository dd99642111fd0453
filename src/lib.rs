//! Segment noding and DE-9IM topological relationships for `geo-types`
//! geometries.

pub mod algorithm;
pub mod error;
pub mod index;
pub mod noding;
pub mod relate;
pub mod utils;

pub use error::{RelateError, Result};
pub use relate::predicate;
pub use relate::{
    relate, relate_pattern, relate_with, relate_with_rule, BoundaryNodeRule, Dimension, IntersectionMatrix, Location,
    RelateNG, TopologyPredicate,
};
