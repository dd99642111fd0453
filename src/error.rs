use geo_types::{Coord, Line};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelateError {
    #[error("Non-noded intersection at {point:?} between {segment_a:?} and {segment_b:?}")]
    NonNodedIntersection {
        segment_a: Line<f64>,
        segment_b: Line<f64>,
        point: Coord<f64>,
    },

    #[error("Non-noded collapse at {p0:?} - {p1:?} - {p2:?}")]
    NonNodedCollapse {
        p0: Coord<f64>,
        p1: Coord<f64>,
        p2: Coord<f64>,
    },

    #[error("Chain endpoint {point:?} found at interior vertex {index}")]
    EndpointOnInterior { point: Coord<f64>, index: usize },

    #[error("Iterated noding failed to converge after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("Invalid intersection matrix pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, RelateError>;
