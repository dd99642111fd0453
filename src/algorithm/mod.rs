pub mod line_intersector;
pub mod node_topology;
pub mod octant;

pub use line_intersector::SegmentIntersection;
pub use node_topology::{compare_angle, is_angle_greater, is_between, is_crossing};
