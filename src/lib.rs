pub mod augment;
pub mod cost;
pub mod cost_matrix;
pub mod error;
pub mod linker;
pub mod logger;
pub mod point;
pub mod segment;
pub mod solver;
pub mod sparse_matrix;

mod lapjv;

pub use cost::{BranchingCost, CostFunction, SquareDistanceCost};
pub use cost_matrix::AlternativeCost;
pub use error::LinkError;
pub use linker::JaqamanLinker;
pub use point::Point;
pub use segment::TrackSegment;
pub use sparse_matrix::SparseCostMatrix;
