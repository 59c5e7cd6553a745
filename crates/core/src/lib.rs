pub mod estimate;
pub mod index;
pub mod select;
pub mod status;
pub mod task;

pub use estimate::{EstimatorState, ProgressSample};
pub use status::TerminalStatus;
pub use task::TaskRecord;
