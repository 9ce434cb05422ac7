pub mod row;
pub mod runner;

pub use row::PlayerRow;
pub use runner::{CycleReport, RankTracker};
