pub mod snapshot_store;
pub mod delta;

pub use snapshot_store::{FlushReport, SnapshotGuard, SnapshotStore};
pub use delta::{format_delta, format_elapsed, offline_elapsed, state_label, DeltaTracker};
