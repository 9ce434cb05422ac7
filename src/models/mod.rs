pub mod error;
pub mod player;
pub mod snapshot;

pub use error::*;
pub use player::*;
pub use snapshot::*;
