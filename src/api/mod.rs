pub mod client;
pub mod resilience;

pub use client::{BridgeClient, RankSource};
pub use resilience::{retry_with_backoff, RetryConfig};
