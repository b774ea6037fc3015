//! Signal collection for builder scoring
//!
//! A [`SignalSource`] exposes the raw per-address facts the engine scores
//! and the network snapshot reports carry. [`collect_signals`] and
//! [`collect_network_stats`] are the fail-soft boundary: whatever goes wrong
//! while fetching is logged and replaced by a neutral default before it
//! reaches the engine.

pub mod error;
mod retry;
pub mod rpc;
pub mod source;

pub use error::CollectorError;
pub use retry::RetryPolicy;
pub use rpc::{connect, CollectorConfig, RpcCollector};
pub use source::{collect_network_stats, collect_signals, SignalSource};
