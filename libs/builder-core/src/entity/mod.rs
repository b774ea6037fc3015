pub mod builder;
pub mod network;

// Re-exports for convenience
pub use builder::{normalize_address, BuilderRecord, BuilderSignals};
pub use network::NetworkStats;
