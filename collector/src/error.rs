use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Invalid address: `{0}`")]
    InvalidAddress(String),

    #[error("Max retries ({0}) exceeded")]
    MaxRetriesExceeded(u32),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Block {0} not found")]
    BlockNotFound(u64),

    #[error("Unit conversion error: {0}")]
    Units(String),
}
