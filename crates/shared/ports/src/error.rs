use thiserror::Error;

/// Failures reported by the offer network collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Network unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected by network: {0}")]
    Rejected(String),
}

pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Failures reported by the wallet collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("Wallet failure: {0}")]
    Failed(String),
}

/// Failures reported by the persistence collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Persistence write failed for key {key}: {reason}")]
pub struct PersistenceError {
    pub key: String,
    pub reason: String,
}
