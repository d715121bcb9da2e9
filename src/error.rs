//! Rejected operations
//!
//! Nothing in the engine is fatal. Every invalid call leaves state untouched
//! and reports why through one of these.

/// A mutation the engine refused to apply
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("insufficient funds: balance {balance} is below bet {bet}")]
    InsufficientFunds { balance: u64, bet: u64 },
    #[error("invalid board size {width}x{height}")]
    InvalidLayout { width: f32, height: f32 },
    #[error("a ball is still in flight")]
    BallInFlight,
    #[error("no board has been laid out yet")]
    NoBoard,
}

/// Settings that cannot drive a session
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid settings: {0}")]
    Invalid(String),
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}
