use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unparseable timestamp '{value}'")]
    TimestampParse { value: String },

    #[error("Timestamp {timestamp} cannot be shifted back by {days} days")]
    TimestampOutOfRange { timestamp: String, days: u32 },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type BalanceResult<T> = Result<T, BalanceError>;
