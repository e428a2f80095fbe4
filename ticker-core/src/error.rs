use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickerError {
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Invalid ticker config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TickerError>;
