use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The bar window is shorter than the lookback a computation needs.
    #[error("insufficient history: need {required} bars, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// The data provider failed or returned nothing usable.
    #[error("Market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// A trade plan or indicator broke an invariant after all guards ran.
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn insufficient(required: usize, available: usize) -> Self {
        Error::InsufficientData {
            required,
            available,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
