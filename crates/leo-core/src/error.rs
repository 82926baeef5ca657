use thiserror::Error;

/// Error taxonomy shared across every stage, per `spec.md` §7.
#[derive(Error, Debug)]
pub enum Error {
    #[error("upstream input unavailable: {0}")]
    InputUnavailable(String),

    #[error("upstream schema violation: {0}")]
    SchemaViolation(String),

    #[error("zero-tolerance gatekeeper rejection: {0}")]
    ZeroToleranceFailure(String),

    #[error("index store unavailable, degraded to bulk-only: {0}")]
    IndexStoreUnavailable(String),

    #[error("no optimization algorithm produced a feasible configuration: {0}")]
    NoFeasibleConfiguration(String),

    #[error("validation failed in strict mode: {0}")]
    ValidationFailed(String),

    #[error("partial failure, continuing with available data: {0}")]
    PartialFailure(String),

    #[error("stage exceeded its time budget: {0}")]
    Timeout(String),

    #[error("non-finite value produced where a finite value was required: {0}")]
    NonFiniteValue(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code per `spec.md` §6.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ZeroToleranceFailure(_) => 2,
            Error::NoFeasibleConfiguration(_) => 3,
            Error::ValidationFailed(_) => 4,
            _ => 1,
        }
    }
}
