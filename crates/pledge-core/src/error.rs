use thiserror::Error;

/// Top-level error type for Pledge.
#[derive(Debug, Error)]
pub enum PledgeError {
    /// Error from the default responder (LLM provider).
    #[error("provider error: {0}")]
    Provider(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// A profile carries a zone name the clock cannot resolve.
    #[error("unknown timezone '{0}'")]
    Timezone(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
