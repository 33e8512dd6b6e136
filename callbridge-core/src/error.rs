use std::convert::Infallible;

/// Failure outcome of a call, delivered through the call's future.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The host answered with an error. The message is passed through verbatim.
    #[error("{0}")]
    Remote(String),
    #[error("invalid method name `{0}`")]
    InvalidMethod(String),
    #[error("argument could not be serialized: {0}")]
    InvalidArgument(String),
    #[error("call cancelled")]
    Cancelled,
    #[error("broker dropped before the call settled")]
    Destroyed,
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("handler `{0}` already exists")]
    AlreadyExists(String),
}

/// Failure raised on the host side while answering a call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("{0}")]
    Failed(String),
}

impl From<anyhow::Error> for HostError {
    fn from(err: anyhow::Error) -> Self {
        HostError::Failed(err.to_string())
    }
}

impl From<Infallible> for HostError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WireError {
    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed message: {0}")]
    Malformed(String),
}
