use thiserror::Error;

/// Broad failure class surfaced to the user alongside the message.
///
/// The same action can fail for different underlying reasons; callers that
/// need to react differently (retry, prompt sign-in, show the remote text)
/// branch on this instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The remote call could not complete (network, codec, timeout).
    Transport,
    /// The remote call completed and reported a failure message.
    Remote,
    /// A local precondition failed before any remote call was made.
    Precondition,
}

impl ErrorKind {
    /// Stable name used in logs and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Remote => "remote",
            Self::Precondition => "precondition",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised at the remote service boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// An identity-bound call was made before a credential was installed.
    #[error("Actors not initialized! Please login first.")]
    NotInitialized,

    /// The call could not complete.
    #[error("transport error calling {method}: {reason}")]
    Transport { method: &'static str, reason: String },

    /// The call did not resolve in time.
    #[error("{method} timed out after {after_ms}ms")]
    Timeout { method: &'static str, after_ms: u64 },

    /// The remote service answered with a failure message.
    #[error("{0}")]
    Remote(String),

    /// An argument was rejected before any remote call was made.
    #[error("{0}")]
    InvalidArgument(String),
}

impl GatewayError {
    /// Build a transport fault from any displayable cause.
    pub fn transport(method: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            method,
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized | Self::InvalidArgument(_) => ErrorKind::Precondition,
            Self::Transport { .. } | Self::Timeout { .. } => ErrorKind::Transport,
            Self::Remote(_) => ErrorKind::Remote,
        }
    }
}

/// Errors from the authentication lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session manager already initialized")]
    AlreadyInitialized,

    #[error("session manager not initialized")]
    NotInitialized,

    #[error("sign-in already in progress")]
    SignInInProgress,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("session storage error: {0}")]
    Storage(String),
}

impl SessionError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthFailed(_) | Self::Storage(_) => ErrorKind::Transport,
            Self::AlreadyInitialized | Self::NotInitialized | Self::SignInInProgress => {
                ErrorKind::Precondition
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Action(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
