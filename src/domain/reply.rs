//! Decoded success/failure result returned by the remote services.

use crate::error::GatewayError;

/// Two-variant result as reported by a remote method.
///
/// Adapters decode the wire union into this type; the gateway unwraps it
/// and never passes it further inward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// The method succeeded with a payload.
    Ok(T),
    /// The method failed with a human-readable message.
    Err(String),
}

impl<T> Reply<T> {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Payload on success, `None` on failure.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    /// Payload on success, the remote message as an error otherwise.
    pub fn into_result(self) -> Result<T, GatewayError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(message) => Err(GatewayError::Remote(message)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Self::Ok(value) => Reply::Ok(f(value)),
            Self::Err(message) => Reply::Err(message),
        }
    }
}

impl<T> From<Result<T, String>> for Reply<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(message) => Self::Err(message),
        }
    }
}
