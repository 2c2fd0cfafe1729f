//! Error taxonomy for the sweet shop API client.
//!
//! # Design
//! The backend signals failures with an untyped `{"detail": "..."}` body; the
//! client parses that shape once, at the API boundary, into a discriminated
//! kind so controllers can branch on *what* failed without re-inspecting
//! status codes. Each variant carries the human-readable message that the
//! shell surfaces verbatim: the backend's detail when present, otherwise a
//! per-operation fallback.

use std::fmt;

/// Errors returned by `SweetShopClient` parse methods and the transport.
#[derive(Debug)]
pub enum ApiError {
    /// Bad credentials, duplicate registration, or a rejected/missing token.
    Auth(String),

    /// The server rejected malformed item fields (400/422 on create/update).
    Validation(String),

    /// The server returned 404; the requested sweet does not exist.
    NotFound(String),

    /// Insufficient stock on purchase.
    Conflict(String),

    /// Network/transport failure or an unexpected server status.
    Fetch(String),

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth(msg)
            | ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Fetch(msg) => write!(f, "{msg}"),
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_variants_display_raw_message() {
        let err = ApiError::Conflict("Insufficient stock. Only 2 items available".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient stock. Only 2 items available"
        );
    }

    #[test]
    fn boundary_variants_display_with_prefix() {
        let err = ApiError::Deserialization("expected value".to_string());
        assert_eq!(err.to_string(), "deserialization failed: expected value");
    }
}
