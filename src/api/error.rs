use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    crypto::CryptoError,
    lyrics::LookupError,
    management::{SessionError, StateError, StoreError},
    spotify::ApiError,
    warning,
};

/// Request-path failures of the gateway.
///
/// Callers only ever see a short fixed message; the detail goes to the log.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Unknown or consumed login attempt, or a forged `state`.
    #[error("login attempt could not be verified")]
    InvalidState,

    /// The provider reported an error or sent no code.
    #[error("login denied: {0}")]
    LoginDenied(String),

    /// Session or state store unreachable or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Identity provider or lyrics service failed.
    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("unknown player action: {0}")]
    UnknownAction(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidState => StatusCode::BAD_REQUEST,
            Self::LoginDenied(_) => StatusCode::UNAUTHORIZED,
            Self::Unavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::UnknownAction(_) => StatusCode::NOT_FOUND,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidState | Self::LoginDenied(_) => "Login failed. Please log in again.",
            Self::Unavailable(_) => "Service temporarily unavailable.",
            Self::Upstream(_) => "Upstream service unavailable.",
            Self::UnknownAction(_) => "Not found.",
            Self::Internal(_) => "Internal error.",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        warning!("{}", self);
        (self.status(), self.public_message()).into_response()
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        Self::Unavailable(e.to_string())
    }
}

impl From<StateError> for GatewayError {
    fn from(e: StateError) -> Self {
        match e {
            StateError::InvalidState => Self::InvalidState,
            StateError::Store(e) => e.into(),
        }
    }
}

impl From<SessionError> for GatewayError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Store(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<CryptoError> for GatewayError {
    fn from(e: CryptoError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<ApiError> for GatewayError {
    fn from(e: ApiError) -> Self {
        Self::Upstream(e.to_string())
    }
}

impl From<LookupError> for GatewayError {
    fn from(e: LookupError) -> Self {
        Self::Upstream(e.to_string())
    }
}
