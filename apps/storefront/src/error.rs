//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in RefillHub                              │
//! │                                                                         │
//! │  Presentation                Rust storefront                            │
//! │  ────────────                ───────────────                            │
//! │                                                                         │
//! │  checkout()                                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── DbError::PoolExhausted ─────────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Rule Error? ─── CoreError::InsufficientPoints ── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code = "INSUFFICIENT_POINTS"                                        │
//! │  e.message = "Insufficient reward points: have 40, need 100"           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error is transient: it becomes a message for the user and the
//! storefront keeps running with its state intact.

use refillhub_core::CoreError;
use refillhub_store::DbError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// ## Usage in the Presentation Layer
/// ```typescript
/// switch (e.code) {
///   case 'AUTH_ERROR':
///     navigate('/login');
///     break;
///   case 'INSUFFICIENT_POINTS':
///     showToast(e.message);
///     break;
///   default:
///     showToast('Something went wrong');
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product, cart line or user
    NotFound,

    /// Input or offer choice rejected
    ValidationError,

    /// Bad credentials, duplicate email or not logged in
    AuthError,

    /// Cart is full
    CartError,

    /// Free refills need more points than the balance holds
    InsufficientPoints,

    /// The local store could not be read or written
    StorageUnavailable,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a storage error.
    pub fn storage_unavailable() -> Self {
        ApiError::new(
            ErrorCode::StorageUnavailable,
            "Your data could not be saved. Please try again.",
        )
    }
}

/// Converts store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => ApiError::from(core),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Corrupt(e) => {
                error!("Corrupt stored record: {}", e);
                ApiError::internal("Stored data could not be read")
            }
            DbError::Hashing(e) => {
                error!("Credential hashing failed: {}", e);
                ApiError::internal("Could not process credentials")
            }
            other => {
                warn!(error = %other, "Store unavailable");
                ApiError::storage_unavailable()
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::CartLineNotFound(id) => ApiError::not_found("Cart line", &id),
            CoreError::IneligibleRefill { .. }
            | CoreError::InvalidOfferChoice { .. }
            | CoreError::EmptyCart
            | CoreError::Validation(_) => ApiError::validation(message),
            CoreError::InsufficientPoints { .. } => {
                ApiError::new(ErrorCode::InsufficientPoints, message)
            }
            CoreError::CartTooLarge { .. } => ApiError::new(ErrorCode::CartError, message),
            CoreError::Auth(_) => ApiError::new(ErrorCode::AuthError, message),
        }
    }
}
