//! # Error Types
//!
//! Domain-specific error types for refillhub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  refillhub-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations, lookups              │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── AuthError        - Login / signup failures                        │
//! │                                                                         │
//! │  refillhub-store errors (separate crate)                               │
//! │  └── DbError          - Persistence failures                           │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → transient message      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: every variant maps to a user-visible message and
//! the running storefront keeps its state.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart line id is not in the cart.
    #[error("Cart line not found: {0}")]
    CartLineNotFound(String),

    /// A refill was requested for a product that has no refill option.
    ///
    /// ## When This Occurs
    /// - Product's refill flag is off
    /// - Product has the flag but no refill price
    #[error("Product {product_id} has no refill option")]
    IneligibleRefill { product_id: String },

    /// The chosen action is not one the offer state allows.
    ///
    /// ## User Workflow
    /// ```text
    /// select_product("11")  (not refillable)
    ///      │
    ///      ▼
    /// OfferState::NoOffer
    ///      │
    ///      ▼
    /// choose(AcceptCombo) → InvalidOfferChoice
    /// ```
    #[error("{choice} is not available for this offer ({state})")]
    InvalidOfferChoice { state: String, choice: String },

    /// Redeeming points would take the balance below zero.
    #[error("Insufficient reward points: have {available}, need {required}")]
    InsufficientPoints { available: u32, required: u32 },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Authentication failure (wraps AuthError).
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Auth Error
// =============================================================================

/// Account errors from login and signup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email/password pair does not match a stored account.
    ///
    /// Deliberately does not say which half was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Signup with an email that already has an account.
    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    /// Operation needs a logged-in user.
    #[error("Please login to continue")]
    NotLoggedIn,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
