//! # Error Types
//!
//! Domain-specific error types for theka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  theka-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  theka-db errors (separate crate)                                   │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── LedgerError      - CoreError ∪ DbError at the op boundary      │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → LedgerError → Caller           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (brand label, counts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They should be caught
/// and translated to user-friendly messages by the presentation layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Brand id does not resolve to a catalog row.
    #[error("Brand not found: {0}")]
    BrandNotFound(String),

    /// Transaction id does not resolve to a sale record.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Requested quantity exceeds available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=2
    ///      │
    ///      ▼
    /// InsufficientStock { brand: "Royal Stag 750ml", available: 2, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Not enough stock for Royal Stag 750ml..."
    /// ```
    #[error("Not enough stock for {brand}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        brand: String,
        available: i64,
        requested: i64,
    },

    /// Owner password did not match the configured secret.
    ///
    /// Deliberately carries no further detail - the caller learns only that
    /// the password was wrong.
    #[error("Unauthorized: Invalid owner password")]
    Unauthorized,

    /// Cart checkout was attempted with no items.
    #[error("Cart cannot be empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Stock restoration for multi-item sales is not implemented.
    ///
    /// ## Why
    /// Deleting a cart sale would need to restore every line's stock. The
    /// source system never restored per-item stock, so restoration stays
    /// restricted to the single-item shape until that intent is confirmed.
    #[error("Deleting multi-item transactions is not supported: {0}")]
    MultiItemDeleteUnsupported(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
