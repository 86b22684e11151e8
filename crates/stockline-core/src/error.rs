//! # Error Types
//!
//! Domain-specific error types for stockline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  stockline-core errors (this file)                              │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  stockline-db errors (separate crate)                           │
//! │  ├── DbError          - Database operation failures             │
//! │  └── ServiceError     - Composes core + db errors               │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → ServiceError → Console     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, field names)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are caught by the
/// console layer and shown as user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product id doesn't exist in the database
    /// - Product was soft-deleted
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Barcode cannot be found.
    #[error("Barcode not found: {0}")]
    BarcodeNotFound(i64),

    /// The targeted barcode does not belong to the given product.
    ///
    /// ## When This Occurs
    /// Safe disassociation verifies that the product's stored FK matches the
    /// barcode id the caller wants to remove. Anything else is refused so a
    /// foreign barcode can never be deleted through a product it does not
    /// belong to.
    #[error("Barcode {barcode_id} does not belong to product {product_id}")]
    BarcodeMismatch { product_id: i64, barcode_id: i64 },

    /// The product has no barcode attached.
    #[error("Product {0} has no barcode attached")]
    NoBarcodeAttached(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any database work runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long for its column.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// An id that must reference a persisted row is zero or negative.
    #[error("{field} must be greater than 0")]
    InvalidId { field: &'static str },

    /// Invalid format (e.g. unknown barcode kind).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    /// Duplicate value (e.g. duplicate barcode value).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: &'static str, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
