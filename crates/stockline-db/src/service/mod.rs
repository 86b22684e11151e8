//! # Service Module
//!
//! Business orchestration over the repositories.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Service Layer                             │
//! │                                                                 │
//! │  Console menu                                                   │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ProductService / BarcodeService   ← validation, FK sequencing  │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ProductRepository / BarcodeRepository   ← SQL                  │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  SQLite                                                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The services own everything that spans both entities:
//! - insert-barcode-before-product ordering on create
//! - keeping the FK in sync on update
//! - the safe disassociation sequence (clear FK → soft-delete barcode)
//!
//! The repositories stay single-table; the menu stays logic-free.

use thiserror::Error;

use crate::error::DbError;
use stockline_core::{CoreError, ValidationError};

pub mod barcode;
pub mod product;

// =============================================================================
// Service Error
// =============================================================================

/// Errors surfaced by the service layer.
///
/// Merges domain errors (validation, business rules) with storage errors so
/// the console has a single type to render.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Business rule violation or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database operation failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Db(DbError::from(err))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
