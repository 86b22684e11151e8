//! # stockline-core: Pure Business Logic for Stockline
//!
//! This crate contains the domain model and business rules of the inventory
//! system as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Stockline Architecture                       │
//! │                                                                 │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  Console Menu (apps/cli)                │   │
//! │  │    create product ──► list ──► update ──► delete        │   │
//! │  └─────────────────────────────┬───────────────────────────┘   │
//! │                                │                               │
//! │  ┌─────────────────────────────▼───────────────────────────┐   │
//! │  │            ★ stockline-core (THIS CRATE) ★              │   │
//! │  │                                                         │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────────┐     │   │
//! │  │   │   types   │  │ validation │  │     error     │     │   │
//! │  │   │  Product  │  │   rules    │  │  CoreError    │     │   │
//! │  │   │  Barcode  │  │   checks   │  │  Validation   │     │   │
//! │  │   └───────────┘  └────────────┘  └───────────────┘     │   │
//! │  │                                                         │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS    │   │
//! │  └─────────────────────────────┬───────────────────────────┘   │
//! │                                │                               │
//! │  ┌─────────────────────────────▼───────────────────────────┐   │
//! │  │               stockline-db (Database Layer)             │   │
//! │  │        SQLite queries, repositories, services           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Product, Barcode, BarcodeKind)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## The Product ↔ Barcode Relationship
//!
//! A product owns at most one barcode; a barcode belongs to at most one
//! product. The database enforces this with a UNIQUE nullable FK on the
//! product row. Both entities soft-delete: "deleting" flips a flag, never
//! removes a row. The tricky part of the whole system is keeping that FK
//! consistent across insert, update, and the two delete paths, which is the
//! service layer's job in `stockline-db`.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================
// Field length limits mirror the column widths of the original database
// contract (nombre varchar(120), marca/categoria varchar(80), valor
// varchar(20), observaciones varchar(255)).

/// Maximum length of a product name.
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of a product brand or category.
pub const MAX_BRAND_LEN: usize = 80;

/// Maximum length of a barcode value.
pub const MAX_BARCODE_VALUE_LEN: usize = 20;

/// Maximum length of barcode observation notes.
pub const MAX_NOTES_LEN: usize = 255;
