//! # stockline-db: Database Layer for Stockline
//!
//! This crate provides database access for the Stockline inventory system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Stockline Data Flow                        │
//! │                                                                 │
//! │  Console menu option ("remove barcode from product")            │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                stockline-db (THIS CRATE)                │   │
//! │  │                                                         │   │
//! │  │  ┌────────────┐   ┌──────────────┐   ┌──────────────┐  │   │
//! │  │  │  Services  │──►│ Repositories │──►│   Database   │  │   │
//! │  │  │ (FK rules, │   │ (product.rs, │   │  (pool.rs)   │  │   │
//! │  │  │ soft-del.  │   │  barcode.rs) │   │  SqlitePool  │  │   │
//! │  │  │ sequencing)│   │              │   │  Migrations  │  │   │
//! │  │  └────────────┘   └──────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  SQLite database (WAL mode, foreign keys on)                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository (DAO) implementations
//! - [`service`] - Business orchestration over the repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockline_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockline.db")).await?;
//!
//! // Simple reads via repositories
//! let products = db.products().get_all().await?;
//!
//! // Writes go through the services, which keep the FK consistent
//! let created = db.product_service().create(product).await?;
//! db.product_service().remove_barcode(created.id, barcode_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::barcode::BarcodeRepository;
pub use repository::product::ProductRepository;

// Service re-exports
pub use service::barcode::BarcodeService;
pub use service::product::ProductService;
pub use service::{ServiceError, ServiceResult};
