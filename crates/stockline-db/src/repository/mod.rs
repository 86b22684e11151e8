//! # Repository Module
//!
//! Database repository (DAO) implementations for Stockline.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Repository Pattern Explained                   │
//! │                                                                 │
//! │  Service layer                                                  │
//! │       │                                                         │
//! │       │  db.products().get_by_id(7)                             │
//! │       ▼                                                         │
//! │  ProductRepository                                              │
//! │  ├── get_by_id(&self, id)                                       │
//! │  ├── insert(&self, product)                                     │
//! │  ├── update(&self, product)                                     │
//! │  └── soft_delete(&self, id)                                     │
//! │       │                                                         │
//! │       │  SQL query                                              │
//! │       ▼                                                         │
//! │  SQLite database                                                │
//! │                                                                 │
//! │  Benefits:                                                      │
//! │  • SQL is isolated in one place                                 │
//! │  • Services stay free of query details                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//!
//! Every statement exists in two forms: a pool-backed method on the
//! repository struct, and an `*_in` associated function that runs on a
//! caller-supplied connection. The services use the `*_in` forms to keep
//! multi-statement operations (insert barcode → insert product, clear FK →
//! delete barcode) inside one transaction.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - product CRUD, search, FK handling
//! - [`BarcodeRepository`](barcode::BarcodeRepository) - barcode CRUD

pub mod barcode;
pub mod product;
