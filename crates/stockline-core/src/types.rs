//! # Domain Types
//!
//! Core domain entities for Stockline.
//!
//! ## Entity Relationship
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                            │
//! │                                                                 │
//! │  ┌─────────────────────┐        ┌─────────────────────┐         │
//! │  │      Product        │ 0..1   │      Barcode        │         │
//! │  │  ─────────────────  │───────►│  ─────────────────  │         │
//! │  │  id (i64, DB)       │ UNIQUE │  id (i64, DB)       │         │
//! │  │  deleted            │   FK   │  deleted            │         │
//! │  │  name (required)    │        │  kind (enum)        │         │
//! │  │  brand, category    │        │  value (UNIQUE)     │         │
//! │  │  price > 0          │        │  assigned_on        │         │
//! │  │  weight > 0         │        │  notes              │         │
//! │  └─────────────────────┘        └─────────────────────┘         │
//! │                                                                 │
//! │  A product owns at most one barcode; a barcode is referenced    │
//! │  by at most one product. Soft delete on both sides.             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Entities carry an `id: i64` assigned by the database (AUTOINCREMENT).
//! `id == 0` marks an entity that has not been persisted yet; every
//! operation that targets an existing row requires `id > 0`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Barcode Kind
// =============================================================================

/// The symbology of a barcode.
///
/// Stored as TEXT in the database (`EAN13` / `EAN8` / `UPC`), constrained by
/// a CHECK on the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum BarcodeKind {
    /// 13-digit European Article Number.
    Ean13,
    /// 8-digit European Article Number (small packages).
    Ean8,
    /// Universal Product Code.
    Upc,
}

impl BarcodeKind {
    /// Returns the canonical database/display form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BarcodeKind::Ean13 => "EAN13",
            BarcodeKind::Ean8 => "EAN8",
            BarcodeKind::Upc => "UPC",
        }
    }

    /// All supported kinds, in menu order.
    pub const ALL: [BarcodeKind; 3] = [BarcodeKind::Ean13, BarcodeKind::Ean8, BarcodeKind::Upc];
}

impl std::fmt::Display for BarcodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BarcodeKind {
    type Err = crate::error::ValidationError;

    /// Parses the kind case-insensitively ("ean13", "EAN13", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EAN13" => Ok(BarcodeKind::Ean13),
            "EAN8" => Ok(BarcodeKind::Ean8),
            "UPC" => Ok(BarcodeKind::Upc),
            _ => Err(crate::error::ValidationError::InvalidFormat {
                field: "barcode kind",
                reason: "must be one of EAN13, EAN8, UPC".to_string(),
            }),
        }
    }
}

// =============================================================================
// Barcode
// =============================================================================

/// A barcode assigned to (at most) one product.
///
/// With the `sqlx` feature enabled this decodes straight from an aliased
/// SELECT over the `codigobarras` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Barcode {
    /// Database-assigned identifier. `0` until persisted.
    pub id: i64,

    /// Soft-delete flag. Deleted barcodes are excluded from reads but their
    /// rows stay, so a product FK pointing at one never breaks physically.
    pub deleted: bool,

    /// Symbology of the code.
    pub kind: BarcodeKind,

    /// The encoded value. Unique across the whole table.
    pub value: String,

    /// Date the code was assigned to a product, if recorded.
    pub assigned_on: Option<NaiveDate>,

    /// Free-form observations.
    pub notes: Option<String>,
}

impl Barcode {
    /// Creates a new, unpersisted barcode.
    pub fn new(kind: BarcodeKind, value: impl Into<String>) -> Self {
        Barcode {
            id: 0,
            deleted: false,
            kind,
            value: value.into(),
            assigned_on: None,
            notes: None,
        }
    }

    /// Sets the assignment date (builder style).
    pub fn assigned_on(mut self, date: NaiveDate) -> Self {
        self.assigned_on = Some(date);
        self
    }

    /// Sets the observation notes (builder style).
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Whether this barcode has been stored and carries a real id.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Database-assigned identifier. `0` until persisted.
    pub id: i64,

    /// Soft-delete flag.
    pub deleted: bool,

    /// Display name. Required.
    pub name: String,

    /// Brand. Required.
    pub brand: String,

    /// Category. Required.
    pub category: String,

    /// Unit price. Must be strictly positive.
    pub price: f64,

    /// Weight in kilograms. Strictly positive when present.
    pub weight: Option<f64>,

    /// The barcode owned by this product, eager-loaded from the store.
    ///
    /// `None` means the FK column is NULL. When the unsafe barcode delete
    /// path left a dangling reference, this is `Some` with `deleted == true`
    /// so the inconsistency stays observable.
    pub barcode: Option<Barcode>,
}

impl Product {
    /// Creates a new, unpersisted product without a barcode.
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Product {
            id: 0,
            deleted: false,
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            price,
            weight: None,
            barcode: None,
        }
    }

    /// Sets the weight (builder style).
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Attaches a barcode (builder style).
    ///
    /// An unpersisted barcode (`id == 0`) is inserted before the product on
    /// create; a persisted one is updated in place.
    pub fn barcode(mut self, barcode: Barcode) -> Self {
        self.barcode = Some(barcode);
        self
    }

    /// Whether this product has been stored and carries a real id.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// The id of the attached barcode, if one is attached and persisted.
    ///
    /// This is exactly the value the FK column receives on insert/update:
    /// detached or unpersisted barcodes map to NULL.
    #[inline]
    pub fn barcode_id(&self) -> Option<i64> {
        self.barcode.as_ref().filter(|b| b.is_persisted()).map(|b| b.id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_barcode_kind_roundtrip() {
        for kind in BarcodeKind::ALL {
            assert_eq!(BarcodeKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(BarcodeKind::from_str("ean8").unwrap(), BarcodeKind::Ean8);
        assert!(BarcodeKind::from_str("QR").is_err());
    }

    #[test]
    fn test_new_entities_are_unpersisted() {
        let barcode = Barcode::new(BarcodeKind::Ean13, "7791234567890");
        assert!(!barcode.is_persisted());

        let product = Product::new("Yerba", "Taragüi", "Almacén", 1500.0);
        assert!(!product.is_persisted());
        assert!(product.barcode.is_none());
    }

    #[test]
    fn test_barcode_id_maps_to_fk_value() {
        let mut product = Product::new("Yerba", "Taragüi", "Almacén", 1500.0)
            .barcode(Barcode::new(BarcodeKind::Ean13, "7791234567890"));

        // Unpersisted barcode: FK would be NULL until it gets an id.
        assert_eq!(product.barcode_id(), None);

        product.barcode.as_mut().unwrap().id = 9;
        assert_eq!(product.barcode_id(), Some(9));

        product.barcode = None;
        assert_eq!(product.barcode_id(), None);
    }
}
