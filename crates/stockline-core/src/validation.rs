//! # Validation Module
//!
//! Input validation for Stockline entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                          │
//! │                                                                 │
//! │  Layer 1: Console menu                                          │
//! │  ├── Type conversion (text → number, date)                      │
//! │  └── Immediate re-prompt on garbage input                       │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 2: Service (THIS MODULE, called before any DB work)      │
//! │  ├── Required fields, length limits, positive numbers           │
//! │  └── id > 0 preconditions for update/delete                     │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 3: Database (SQLite)                                     │
//! │  ├── NOT NULL / CHECK constraints                               │
//! │  ├── UNIQUE constraints (barcode value, product FK)             │
//! │  └── Foreign key constraint                                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{Barcode, Product};
use crate::{MAX_BARCODE_VALUE_LEN, MAX_BRAND_LEN, MAX_NAME_LEN, MAX_NOTES_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a product before insert or update.
///
/// ## Rules
/// - name, brand and category must be non-empty (after trim) and within
///   their column widths
/// - price must be strictly positive
/// - weight, when present, must be strictly positive
///
/// The attached barcode (if any) is validated separately by the service that
/// persists it.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_required_text("name", &product.name, MAX_NAME_LEN)?;
    validate_required_text("brand", &product.brand, MAX_BRAND_LEN)?;
    validate_required_text("category", &product.category, MAX_BRAND_LEN)?;

    // Negated comparison so NaN fails too: `NaN <= 0.0` is false, but the
    // value still isn't a valid price.
    if !(product.price > 0.0) {
        return Err(ValidationError::MustBePositive { field: "price" });
    }

    if let Some(weight) = product.weight {
        if !(weight > 0.0) {
            return Err(ValidationError::MustBePositive { field: "weight" });
        }
    }

    Ok(())
}

/// Validates a barcode before insert or update.
///
/// ## Rules
/// - value must be non-empty (after trim) and at most 20 characters
/// - notes, when present, must fit the column
///
/// The kind needs no check here: `BarcodeKind` is a closed enum, parsing
/// already rejected anything outside EAN13/EAN8/UPC.
pub fn validate_barcode(barcode: &Barcode) -> ValidationResult<()> {
    validate_required_text("barcode value", &barcode.value, MAX_BARCODE_VALUE_LEN)?;

    if let Some(notes) = &barcode.notes {
        if notes.len() > MAX_NOTES_LEN {
            return Err(ValidationError::TooLong {
                field: "notes",
                max: MAX_NOTES_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an id that must reference a persisted row.
///
/// ## Rules
/// - Must be strictly positive; 0 is the "not persisted yet" sentinel and
///   negatives are garbage input.
pub fn validate_id(field: &'static str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::InvalidId { field });
    }
    Ok(())
}

/// Validates a required text field against its column width.
pub fn validate_required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
