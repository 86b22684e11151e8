//! # Barcode Service
//!
//! Validation and duplicate checking in front of [`BarcodeRepository`].
//!
//! The delete here is the UNSAFE path: it soft-deletes the barcode row
//! without checking whether a product still references it, which leaves that
//! product with a dangling FK. `ProductService::remove_barcode` is the safe
//! way to delete a barcode that is attached to a product.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::repository::barcode::BarcodeRepository;
use crate::service::{ServiceError, ServiceResult};
use stockline_core::validation::{validate_barcode, validate_id};
use stockline_core::{Barcode, ValidationError};

/// Service for barcode lifecycle operations.
#[derive(Debug, Clone)]
pub struct BarcodeService {
    repo: BarcodeRepository,
}

impl BarcodeService {
    /// Creates a new BarcodeService over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        BarcodeService {
            repo: BarcodeRepository::new(pool),
        }
    }

    /// Creates a new barcode.
    ///
    /// ## Flow
    /// 1. Normalize (trim value)
    /// 2. Validate: kind is already a closed enum, value non-empty and within
    ///    its column
    /// 3. Reject duplicate values with a readable message
    /// 4. Insert; the generated id is written back into the returned entity
    pub async fn create(&self, mut barcode: Barcode) -> ServiceResult<Barcode> {
        normalize(&mut barcode);
        validate_barcode(&barcode)?;
        self.check_duplicate_value(&barcode).await?;

        barcode.id = self.repo.insert(&barcode).await?;
        info!(id = barcode.id, value = %barcode.value, "Barcode created");

        Ok(barcode)
    }

    /// Updates an existing barcode.
    ///
    /// Requires `id > 0`: only persisted barcodes can be updated. A product
    /// referencing this barcode observes the new value through its eager
    /// load; that is the intended sharing semantics, not a bug.
    pub async fn update(&self, mut barcode: Barcode) -> ServiceResult<Barcode> {
        validate_id("barcode id", barcode.id)?;
        normalize(&mut barcode);
        validate_barcode(&barcode)?;
        self.check_duplicate_value(&barcode).await?;

        self.repo.update(&barcode).await?;
        debug!(id = barcode.id, "Barcode updated");

        Ok(barcode)
    }

    /// Soft-deletes a barcode by id. UNSAFE path.
    ///
    /// ## ⚠ Warning
    /// Does NOT check for products still referencing this barcode. A product
    /// whose FK points here is left with a dangling reference (its eager load
    /// shows a barcode flagged deleted). Use
    /// `ProductService::remove_barcode` to clear the FK first.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        validate_id("barcode id", id)?;
        self.repo.soft_delete(id).await?;
        info!(id, "Barcode soft-deleted (unsafe path)");
        Ok(())
    }

    /// Gets an active barcode by id.
    pub async fn get(&self, id: i64) -> ServiceResult<Option<Barcode>> {
        validate_id("barcode id", id)?;
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Lists all active barcodes.
    pub async fn list(&self) -> ServiceResult<Vec<Barcode>> {
        Ok(self.repo.get_all().await?)
    }

    /// Finds an active barcode by its exact value.
    pub async fn find_by_value(&self, value: &str) -> ServiceResult<Option<Barcode>> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::Required {
                field: "barcode value",
            }
            .into());
        }
        Ok(self.repo.find_by_value(value).await?)
    }

    /// Rejects a value already used by a different active barcode.
    async fn check_duplicate_value(&self, barcode: &Barcode) -> ServiceResult<()> {
        if let Some(existing) = self.repo.find_by_value(&barcode.value).await? {
            if existing.id != barcode.id {
                return Err(ServiceError::from(ValidationError::Duplicate {
                    field: "barcode value",
                    value: barcode.value.clone(),
                }));
            }
        }
        Ok(())
    }
}

/// Trims user-entered text fields before validation and persistence.
///
/// Shared with `ProductService`, which normalizes an attached barcode the
/// same way before persisting it.
pub(crate) fn normalize(barcode: &mut Barcode) {
    barcode.value = barcode.value.trim().to_string();
    if let Some(notes) = &barcode.notes {
        let trimmed = notes.trim();
        barcode.notes = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
