//! # Product Service
//!
//! Orchestrates the product lifecycle and everything that touches the
//! product ↔ barcode foreign key.
//!
//! ## Create With a New Barcode
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │            create(product with unpersisted barcode)             │
//! │                                                                 │
//! │  validate product + barcode                                     │
//! │       │                                                         │
//! │       ▼               BEGIN                                     │
//! │  1. INSERT codigobarras        ← must run FIRST: the product    │
//! │       │                          FK needs the generated id      │
//! │       ▼                                                         │
//! │  2. INSERT producto (FK = new barcode id)                       │
//! │       │               COMMIT                                    │
//! │       ▼                                                         │
//! │  return entities with ids filled in                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Safe Disassociation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │            remove_barcode(product_id, barcode_id)               │
//! │                                                                 │
//! │  1. load product, verify its FK matches barcode_id              │
//! │       │               BEGIN                                     │
//! │       ▼                                                         │
//! │  2. UPDATE producto SET codigoBarras_id = NULL  ← FK cleared    │
//! │       │                                           FIRST, always │
//! │       ▼                                                         │
//! │  3. UPDATE codigobarras SET eliminado = 1                       │
//! │       │               COMMIT                                    │
//! │       ▼                                                         │
//! │  no dangling reference can survive this sequence                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invariant: a referenced barcode is never deleted before the FK pointing
//! at it is cleared. The reverse order is exactly what the unsafe
//! `BarcodeService::delete` path allows, and what this service exists to
//! prevent.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::repository::barcode::BarcodeRepository;
use crate::repository::product::ProductRepository;
use crate::service::barcode::normalize as normalize_barcode;
use crate::service::{ServiceError, ServiceResult};
use stockline_core::validation::{validate_barcode, validate_id, validate_product};
use stockline_core::{CoreError, Product, ValidationError};

/// Service for product lifecycle operations.
#[derive(Debug, Clone)]
pub struct ProductService {
    pool: SqlitePool,
    products: ProductRepository,
    barcodes: BarcodeRepository,
}

impl ProductService {
    /// Creates a new ProductService over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        ProductService {
            products: ProductRepository::new(pool.clone()),
            barcodes: BarcodeRepository::new(pool.clone()),
            pool,
        }
    }

    /// Creates a new product, coordinating an attached barcode.
    ///
    /// ## Barcode Handling
    /// - attached and unpersisted (`id == 0`): inserted FIRST, in the same
    ///   transaction, so the product row can reference the generated id
    /// - attached and persisted (`id > 0`): updated in place, not re-inserted
    /// - not attached: FK stays NULL
    ///
    /// Returns the product with its generated id (and the barcode's, if one
    /// was inserted) filled in.
    pub async fn create(&self, mut product: Product) -> ServiceResult<Product> {
        normalize(&mut product);
        validate_product(&product)?;

        if let Some(barcode) = &mut product.barcode {
            normalize_barcode(barcode);
            validate_barcode(barcode)?;
        }
        self.check_barcode_duplicate(&product).await?;

        let mut tx = self.pool.begin().await?;

        if let Some(barcode) = &mut product.barcode {
            if !barcode.is_persisted() {
                // FK ordering: barcode row first, its id feeds the product FK
                barcode.id = BarcodeRepository::insert_in(&mut tx, barcode).await?;
            } else {
                BarcodeRepository::update_in(&mut tx, barcode).await?;
            }
        }

        product.id = ProductRepository::insert_in(&mut tx, &product).await?;

        tx.commit().await?;

        info!(
            id = product.id,
            barcode_id = ?product.barcode_id(),
            name = %product.name,
            "Product created"
        );
        Ok(product)
    }

    /// Updates an existing product, FK included.
    ///
    /// Requires `id > 0`. The barcode reference is re-persisted as-is:
    /// attaching a different persisted barcode, or detaching (`barcode =
    /// None`), both land in the FK column. An attached barcode must already
    /// be persisted; `create` is the path that inserts new barcodes.
    pub async fn update(&self, mut product: Product) -> ServiceResult<Product> {
        validate_id("product id", product.id)?;
        normalize(&mut product);
        validate_product(&product)?;

        if let Some(barcode) = &product.barcode {
            if !barcode.is_persisted() {
                return Err(ValidationError::InvalidId {
                    field: "barcode id",
                }
                .into());
            }
        }

        self.products.update(&product).await?;
        debug!(id = product.id, barcode_id = ?product.barcode_id(), "Product updated");

        Ok(product)
    }

    /// Soft-deletes a product by id.
    ///
    /// Never removes or flags the product's barcode: product deletion does
    /// not cascade. The FK stays in place on the (now hidden) row.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        validate_id("product id", id)?;
        self.products.soft_delete(id).await?;
        info!(id, "Product soft-deleted");
        Ok(())
    }

    /// Gets an active product by id, barcode eager-loaded.
    pub async fn get(&self, id: i64) -> ServiceResult<Option<Product>> {
        validate_id("product id", id)?;
        Ok(self.products.get_by_id(id).await?)
    }

    /// Lists all active products.
    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.get_all().await?)
    }

    /// Searches active products by partial name or brand match.
    pub async fn search(&self, filter: &str) -> ServiceResult<Vec<Product>> {
        let filter = filter.trim();
        if filter.is_empty() {
            return Err(ValidationError::Required {
                field: "search filter",
            }
            .into());
        }
        Ok(self.products.search(filter).await?)
    }

    /// Safely deletes the barcode attached to a product.
    ///
    /// ## Sequence (the invariant this service exists for)
    /// 1. verify the product exists and its stored barcode id matches
    ///    `barcode_id`: a mismatch or a product without barcode is refused
    /// 2. clear the product's FK and persist that update
    /// 3. only then soft-delete the barcode row
    ///
    /// All three steps run in one transaction; the FK is always cleared
    /// before the barcode disappears, so no dangling reference can be left
    /// behind. Contrast with `BarcodeService::delete`, which skips steps 1–2.
    pub async fn remove_barcode(&self, product_id: i64, barcode_id: i64) -> ServiceResult<()> {
        validate_id("product id", product_id)?;
        validate_id("barcode id", barcode_id)?;

        let mut tx = self.pool.begin().await?;

        let product = ProductRepository::get_by_id_in(&mut tx, product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(product_id))?;

        match &product.barcode {
            None => return Err(CoreError::NoBarcodeAttached(product_id).into()),
            Some(attached) if attached.id != barcode_id => {
                return Err(CoreError::BarcodeMismatch {
                    product_id,
                    barcode_id,
                }
                .into())
            }
            Some(_) => {}
        }

        // FK first, barcode second. Never the other way around.
        ProductRepository::clear_barcode_in(&mut tx, product_id).await?;
        BarcodeRepository::soft_delete_in(&mut tx, barcode_id).await?;

        tx.commit().await?;

        info!(product_id, barcode_id, "Barcode disassociated and soft-deleted");
        Ok(())
    }

    /// Rejects an attached barcode whose value collides with a different
    /// active barcode.
    async fn check_barcode_duplicate(&self, product: &Product) -> ServiceResult<()> {
        if let Some(barcode) = &product.barcode {
            if let Some(existing) = self.barcodes.find_by_value(&barcode.value).await? {
                if existing.id != barcode.id {
                    return Err(ServiceError::from(ValidationError::Duplicate {
                        field: "barcode value",
                        value: barcode.value.clone(),
                    }));
                }
            }
        }
        Ok(())
    }
}

/// Trims user-entered text fields before validation and persistence.
fn normalize(product: &mut Product) {
    product.name = product.name.trim().to_string();
    product.brand = product.brand.trim().to_string();
    product.category = product.category.trim().to_string();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use stockline_core::{Barcode, BarcodeKind};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn yerba() -> Product {
        Product::new("Yerba Mate", "Taragüi", "Almacén", 1500.0).weight(0.5)
    }

    fn ean13(value: &str) -> Barcode {
        Barcode::new(BarcodeKind::Ean13, value)
    }

    #[tokio::test]
    async fn test_create_with_new_barcode_links_fk_to_generated_id() {
        let db = test_db().await;
        let svc = db.product_service();

        let created = svc
            .create(yerba().barcode(ean13("7791234567890")))
            .await
            .unwrap();

        assert!(created.id > 0);
        let barcode = created.barcode.as_ref().unwrap();
        assert!(barcode.id > 0);

        // The stored FK equals the generated barcode id
        let fk: Option<i64> =
            sqlx::query_scalar("SELECT codigoBarras_id FROM producto WHERE id = ?1")
                .bind(created.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(fk, Some(barcode.id));

        // And the barcode row exists as an active row
        let stored = db.barcodes().get_by_id(barcode.id).await.unwrap().unwrap();
        assert_eq!(stored.value, "7791234567890");
    }

    #[tokio::test]
    async fn test_create_with_persisted_barcode_updates_in_place() {
        let db = test_db().await;
        let svc = db.product_service();

        let mut existing = db
            .barcode_service()
            .create(ean13("7791234567890"))
            .await
            .unwrap();

        // Attach the existing barcode with changed notes: it must be
        // updated, not re-inserted
        existing.notes = Some("re-checked".to_string());
        let created = svc.create(yerba().barcode(existing.clone())).await.unwrap();

        assert_eq!(created.barcode.as_ref().unwrap().id, existing.id);
        assert_eq!(db.barcodes().count().await.unwrap(), 1);

        let stored = db.barcodes().get_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(stored.notes.as_deref(), Some("re-checked"));
    }

    #[tokio::test]
    async fn test_create_validates_product_fields() {
        let svc = test_db().await.product_service();

        let mut nameless = yerba();
        nameless.name = "  ".to_string();
        assert!(matches!(
            svc.create(nameless).await.unwrap_err(),
            ServiceError::Core(CoreError::Validation(ValidationError::Required {
                field: "name"
            }))
        ));

        let mut free = yerba();
        free.price = 0.0;
        assert!(matches!(
            svc.create(free).await.unwrap_err(),
            ServiceError::Core(CoreError::Validation(ValidationError::MustBePositive {
                field: "price"
            }))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_barcode_value() {
        let db = test_db().await;
        let svc = db.product_service();

        svc.create(yerba().barcode(ean13("7791234567890")))
            .await
            .unwrap();

        let second = Product::new("Mate Cocido", "Taragüi", "Almacén", 900.0)
            .barcode(ean13("7791234567890"));
        let err = svc.create(second).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));

        // The failed create left nothing behind
        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(db.barcodes().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_requires_persisted_ids() {
        let svc = test_db().await.product_service();

        assert!(matches!(
            svc.update(yerba()).await.unwrap_err(),
            ServiceError::Core(CoreError::Validation(ValidationError::InvalidId {
                field: "product id"
            }))
        ));

        let mut product = yerba();
        product.id = 1;
        product.barcode = Some(ean13("7791234567890")); // unpersisted
        assert!(matches!(
            svc.update(product).await.unwrap_err(),
            ServiceError::Core(CoreError::Validation(ValidationError::InvalidId {
                field: "barcode id"
            }))
        ));
    }

    #[tokio::test]
    async fn test_delete_product_spares_barcode() {
        let db = test_db().await;
        let svc = db.product_service();

        let created = svc
            .create(yerba().barcode(ean13("7791234567890")))
            .await
            .unwrap();
        let barcode_id = created.barcode.as_ref().unwrap().id;

        svc.delete(created.id).await.unwrap();

        assert!(svc.get(created.id).await.unwrap().is_none());
        // No cascade: the barcode is untouched and still active
        assert!(db.barcodes().get_by_id(barcode_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_barcode_clears_fk_then_deletes() {
        let db = test_db().await;
        let svc = db.product_service();

        let created = svc
            .create(yerba().barcode(ean13("7791234567890")))
            .await
            .unwrap();
        let barcode_id = created.barcode.as_ref().unwrap().id;

        svc.remove_barcode(created.id, barcode_id).await.unwrap();

        // FK cleared: the product survives with no barcode, not even a
        // deleted one
        let product = svc.get(created.id).await.unwrap().unwrap();
        assert!(product.barcode.is_none());

        let fk: Option<i64> =
            sqlx::query_scalar("SELECT codigoBarras_id FROM producto WHERE id = ?1")
                .bind(created.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(fk, None);

        // Barcode soft-deleted
        assert!(db.barcodes().get_by_id(barcode_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_barcode_refuses_mismatch() {
        let db = test_db().await;
        let svc = db.product_service();

        let created = svc
            .create(yerba().barcode(ean13("7791234567890")))
            .await
            .unwrap();
        let foreign = db
            .barcode_service()
            .create(ean13("7790000000001"))
            .await
            .unwrap();

        let err = svc.remove_barcode(created.id, foreign.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::BarcodeMismatch { .. })
        ));

        // Nothing changed: FK intact, foreign barcode alive
        let product = svc.get(created.id).await.unwrap().unwrap();
        assert!(product.barcode.is_some());
        assert!(db.barcodes().get_by_id(foreign.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_barcode_refuses_bare_product() {
        let db = test_db().await;
        let svc = db.product_service();

        let created = svc.create(yerba()).await.unwrap();

        let err = svc.remove_barcode(created.id, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::NoBarcodeAttached(_))
        ));

        let err = svc.remove_barcode(999, 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::ProductNotFound(999))));
    }

    #[tokio::test]
    async fn test_unsafe_delete_leaves_dangling_fk_safe_path_does_not() {
        let db = test_db().await;
        let svc = db.product_service();

        // Unsafe path: BarcodeService::delete doesn't know about products
        let victim = svc
            .create(yerba().barcode(ean13("7791234567890")))
            .await
            .unwrap();
        let victim_barcode = victim.barcode.as_ref().unwrap().id;

        db.barcode_service().delete(victim_barcode).await.unwrap();

        // Documented behavior: the FK still points at the eliminated row
        let dangling = svc.get(victim.id).await.unwrap().unwrap();
        let loaded = dangling.barcode.unwrap();
        assert_eq!(loaded.id, victim_barcode);
        assert!(loaded.deleted);

        // Safe path on a second product: no dangling reference afterwards
        let clean = svc
            .create(
                Product::new("Café Molido", "Cabrales", "Almacén", 3200.0)
                    .barcode(ean13("7790000000001")),
            )
            .await
            .unwrap();
        let clean_barcode = clean.barcode.as_ref().unwrap().id;

        svc.remove_barcode(clean.id, clean_barcode).await.unwrap();
        assert!(svc.get(clean.id).await.unwrap().unwrap().barcode.is_none());
    }

    #[tokio::test]
    async fn test_barcode_update_is_visible_through_product() {
        // Shared-value semantics: whoever references the barcode observes
        // the update through the eager load.
        let db = test_db().await;
        let svc = db.product_service();

        let created = svc
            .create(yerba().barcode(ean13("7791234567890")))
            .await
            .unwrap();

        let mut barcode = created.barcode.clone().unwrap();
        barcode.value = "7790000000001".to_string();
        db.barcode_service().update(barcode).await.unwrap();

        let reread = svc.get(created.id).await.unwrap().unwrap();
        assert_eq!(reread.barcode.unwrap().value, "7790000000001");
    }

    #[tokio::test]
    async fn test_search_requires_filter() {
        let svc = test_db().await.product_service();

        assert!(matches!(
            svc.search("   ").await.unwrap_err(),
            ServiceError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_reported() {
        let svc = test_db().await.product_service();

        assert!(matches!(
            svc.delete(999).await.unwrap_err(),
            ServiceError::Db(DbError::NotFound { .. })
        ));
    }
}
