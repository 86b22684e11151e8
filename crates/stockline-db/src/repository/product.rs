//! # Product Repository
//!
//! Database operations for products over the `producto` table.
//!
//! ## FK Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              producto.codigoBarras_id (UNIQUE, NULL)            │
//! │                                                                 │
//! │  INSERT / UPDATE bind the FK from Product::barcode_id():        │
//! │    barcode attached & persisted → its id                        │
//! │    barcode missing or id == 0   → NULL                          │
//! │                                                                 │
//! │  SELECTs LEFT JOIN codigobarras to eager-load the barcode.      │
//! │  The join does NOT filter the barcode's eliminado flag: a       │
//! │  dangling FK (unsafe delete path) must stay observable as a     │
//! │  barcode with deleted = true.                                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockline_core::{Barcode, BarcodeKind, Product};

/// Product columns joined with the (optional) barcode columns, aliased for
/// [`ProductRow`].
const PRODUCT_SELECT: &str = "SELECT \
         p.id, p.eliminado AS deleted, p.nombre AS name, p.marca AS brand, \
         p.categoria AS category, p.precio AS price, p.peso AS weight, \
         cb.id AS barcode_id, cb.eliminado AS barcode_deleted, \
         cb.tipo AS barcode_kind, cb.valor AS barcode_value, \
         cb.fechaAsignacion AS barcode_assigned_on, cb.observaciones AS barcode_notes \
     FROM producto p \
     LEFT JOIN codigobarras cb ON p.codigoBarras_id = cb.id";

/// Flat row shape produced by [`PRODUCT_SELECT`]. The barcode columns are all
/// optional because of the LEFT JOIN.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    deleted: bool,
    name: String,
    brand: String,
    category: String,
    price: f64,
    weight: Option<f64>,
    barcode_id: Option<i64>,
    barcode_deleted: Option<bool>,
    barcode_kind: Option<BarcodeKind>,
    barcode_value: Option<String>,
    barcode_assigned_on: Option<NaiveDate>,
    barcode_notes: Option<String>,
}

impl ProductRow {
    /// Reassembles the entity, folding the joined columns back into an
    /// `Option<Barcode>`.
    fn into_product(self) -> DbResult<Product> {
        let barcode = match (self.barcode_id, self.barcode_kind, self.barcode_value) {
            (Some(id), Some(kind), Some(value)) => Some(Barcode {
                id,
                deleted: self.barcode_deleted.unwrap_or(false),
                kind,
                value,
                assigned_on: self.barcode_assigned_on,
                notes: self.barcode_notes,
            }),
            (None, _, _) => None,
            // A joined row with an id but NULL kind/value would violate the
            // schema's NOT NULL constraints.
            _ => {
                return Err(DbError::Internal(format!(
                    "inconsistent barcode row joined to product {}",
                    self.id
                )))
            }
        };

        Ok(Product {
            id: self.id,
            deleted: self.deleted,
            name: self.name,
            brand: self.brand,
            category: self.category,
            price: self.price,
            weight: self.weight,
            barcode,
        })
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an active product by id, barcode eager-loaded.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_in(&mut conn, id).await
    }

    /// Gets an active product on a caller-supplied connection.
    ///
    /// The safe-disassociation flow reads the product inside the same
    /// transaction that clears the FK, so the match check and the update see
    /// the same state.
    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = ?1 AND p.eliminado = 0");

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Lists all active products, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.eliminado = 0 ORDER BY p.nombre");

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Searches active products by partial name or brand match.
    ///
    /// The filter becomes `LIKE '%filter%'` on both columns; the service
    /// rejects empty filters before this runs.
    pub async fn search(&self, filter: &str) -> DbResult<Vec<Product>> {
        debug!(filter = %filter, "Searching products");

        let sql = format!(
            "{PRODUCT_SELECT} \
             WHERE p.eliminado = 0 AND (p.nombre LIKE ?1 OR p.marca LIKE ?1) \
             ORDER BY p.nombre"
        );

        let pattern = format!("%{}%", filter);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned products");
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM producto WHERE eliminado = 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes (pool-backed)
    // =========================================================================

    /// Inserts a new product and returns its generated id.
    ///
    /// The FK is bound from `product.barcode_id()`; an attached barcode must
    /// already be persisted at this point (the service guarantees it by
    /// inserting the barcode first).
    pub async fn insert(&self, product: &Product) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, product).await
    }

    /// Updates an existing product, FK included.
    ///
    /// ## Returns
    /// * `Ok(())` - update successful
    /// * `Err(DbError::NotFound)` - no active row with that id
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::update_in(&mut conn, product).await
    }

    /// Soft-deletes a product by setting `eliminado = 1`.
    ///
    /// Never touches the product's barcode: soft-deleting a product must not
    /// cascade.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Soft-deleting product");

        let result =
            sqlx::query("UPDATE producto SET eliminado = 1 WHERE id = ?1 AND eliminado = 0")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // =========================================================================
    // Writes (connection-backed, for transactions)
    // =========================================================================

    /// Inserts a product on a caller-supplied connection.
    pub async fn insert_in(conn: &mut SqliteConnection, product: &Product) -> DbResult<i64> {
        debug!(name = %product.name, barcode_id = ?product.barcode_id(), "Inserting product");

        let result = sqlx::query(
            "INSERT INTO producto (nombre, marca, categoria, precio, peso, codigoBarras_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.weight)
        .bind(product.barcode_id())
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Updates a product on a caller-supplied connection.
    ///
    /// Rewrites the FK on every update: attaching, changing, or detaching the
    /// barcode all go through here.
    pub async fn update_in(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
        debug!(id = product.id, barcode_id = ?product.barcode_id(), "Updating product");

        let result = sqlx::query(
            "UPDATE producto \
             SET nombre = ?2, marca = ?3, categoria = ?4, precio = ?5, peso = ?6, \
                 codigoBarras_id = ?7 \
             WHERE id = ?1 AND eliminado = 0",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.weight)
        .bind(product.barcode_id())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Sets the product's FK to NULL on a caller-supplied connection.
    ///
    /// First half of the safe-disassociation sequence: the FK must be cleared
    /// BEFORE the referenced barcode is soft-deleted.
    pub async fn clear_barcode_in(conn: &mut SqliteConnection, product_id: i64) -> DbResult<()> {
        debug!(product_id, "Clearing product barcode FK");

        let result = sqlx::query(
            "UPDATE producto SET codigoBarras_id = NULL WHERE id = ?1 AND eliminado = 0",
        )
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockline_core::BarcodeKind;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn yerba() -> Product {
        Product::new("Yerba Mate", "Taragüi", "Almacén", 1500.0).weight(0.5)
    }

    async fn insert_barcode(db: &Database, value: &str) -> Barcode {
        let repo = db.barcodes();
        let mut barcode = Barcode::new(BarcodeKind::Ean13, value);
        barcode.id = repo.insert(&barcode).await.unwrap();
        barcode
    }

    #[tokio::test]
    async fn test_insert_without_barcode() {
        let db = test_db().await;
        let repo = db.products();

        let id = repo.insert(&yerba()).await.unwrap();
        assert!(id > 0);

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Yerba Mate");
        assert_eq!(stored.brand, "Taragüi");
        assert_eq!(stored.price, 1500.0);
        assert_eq!(stored.weight, Some(0.5));
        assert!(stored.barcode.is_none());
    }

    #[tokio::test]
    async fn test_insert_binds_barcode_fk() {
        let db = test_db().await;
        let repo = db.products();

        let barcode = insert_barcode(&db, "7791234567890").await;
        let id = repo.insert(&yerba().barcode(barcode.clone())).await.unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        let loaded = stored.barcode.unwrap();
        assert_eq!(loaded.id, barcode.id);
        assert_eq!(loaded.value, "7791234567890");

        // FK column matches the barcode row id
        let fk: Option<i64> =
            sqlx::query_scalar("SELECT codigoBarras_id FROM producto WHERE id = ?1")
                .bind(id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(fk, Some(barcode.id));
    }

    #[tokio::test]
    async fn test_unique_fk_rejects_sharing_a_barcode() {
        let db = test_db().await;
        let repo = db.products();

        let barcode = insert_barcode(&db, "7791234567890").await;
        repo.insert(&yerba().barcode(barcode.clone())).await.unwrap();

        let second = Product::new("Mate Cocido", "Taragüi", "Almacén", 900.0).barcode(barcode);
        let err = repo.insert(&second).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_can_detach_barcode() {
        let db = test_db().await;
        let repo = db.products();

        let barcode = insert_barcode(&db, "7791234567890").await;
        let id = repo.insert(&yerba().barcode(barcode)).await.unwrap();

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        stored.barcode = None;
        stored.price = 1600.0;
        repo.update(&stored).await.unwrap();

        let reread = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(reread.barcode.is_none());
        assert_eq!(reread.price, 1600.0);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = yerba();
        product.id = 999;
        let err = repo.update(&product).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 999, .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_excludes_from_reads_and_keeps_barcode() {
        let db = test_db().await;
        let repo = db.products();

        let barcode = insert_barcode(&db, "7791234567890").await;
        let id = repo.insert(&yerba().barcode(barcode.clone())).await.unwrap();

        repo.soft_delete(id).await.unwrap();

        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(repo.get_all().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);

        // Deleting the product does not cascade to the barcode
        let still_there = db.barcodes().get_by_id(barcode.id).await.unwrap();
        assert!(still_there.is_some());

        let err = repo.soft_delete(id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_matches_name_or_brand() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&yerba()).await.unwrap();
        repo.insert(&Product::new("Café Molido", "Cabrales", "Almacén", 3200.0))
            .await
            .unwrap();

        let by_name = repo.search("Yerba").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Yerba Mate");

        let by_brand = repo.search("Cabrales").await.unwrap();
        assert_eq!(by_brand.len(), 1);
        assert_eq!(by_brand[0].name, "Café Molido");

        let partial = repo.search("al").await.unwrap();
        assert_eq!(partial.len(), 1); // matches brand "Cabrales" only

        assert!(repo.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_eager_load_shows_deleted_barcode() {
        // The unsafe delete path leaves the FK in place; the join must
        // surface the eliminated barcode rather than hide the inconsistency.
        let db = test_db().await;
        let repo = db.products();

        let barcode = insert_barcode(&db, "7791234567890").await;
        let id = repo.insert(&yerba().barcode(barcode.clone())).await.unwrap();

        db.barcodes().soft_delete(barcode.id).await.unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        let dangling = stored.barcode.unwrap();
        assert_eq!(dangling.id, barcode.id);
        assert!(dangling.deleted);
    }
}
