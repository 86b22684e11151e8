//! # Barcode Repository
//!
//! Database operations for barcodes over the `codigobarras` table.
//!
//! No joins here: the barcode side of the relationship is plain CRUD. All
//! reads filter `eliminado = 0`, all deletes only flip that flag.
//!
//! The raw [`soft_delete`](BarcodeRepository::soft_delete) is the UNSAFE
//! deletion path: it does not check whether a product still references the
//! barcode, so it can leave a dangling FK. The safe sequence lives in
//! `ProductService::remove_barcode`, which clears the product's FK first.

use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockline_core::Barcode;

/// Columns of `codigobarras`, aliased to the entity's field names so
/// `Barcode` decodes directly via `FromRow`.
const BARCODE_COLUMNS: &str = "id, eliminado AS deleted, tipo AS kind, valor AS value, \
     fechaAsignacion AS assigned_on, observaciones AS notes";

/// Repository for barcode database operations.
#[derive(Debug, Clone)]
pub struct BarcodeRepository {
    pool: SqlitePool,
}

impl BarcodeRepository {
    /// Creates a new BarcodeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BarcodeRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an active barcode by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Barcode))` - found and not deleted
    /// * `Ok(None)` - no row, or row is soft-deleted
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Barcode>> {
        let sql = format!(
            "SELECT {BARCODE_COLUMNS} FROM codigobarras WHERE id = ?1 AND eliminado = 0"
        );

        let barcode = sqlx::query_as::<_, Barcode>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(barcode)
    }

    /// Lists all active barcodes, ordered by value.
    pub async fn get_all(&self) -> DbResult<Vec<Barcode>> {
        let sql = format!(
            "SELECT {BARCODE_COLUMNS} FROM codigobarras WHERE eliminado = 0 ORDER BY valor"
        );

        let barcodes = sqlx::query_as::<_, Barcode>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(barcodes)
    }

    /// Finds an active barcode by its exact (unique) value.
    ///
    /// Used by the services to report duplicates with a readable message
    /// before the UNIQUE constraint fires.
    pub async fn find_by_value(&self, value: &str) -> DbResult<Option<Barcode>> {
        let sql = format!(
            "SELECT {BARCODE_COLUMNS} FROM codigobarras WHERE valor = ?1 AND eliminado = 0"
        );

        let barcode = sqlx::query_as::<_, Barcode>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(barcode)
    }

    /// Counts active barcodes (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM codigobarras WHERE eliminado = 0")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Writes (pool-backed)
    // =========================================================================

    /// Inserts a new barcode and returns its generated id.
    ///
    /// ## Returns
    /// * `Ok(i64)` - the AUTOINCREMENT id assigned by the database
    /// * `Err(DbError::UniqueViolation)` - value already exists
    pub async fn insert(&self, barcode: &Barcode) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, barcode).await
    }

    /// Updates an existing barcode.
    ///
    /// ## Returns
    /// * `Ok(())` - update successful
    /// * `Err(DbError::NotFound)` - no active row with that id
    pub async fn update(&self, barcode: &Barcode) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::update_in(&mut conn, barcode).await
    }

    /// Soft-deletes a barcode by setting `eliminado = 1`.
    ///
    /// UNSAFE path: does not check for products still referencing this
    /// barcode. Prefer `ProductService::remove_barcode` when the barcode is
    /// attached to a product.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::soft_delete_in(&mut conn, id).await
    }

    // =========================================================================
    // Writes (connection-backed, for transactions)
    // =========================================================================

    /// Inserts a barcode on a caller-supplied connection.
    ///
    /// Used inside transactions: the new-barcode-with-product flow must
    /// insert the barcode first to obtain the id the product FK needs.
    pub async fn insert_in(conn: &mut SqliteConnection, barcode: &Barcode) -> DbResult<i64> {
        debug!(value = %barcode.value, kind = %barcode.kind, "Inserting barcode");

        let result = sqlx::query(
            "INSERT INTO codigobarras (tipo, valor, fechaAsignacion, observaciones) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(barcode.kind)
        .bind(&barcode.value)
        .bind(barcode.assigned_on)
        .bind(&barcode.notes)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Updates a barcode on a caller-supplied connection.
    ///
    /// Does not touch `eliminado`: the flag only changes through soft delete.
    pub async fn update_in(conn: &mut SqliteConnection, barcode: &Barcode) -> DbResult<()> {
        debug!(id = barcode.id, "Updating barcode");

        let result = sqlx::query(
            "UPDATE codigobarras \
             SET tipo = ?2, valor = ?3, fechaAsignacion = ?4, observaciones = ?5 \
             WHERE id = ?1 AND eliminado = 0",
        )
        .bind(barcode.id)
        .bind(barcode.kind)
        .bind(&barcode.value)
        .bind(barcode.assigned_on)
        .bind(&barcode.notes)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Barcode", barcode.id));
        }

        Ok(())
    }

    /// Soft-deletes a barcode on a caller-supplied connection.
    ///
    /// Zero rows affected means the barcode doesn't exist or was already
    /// deleted; both are reported as not-found, never ignored.
    pub async fn soft_delete_in(conn: &mut SqliteConnection, id: i64) -> DbResult<()> {
        debug!(id, "Soft-deleting barcode");

        let result =
            sqlx::query("UPDATE codigobarras SET eliminado = 1 WHERE id = ?1 AND eliminado = 0")
                .bind(id)
                .execute(&mut *conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Barcode", id));
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
    use chrono::NaiveDate;
    use stockline_core::BarcodeKind;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn ean13(value: &str) -> Barcode {
        Barcode::new(BarcodeKind::Ean13, value)
            .assigned_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .notes("warehouse batch")
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_roundtrips() {
        let repo = test_db().await.barcodes();

        let barcode = ean13("7791234567890");
        let id = repo.insert(&barcode).await.unwrap();
        assert!(id > 0);

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.kind, BarcodeKind::Ean13);
        assert_eq!(stored.value, "7791234567890");
        assert_eq!(
            stored.assigned_on,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(stored.notes.as_deref(), Some("warehouse batch"));
        assert!(!stored.deleted);
    }

    #[tokio::test]
    async fn test_duplicate_value_is_rejected() {
        let repo = test_db().await.barcodes();

        repo.insert(&ean13("7791234567890")).await.unwrap();
        let err = repo.insert(&ean13("7791234567890")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_rewrites_fields() {
        let repo = test_db().await.barcodes();

        let id = repo.insert(&ean13("7791234567890")).await.unwrap();

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        stored.value = "7790000000001".to_string();
        stored.kind = BarcodeKind::Upc;
        stored.notes = None;
        repo.update(&stored).await.unwrap();

        let reread = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(reread.value, "7790000000001");
        assert_eq!(reread.kind, BarcodeKind::Upc);
        assert_eq!(reread.notes, None);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let repo = test_db().await.barcodes();

        let mut barcode = ean13("7791234567890");
        barcode.id = 999;
        let err = repo.update(&barcode).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 999, .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_row_but_keeps_it() {
        let db = test_db().await;
        let repo = db.barcodes();

        let id = repo.insert(&ean13("7791234567890")).await.unwrap();
        repo.soft_delete(id).await.unwrap();

        // Filtered reads no longer see it
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(repo.get_all().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);

        // The row itself is still there, just flagged
        let eliminated: i64 =
            sqlx::query_scalar("SELECT eliminado FROM codigobarras WHERE id = ?1")
                .bind(id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(eliminated, 1);

        // A second delete finds no active row
        let err = repo.soft_delete(id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_by_value() {
        let repo = test_db().await.barcodes();

        let id = repo.insert(&ean13("7791234567890")).await.unwrap();
        let found = repo.find_by_value("7791234567890").await.unwrap().unwrap();
        assert_eq!(found.id, id);

        assert!(repo.find_by_value("0000000000000").await.unwrap().is_none());
    }
}
