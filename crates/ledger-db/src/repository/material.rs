//! # Material Repository
//!
//! Database operations for the material catalog.
//!
//! ## Delete Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete(material_id)                                                   │
//! │       │                                                                 │
//! │       ├── no such material            → NotFound                       │
//! │       ├── receipts reference it       → ReferentialBlock (n receipts)  │
//! │       └── otherwise                   → row deleted, units cascade     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::begin_write;
use crate::error::{DbError, DbResult};
use ledger_core::validation::validate_new_material;
use ledger_core::{Material, NewMaterial};

/// Repository for material catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MaterialRepository::new(pool);
///
/// let paint = repo.add(&NewMaterial::new("Краска акриловая белая").with_class("LKM")).await?;
/// let same = repo.get_by_id(paint.material_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    pool: SqlitePool,
}

impl MaterialRepository {
    /// Creates a new MaterialRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaterialRepository { pool }
    }

    /// Adds a material to the catalog and returns it with its new id.
    ///
    /// ## Errors
    /// * `ConstraintViolation` - blank name or a field wider than its column
    pub async fn add(&self, material: &NewMaterial) -> DbResult<Material> {
        validate_new_material(material)?;

        let mut tx = begin_write(&self.pool).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO material_catalog (class_code, group_code, material_name)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(material.class_code.as_deref())
        .bind(material.group_code.as_deref())
        .bind(&material.material_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let material_id = result.last_insert_rowid();
        debug!(material_id, name = %material.material_name, "Material added");

        Ok(Material {
            material_id,
            class_code: material.class_code.clone(),
            group_code: material.group_code.clone(),
            material_name: material.material_name.clone(),
        })
    }

    /// Gets a material by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Material))` - Material found
    /// * `Ok(None)` - Material not found
    pub async fn get_by_id(&self, material_id: i64) -> DbResult<Option<Material>> {
        let material = sqlx::query_as::<_, Material>(
            r#"
            SELECT material_id, class_code, group_code, material_name
            FROM material_catalog
            WHERE material_id = ?1
            "#,
        )
        .bind(material_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(material)
    }

    /// Lists the whole catalog in id order.
    pub async fn list(&self) -> DbResult<Vec<Material>> {
        let materials = sqlx::query_as::<_, Material>(
            r#"
            SELECT material_id, class_code, group_code, material_name
            FROM material_catalog
            ORDER BY material_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(materials)
    }

    /// Replaces the classification and name of an existing material.
    pub async fn update(&self, material_id: i64, material: &NewMaterial) -> DbResult<Material> {
        validate_new_material(material)?;

        debug!(material_id, "Updating material");

        let result = sqlx::query(
            r#"
            UPDATE material_catalog
            SET class_code = ?1, group_code = ?2, material_name = ?3
            WHERE material_id = ?4
            "#,
        )
        .bind(material.class_code.as_deref())
        .bind(material.group_code.as_deref())
        .bind(&material.material_name)
        .bind(material_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Material", material_id));
        }

        Ok(Material {
            material_id,
            class_code: material.class_code.clone(),
            group_code: material.group_code.clone(),
            material_name: material.material_name.clone(),
        })
    }

    /// Deletes a material together with its units of measure.
    ///
    /// ## Errors
    /// * `NotFound` - no material with this id
    /// * `ReferentialBlock` - receipts still reference the material
    pub async fn delete(&self, material_id: i64) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        if !material_exists(&mut *tx, material_id).await? {
            return Err(DbError::not_found("Material", material_id));
        }

        let dependents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM storage_units WHERE material_id = ?1")
                .bind(material_id)
                .fetch_one(&mut *tx)
                .await?;

        if dependents > 0 {
            debug!(material_id, dependents, "Material delete blocked");
            return Err(DbError::blocked("Material", material_id, dependents));
        }

        // units_of_measure rows go with it (ON DELETE CASCADE)
        sqlx::query("DELETE FROM material_catalog WHERE material_id = ?1")
            .bind(material_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(material_id, "Material deleted");
        Ok(())
    }

    /// Number of materials in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM material_catalog")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// True when the catalog holds `material_id`. Runs on the caller's connection
/// so it sees the caller's transaction.
pub(crate) async fn material_exists(conn: &mut SqliteConnection, material_id: i64) -> DbResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM material_catalog WHERE material_id = ?1")
            .bind(material_id)
            .fetch_one(&mut *conn)
            .await?;

    Ok(count > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use ledger_core::{Money, NewMaterial, NewReceipt, Quantity};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let db = test_db().await;

        let added = db
            .materials()
            .add(&NewMaterial::new("Краска акриловая белая").with_class("LKM"))
            .await
            .unwrap();

        assert_eq!(added.material_id, 1);
        assert_eq!(added.class_code.as_deref(), Some("LKM"));
        assert_eq!(added.group_code, None);

        let fetched = db.materials().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(fetched, added);
        assert!(db.materials().get_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_blank_name() {
        let db = test_db().await;

        let err = db.materials().add(&NewMaterial::new("  ")).await.unwrap_err();

        assert!(err.is_constraint_violation());
        assert_eq!(db.materials().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update() {
        let db = test_db().await;
        let added = db.materials().add(&NewMaterial::new("Цемент")).await.unwrap();

        let updated = db
            .materials()
            .update(
                added.material_id,
                &NewMaterial::new("Цемент М500").with_class("STR").with_group("CEM"),
            )
            .await
            .unwrap();

        assert_eq!(updated.material_name, "Цемент М500");
        assert_eq!(
            db.materials().get_by_id(added.material_id).await.unwrap(),
            Some(updated)
        );

        let err = db
            .materials()
            .update(99, &NewMaterial::new("Нет такого"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cascades_units() {
        let db = test_db().await;
        let material = db.materials().add(&NewMaterial::new("Песок")).await.unwrap();
        db.units().add(material.material_id, "т").await.unwrap();
        db.units().add(material.material_id, "м3").await.unwrap();

        db.materials().delete(material.material_id).await.unwrap();

        assert!(db.materials().get_by_id(material.material_id).await.unwrap().is_none());
        assert!(db
            .units()
            .list_for_material(material.material_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_blocked_by_receipts() {
        let db = test_db().await;
        let material = db.materials().add(&NewMaterial::new("Песок")).await.unwrap();
        db.units().add(material.material_id, "т").await.unwrap();
        db.receipts()
            .record(&NewReceipt::new(
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                material.material_id,
                "т",
                Quantity::from_units(2),
                Money::from_rubles_kopecks(900, 0),
            ))
            .await
            .unwrap();

        let err = db.materials().delete(material.material_id).await.unwrap_err();

        assert!(err.is_referential_block());
        // rolled back: the unit is still there
        assert!(db.units().exists(material.material_id, "т").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let db = test_db().await;

        let err = db.materials().delete(42).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
