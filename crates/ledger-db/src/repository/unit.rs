//! # Unit of Measure Repository
//!
//! Which units each material may be received in.
//!
//! Receipts reference the `(material_id, unit_name)` pair, so:
//! - a rename is carried into every receipt using the old name
//! - a pair still used by receipts cannot be deleted
//! - deleting the material removes all of its pairs

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::begin_write;
use super::material::material_exists;
use crate::error::{DbError, DbResult};
use ledger_core::validation::validate_unit_name;
use ledger_core::UnitOfMeasure;

#[derive(Debug, Clone)]
pub struct UnitOfMeasureRepository {
    pool: SqlitePool,
}

impl UnitOfMeasureRepository {
    /// Creates a new UnitOfMeasureRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UnitOfMeasureRepository { pool }
    }

    /// Registers `unit_name` as an allowed unit for a material.
    ///
    /// ## Errors
    /// * `ConstraintViolation` - blank or over-long unit name
    /// * `NotFound` - the material does not exist
    /// * `UniqueViolation` - the pair is already registered
    pub async fn add(&self, material_id: i64, unit_name: &str) -> DbResult<UnitOfMeasure> {
        validate_unit_name(unit_name)?;

        let mut tx = begin_write(&self.pool).await?;

        if !material_exists(&mut *tx, material_id).await? {
            return Err(DbError::not_found("Material", material_id));
        }

        if unit_exists(&mut *tx, material_id, unit_name).await? {
            return Err(DbError::duplicate("unit_name", pair_key(material_id, unit_name)));
        }

        sqlx::query("INSERT INTO units_of_measure (material_id, unit_name) VALUES (?1, ?2)")
            .bind(material_id)
            .bind(unit_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(material_id, unit = %unit_name, "Unit of measure added");

        Ok(UnitOfMeasure {
            material_id,
            unit_name: unit_name.to_string(),
        })
    }

    /// Units registered for a material, alphabetically.
    pub async fn list_for_material(&self, material_id: i64) -> DbResult<Vec<UnitOfMeasure>> {
        let units = sqlx::query_as::<_, UnitOfMeasure>(
            r#"
            SELECT material_id, unit_name
            FROM units_of_measure
            WHERE material_id = ?1
            ORDER BY unit_name
            "#,
        )
        .bind(material_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }

    pub async fn exists(&self, material_id: i64, unit_name: &str) -> DbResult<bool> {
        let mut conn = self.pool.acquire().await?;
        unit_exists(&mut *conn, material_id, unit_name).await
    }

    /// Renames a unit of a material. Receipts recorded in the old unit are
    /// updated in the same transaction (ON UPDATE CASCADE).
    ///
    /// Renaming a unit to its current name is a no-op.
    ///
    /// ## Errors
    /// * `ConstraintViolation` - blank or over-long new name
    /// * `NotFound` - the old pair does not exist
    /// * `UniqueViolation` - the material already has a unit called `new_name`
    pub async fn rename(
        &self,
        material_id: i64,
        old_name: &str,
        new_name: &str,
    ) -> DbResult<UnitOfMeasure> {
        validate_unit_name(new_name)?;

        let mut tx = begin_write(&self.pool).await?;

        if !unit_exists(&mut *tx, material_id, old_name).await? {
            return Err(DbError::not_found("UnitOfMeasure", pair_key(material_id, old_name)));
        }

        if old_name != new_name {
            if unit_exists(&mut *tx, material_id, new_name).await? {
                return Err(DbError::duplicate("unit_name", pair_key(material_id, new_name)));
            }

            let receipts = receipts_using(&mut *tx, material_id, old_name).await?;

            sqlx::query(
                r#"
                UPDATE units_of_measure
                SET unit_name = ?1
                WHERE material_id = ?2 AND unit_name = ?3
                "#,
            )
            .bind(new_name)
            .bind(material_id)
            .bind(old_name)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            debug!(
                material_id,
                from = %old_name,
                to = %new_name,
                receipts,
                "Unit of measure renamed"
            );
        }

        Ok(UnitOfMeasure {
            material_id,
            unit_name: new_name.to_string(),
        })
    }

    /// Removes a unit from a material.
    ///
    /// ## Errors
    /// * `NotFound` - the pair does not exist
    /// * `ReferentialBlock` - receipts were recorded in this unit
    pub async fn delete(&self, material_id: i64, unit_name: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        if !unit_exists(&mut *tx, material_id, unit_name).await? {
            return Err(DbError::not_found("UnitOfMeasure", pair_key(material_id, unit_name)));
        }

        let dependents = receipts_using(&mut *tx, material_id, unit_name).await?;
        if dependents > 0 {
            return Err(DbError::blocked(
                "UnitOfMeasure",
                pair_key(material_id, unit_name),
                dependents,
            ));
        }

        sqlx::query("DELETE FROM units_of_measure WHERE material_id = ?1 AND unit_name = ?2")
            .bind(material_id)
            .bind(unit_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(material_id, unit = %unit_name, "Unit of measure deleted");
        Ok(())
    }
}

/// `(5, литры)` style key used in error messages.
fn pair_key(material_id: i64, unit_name: &str) -> String {
    format!("({}, {})", material_id, unit_name)
}

pub(crate) async fn unit_exists(
    conn: &mut SqliteConnection,
    material_id: i64,
    unit_name: &str,
) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM units_of_measure WHERE material_id = ?1 AND unit_name = ?2",
    )
    .bind(material_id)
    .bind(unit_name)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

async fn receipts_using(
    conn: &mut SqliteConnection,
    material_id: i64,
    unit_name: &str,
) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM storage_units WHERE material_id = ?1 AND unit_of_measure_code = ?2",
    )
    .bind(material_id)
    .bind(unit_name)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use ledger_core::{Money, NewMaterial, NewReceipt, Quantity};

    async fn db_with_material() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let material = db
            .materials()
            .add(&NewMaterial::new("Краска акриловая белая").with_class("LKM"))
            .await
            .unwrap();
        (db, material.material_id)
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (db, id) = db_with_material().await;

        db.units().add(id, "литры").await.unwrap();
        db.units().add(id, "банка").await.unwrap();

        let names: Vec<String> = db
            .units()
            .list_for_material(id)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.unit_name)
            .collect();
        assert_eq!(names, vec!["банка", "литры"]);
    }

    #[tokio::test]
    async fn test_add_for_missing_material() {
        let (db, _) = db_with_material().await;

        let err = db.units().add(99, "литры").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_add_duplicate_pair() {
        let (db, id) = db_with_material().await;
        db.units().add(id, "литры").await.unwrap();

        let err = db.units().add(id, "литры").await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_rename_cascades_to_receipts() {
        let (db, id) = db_with_material().await;
        db.units().add(id, "литры").await.unwrap();
        let receipt = db
            .receipts()
            .record(&NewReceipt::new(
                NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
                id,
                "литры",
                Quantity::from_units(10),
                Money::from_rubles_kopecks(550, 50),
            ))
            .await
            .unwrap();

        db.units().rename(id, "литры", "литр").await.unwrap();

        assert!(!db.units().exists(id, "литры").await.unwrap());
        assert!(db.units().exists(id, "литр").await.unwrap());

        let reloaded = db
            .receipts()
            .get_by_order_number(receipt.order_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.unit_of_measure_code, "литр");
    }

    #[tokio::test]
    async fn test_rename_errors() {
        let (db, id) = db_with_material().await;
        db.units().add(id, "литры").await.unwrap();
        db.units().add(id, "литр").await.unwrap();

        let err = db.units().rename(id, "кг", "грамм").await.unwrap_err();
        assert!(err.is_not_found());

        let err = db.units().rename(id, "литры", "литр").await.unwrap_err();
        assert!(err.is_unique_violation());

        let err = db.units().rename(id, "литры", "").await.unwrap_err();
        assert!(err.is_constraint_violation());

        // same name is accepted and changes nothing
        db.units().rename(id, "литры", "литры").await.unwrap();
        assert!(db.units().exists(id, "литры").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_restricted_while_used() {
        let (db, id) = db_with_material().await;
        db.units().add(id, "литры").await.unwrap();
        db.units().add(id, "банка").await.unwrap();
        db.receipts()
            .record(&NewReceipt::new(
                NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
                id,
                "литры",
                Quantity::from_units(1),
                Money::zero(),
            ))
            .await
            .unwrap();

        let err = db.units().delete(id, "литры").await.unwrap_err();
        assert!(err.is_referential_block());

        db.units().delete(id, "банка").await.unwrap();
        assert!(!db.units().exists(id, "банка").await.unwrap());
    }
}
