//! # Receipt Repository
//!
//! Inbound stock receipts, stored in the `storage_units` table.
//!
//! ## Recording a Receipt
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(&NewReceipt)                                                   │
//! │       │                                                                 │
//! │       ├── quantity <= 0, unit_price < 0, bad field   → ConstraintViolation
//! │       │                                                                 │
//! │       ▼  BEGIN                                                         │
//! │       ├── supplier given but missing                 → NotFound        │
//! │       ├── material missing                           → NotFound        │
//! │       ├── (material, unit) not registered            → NotFound        │
//! │       ▼                                                                 │
//! │  INSERT INTO storage_units → order_number                              │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::begin_write;
use super::material::material_exists;
use super::supplier::supplier_exists;
use super::unit::unit_exists;
use crate::error::{DbError, DbResult};
use ledger_core::validation::validate_new_receipt;
use ledger_core::{NewReceipt, Receipt};

const RECEIPT_COLUMNS: &str = r#"
    order_number, date, supplier_id,
    balance_sheet_account, document_code, document_number, material_account,
    material_id, unit_of_measure_code, quantity, unit_price
"#;

/// Repository for stock receipt operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Records an inbound receipt and returns it with its order number.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let receipt = db.receipts().record(
    ///     &NewReceipt::new(date, 5, "литры", "500.000".parse()?, "550.50".parse()?)
    ///         .from_supplier(1),
    /// ).await?;
    /// assert_eq!(receipt.line_value().to_string(), "275250.00");
    /// ```
    pub async fn record(&self, receipt: &NewReceipt) -> DbResult<Receipt> {
        validate_new_receipt(receipt)?;

        let mut tx = begin_write(&self.pool).await?;

        if let Some(supplier_id) = receipt.supplier_id {
            if !supplier_exists(&mut *tx, supplier_id).await? {
                return Err(DbError::not_found("Supplier", supplier_id));
            }
        }

        if !material_exists(&mut *tx, receipt.material_id).await? {
            return Err(DbError::not_found("Material", receipt.material_id));
        }

        if !unit_exists(&mut *tx, receipt.material_id, &receipt.unit_of_measure_code).await? {
            return Err(DbError::not_found(
                "UnitOfMeasure",
                format!("({}, {})", receipt.material_id, receipt.unit_of_measure_code),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO storage_units (
                date, supplier_id,
                balance_sheet_account, document_code, document_number, material_account,
                material_id, unit_of_measure_code, quantity, unit_price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(receipt.date)
        .bind(receipt.supplier_id)
        .bind(receipt.balance_sheet_account.as_deref())
        .bind(receipt.document_code.as_deref())
        .bind(receipt.document_number.as_deref())
        .bind(receipt.material_account.as_deref())
        .bind(receipt.material_id)
        .bind(&receipt.unit_of_measure_code)
        .bind(receipt.quantity)
        .bind(receipt.unit_price)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let order_number = result.last_insert_rowid();
        info!(
            order_number,
            material_id = receipt.material_id,
            quantity = %receipt.quantity,
            value = %receipt.line_value(),
            "Receipt recorded"
        );

        Ok(Receipt {
            order_number,
            date: receipt.date,
            supplier_id: receipt.supplier_id,
            balance_sheet_account: receipt.balance_sheet_account.clone(),
            document_code: receipt.document_code.clone(),
            document_number: receipt.document_number.clone(),
            material_account: receipt.material_account.clone(),
            material_id: receipt.material_id,
            unit_of_measure_code: receipt.unit_of_measure_code.clone(),
            quantity: receipt.quantity,
            unit_price: receipt.unit_price,
        })
    }

    /// Gets a receipt by its order number.
    pub async fn get_by_order_number(&self, order_number: i64) -> DbResult<Option<Receipt>> {
        let receipt = sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {} FROM storage_units WHERE order_number = ?1",
            RECEIPT_COLUMNS
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// Receipts dated within `start..=end`, oldest first.
    pub async fn list_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Receipt>> {
        debug!(%start, %end, "Listing receipts");

        let receipts = sqlx::query_as::<_, Receipt>(&format!(
            r#"
            SELECT {}
            FROM storage_units
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date, order_number
            "#,
            RECEIPT_COLUMNS
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    /// All receipts of one material in order-number order.
    pub async fn list_for_material(&self, material_id: i64) -> DbResult<Vec<Receipt>> {
        let receipts = sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {} FROM storage_units WHERE material_id = ?1 ORDER BY order_number",
            RECEIPT_COLUMNS
        ))
        .bind(material_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    /// Deletes a receipt. Its order number is never issued again.
    pub async fn delete(&self, order_number: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM storage_units WHERE order_number = ?1")
            .bind(order_number)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Receipt", order_number));
        }

        debug!(order_number, "Receipt deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM storage_units")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use ledger_core::{Money, NewMaterial, NewSupplier, Quantity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// One material (id 1) with unit "литры" and one supplier (id 1).
    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.materials()
            .add(&NewMaterial::new("Краска акриловая белая").with_class("LKM"))
            .await
            .unwrap();
        db.units().add(1, "литры").await.unwrap();
        db.suppliers()
            .add(&NewSupplier::new("ООО \"СтройМастер\"", "40702810100000001001"))
            .await
            .unwrap();
        db
    }

    fn paint(qty: &str, price: &str) -> NewReceipt {
        NewReceipt::new(
            date(2025, 11, 1),
            1,
            "литры",
            qty.parse().unwrap(),
            price.parse().unwrap(),
        )
        .from_supplier(1)
    }

    #[tokio::test]
    async fn test_record_and_reload() {
        let db = setup().await;

        let receipt = db
            .receipts()
            .record(&paint("500.000", "550.50").with_document("ПН", "17").with_accounts("10", "10.01"))
            .await
            .unwrap();

        assert_eq!(receipt.order_number, 1);

        let reloaded = db.receipts().get_by_order_number(1).await.unwrap().unwrap();
        assert_eq!(reloaded, receipt);
        assert_eq!(reloaded.quantity, Quantity::from_units(500));
        assert_eq!(reloaded.unit_price, Money::from_rubles_kopecks(550, 50));
        assert_eq!(reloaded.document_number.as_deref(), Some("17"));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_zero_price_accepted() {
        let db = setup().await;

        let err = db.receipts().record(&paint("0", "550.50")).await.unwrap_err();
        assert!(err.is_constraint_violation());

        let err = db.receipts().record(&paint("1", "-0.01")).await.unwrap_err();
        assert!(err.is_constraint_violation());

        let free = db.receipts().record(&paint("1", "0")).await.unwrap();
        assert!(free.unit_price.is_zero());
        assert_eq!(db.receipts().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_unit_rejected() {
        let db = setup().await;

        let mut receipt = paint("1", "10");
        receipt.unit_of_measure_code = "кг".to_string();

        let err = db.receipts().record(&receipt).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(db.receipts().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_references_rejected() {
        let db = setup().await;

        let err = db.receipts().record(&paint("1", "10").from_supplier(7)).await.unwrap_err();
        assert!(err.is_not_found());

        let mut receipt = paint("1", "10");
        receipt.material_id = 9;
        let err = db.receipts().record(&receipt).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_receipt_without_supplier() {
        let db = setup().await;

        let mut receipt = paint("3", "100");
        receipt.supplier_id = None;

        let recorded = db.receipts().record(&receipt).await.unwrap();
        assert_eq!(recorded.supplier_id, None);
    }

    #[tokio::test]
    async fn test_list_between_is_inclusive() {
        let db = setup().await;
        for day in [1, 15, 30] {
            let mut receipt = paint("1", "10");
            receipt.date = date(2025, 6, day);
            db.receipts().record(&receipt).await.unwrap();
        }

        let receipts = db
            .receipts()
            .list_between(date(2025, 6, 1), date(2025, 6, 15))
            .await
            .unwrap();

        let days: Vec<NaiveDate> = receipts.iter().map(|r| r.date).collect();
        assert_eq!(days, vec![date(2025, 6, 1), date(2025, 6, 15)]);
        assert_eq!(db.receipts().list_for_material(1).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_then_supplier_free() {
        let db = setup().await;
        let receipt = db.receipts().record(&paint("1", "10")).await.unwrap();

        assert!(db.suppliers().delete(1).await.unwrap_err().is_referential_block());

        db.receipts().delete(receipt.order_number).await.unwrap();
        assert!(db.receipts().delete(receipt.order_number).await.unwrap_err().is_not_found());

        db.suppliers().delete(1).await.unwrap();
    }
}
