//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! ## Unique Keys
//! Both `tax_id` (when present) and `bank_account_number` identify a
//! supplier. Adding or updating a supplier onto a key another supplier
//! already holds fails with `UniqueViolation` before anything is written.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::begin_write;
use crate::error::{DbError, DbResult};
use ledger_core::validation::validate_new_supplier;
use ledger_core::{NewSupplier, Supplier};

const SUPPLIER_COLUMNS: &str = r#"
    supplier_id, name, tax_id,
    legal_address_postal_code, legal_address_city, legal_address_street,
    bank_address_postal_code, bank_address_city, bank_address_street,
    bank_account_number
"#;

/// Repository for supplier operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = SupplierRepository::new(pool);
///
/// let supplier = repo
///     .add(&NewSupplier::new("ООО \"СтройМастер\"", "40702810100000001001").with_tax_id("7701234567"))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Adds a supplier and returns it with its new id.
    ///
    /// ## Errors
    /// * `ConstraintViolation` - missing name or bank account, field too long
    /// * `UniqueViolation` - tax_id or bank_account_number already taken
    pub async fn add(&self, supplier: &NewSupplier) -> DbResult<Supplier> {
        validate_new_supplier(supplier)?;

        let mut tx = begin_write(&self.pool).await?;

        ensure_keys_free(&mut *tx, supplier, None).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (
                name, tax_id,
                legal_address_postal_code, legal_address_city, legal_address_street,
                bank_address_postal_code, bank_address_city, bank_address_street,
                bank_account_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&supplier.name)
        .bind(supplier.tax_id.as_deref())
        .bind(supplier.legal_address_postal_code.as_deref())
        .bind(supplier.legal_address_city.as_deref())
        .bind(supplier.legal_address_street.as_deref())
        .bind(supplier.bank_address_postal_code.as_deref())
        .bind(supplier.bank_address_city.as_deref())
        .bind(supplier.bank_address_street.as_deref())
        .bind(&supplier.bank_account_number)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let supplier_id = result.last_insert_rowid();
        debug!(supplier_id, name = %supplier.name, "Supplier added");

        Ok(to_supplier(supplier_id, supplier))
    }

    /// Gets a supplier by its id.
    pub async fn get_by_id(&self, supplier_id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers WHERE supplier_id = ?1",
            SUPPLIER_COLUMNS
        ))
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Gets a supplier by taxpayer id.
    pub async fn get_by_tax_id(&self, tax_id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers WHERE tax_id = ?1",
            SUPPLIER_COLUMNS
        ))
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Lists all suppliers in id order.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {} FROM suppliers ORDER BY supplier_id",
            SUPPLIER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Replaces every field of an existing supplier.
    ///
    /// The unique keys are checked against the other suppliers only, so a
    /// supplier may keep its own tax_id and bank account.
    pub async fn update(&self, supplier_id: i64, supplier: &NewSupplier) -> DbResult<Supplier> {
        validate_new_supplier(supplier)?;

        let mut tx = begin_write(&self.pool).await?;

        if !supplier_exists(&mut *tx, supplier_id).await? {
            return Err(DbError::not_found("Supplier", supplier_id));
        }

        ensure_keys_free(&mut *tx, supplier, Some(supplier_id)).await?;

        sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?1,
                tax_id = ?2,
                legal_address_postal_code = ?3,
                legal_address_city = ?4,
                legal_address_street = ?5,
                bank_address_postal_code = ?6,
                bank_address_city = ?7,
                bank_address_street = ?8,
                bank_account_number = ?9
            WHERE supplier_id = ?10
            "#,
        )
        .bind(&supplier.name)
        .bind(supplier.tax_id.as_deref())
        .bind(supplier.legal_address_postal_code.as_deref())
        .bind(supplier.legal_address_city.as_deref())
        .bind(supplier.legal_address_street.as_deref())
        .bind(supplier.bank_address_postal_code.as_deref())
        .bind(supplier.bank_address_city.as_deref())
        .bind(supplier.bank_address_street.as_deref())
        .bind(&supplier.bank_account_number)
        .bind(supplier_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(supplier_id, "Supplier updated");
        Ok(to_supplier(supplier_id, supplier))
    }

    /// Deletes a supplier that no receipt references.
    ///
    /// ## Errors
    /// * `NotFound` - no supplier with this id
    /// * `ReferentialBlock` - receipts still reference the supplier
    pub async fn delete(&self, supplier_id: i64) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        if !supplier_exists(&mut *tx, supplier_id).await? {
            return Err(DbError::not_found("Supplier", supplier_id));
        }

        let dependents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM storage_units WHERE supplier_id = ?1")
                .bind(supplier_id)
                .fetch_one(&mut *tx)
                .await?;

        if dependents > 0 {
            debug!(supplier_id, dependents, "Supplier delete blocked");
            return Err(DbError::blocked("Supplier", supplier_id, dependents));
        }

        sqlx::query("DELETE FROM suppliers WHERE supplier_id = ?1")
            .bind(supplier_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(supplier_id, "Supplier deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn to_supplier(supplier_id: i64, supplier: &NewSupplier) -> Supplier {
    Supplier {
        supplier_id,
        name: supplier.name.clone(),
        tax_id: supplier.tax_id.clone(),
        legal_address_postal_code: supplier.legal_address_postal_code.clone(),
        legal_address_city: supplier.legal_address_city.clone(),
        legal_address_street: supplier.legal_address_street.clone(),
        bank_address_postal_code: supplier.bank_address_postal_code.clone(),
        bank_address_city: supplier.bank_address_city.clone(),
        bank_address_street: supplier.bank_address_street.clone(),
        bank_account_number: supplier.bank_account_number.clone(),
    }
}

pub(crate) async fn supplier_exists(conn: &mut SqliteConnection, supplier_id: i64) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE supplier_id = ?1")
        .bind(supplier_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

/// Fails with `UniqueViolation` if another supplier holds the tax id or the
/// bank account. `except` is the supplier being updated, if any.
async fn ensure_keys_free(
    conn: &mut SqliteConnection,
    supplier: &NewSupplier,
    except: Option<i64>,
) -> DbResult<()> {
    // -1 never matches a real id
    let except = except.unwrap_or(-1);

    if let Some(tax_id) = supplier.tax_id.as_deref() {
        let taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM suppliers WHERE tax_id = ?1 AND supplier_id != ?2",
        )
        .bind(tax_id)
        .bind(except)
        .fetch_one(&mut *conn)
        .await?;

        if taken > 0 {
            return Err(DbError::duplicate("tax_id", tax_id));
        }
    }

    let taken: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM suppliers WHERE bank_account_number = ?1 AND supplier_id != ?2",
    )
    .bind(&supplier.bank_account_number)
    .bind(except)
    .fetch_one(&mut *conn)
    .await?;

    if taken > 0 {
        return Err(DbError::duplicate(
            "bank_account_number",
            supplier.bank_account_number.as_str(),
        ));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
