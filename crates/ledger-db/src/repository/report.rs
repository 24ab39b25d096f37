//! # Report Repository
//!
//! Read-only aggregate queries over the ledger.
//!
//! ## Amounts
//! `quantity` is stored in thousandths and `unit_price` in kopecks, so
//! `quantity * unit_price` is exact in milli-kopecks and, by receipt
//! validation, fits in an `i64`. SQL yields one such line value per receipt;
//! totals are summed here in `i128` and rounded to the kopeck once, at the
//! end:
//! ```text
//! 500.000 × 550.50  →  500000 × 55050 = 27_525_000_000 milli-kopecks
//!                   →  Money::from_milli_kopecks(..) = 275250.00
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use ledger_core::{
    BankSupplierCount, InventoryValue, MaterialAssortment, Money, MonthlyLoad, OrderBankInfo,
    Quantity, SupplierBankInfo, SupplierShare,
};

/// Repository for ledger reports.
///
/// ## Usage
/// ```rust,ignore
/// let reports = db.reports();
///
/// let spent = reports.total_spent(jan_1, dec_31).await?;
/// let by_month = reports.monthly_load(2025).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Name of the supplier with the given taxpayer id.
    pub async fn supplier_name_by_tax_id(&self, tax_id: &str) -> DbResult<Option<String>> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM suppliers WHERE tax_id = ?1")
                .bind(tax_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(name)
    }

    /// Suppliers whose bank is located in `city`, by name.
    pub async fn suppliers_by_bank_city(&self, city: &str) -> DbResult<Vec<SupplierBankInfo>> {
        let suppliers = sqlx::query_as::<_, SupplierBankInfo>(
            r#"
            SELECT name, tax_id
            FROM suppliers
            WHERE bank_address_city = ?1
            ORDER BY name
            "#,
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// How many suppliers bank in each city, busiest city first.
    ///
    /// Suppliers without a bank city are left out.
    pub async fn bank_supplier_counts(&self) -> DbResult<Vec<BankSupplierCount>> {
        let counts = sqlx::query_as::<_, BankSupplierCount>(
            r#"
            SELECT bank_address_city, COUNT(supplier_id) AS supplier_count
            FROM suppliers
            WHERE bank_address_city IS NOT NULL
            GROUP BY bank_address_city
            ORDER BY supplier_count DESC, bank_address_city
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Assortment of a material group.
    pub async fn materials_by_group(&self, group_code: &str) -> DbResult<Vec<MaterialAssortment>> {
        let materials = sqlx::query_as::<_, MaterialAssortment>(
            r#"
            SELECT material_name, class_code
            FROM material_catalog
            WHERE group_code = ?1
            ORDER BY material_name
            "#,
        )
        .bind(group_code)
        .fetch_all(&self.pool)
        .await?;

        Ok(materials)
    }

    /// Total value of receipts dated within `start..=end`.
    ///
    /// An empty period costs zero.
    pub async fn total_spent(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Money> {
        debug!(%start, %end, "Computing total spent");

        let lines: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT quantity * unit_price
            FROM storage_units
            WHERE date BETWEEN ?1 AND ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(Money::from_milli_kopecks(milli_total(lines)))
    }

    /// Quantity received and its value per material, highest value first.
    ///
    /// Materials that were never received are not listed.
    pub async fn stock_value(&self) -> DbResult<Vec<InventoryValue>> {
        let rows: Vec<(i64, String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT mc.material_id, mc.material_name, su.quantity, su.quantity * su.unit_price
            FROM storage_units su
            JOIN material_catalog mc ON mc.material_id = su.material_id
            ORDER BY mc.material_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // (material_id, material_name, quantity millis, value milli-kopecks)
        let mut totals: Vec<(i64, String, i128, i128)> = Vec::new();
        for (material_id, material_name, quantity, milli) in rows {
            match totals.last_mut() {
                Some(last) if last.0 == material_id => {
                    last.2 += i128::from(quantity);
                    last.3 += i128::from(milli);
                }
                _ => totals.push((
                    material_id,
                    material_name,
                    i128::from(quantity),
                    i128::from(milli),
                )),
            }
        }
        totals.sort_by(|a, b| b.3.cmp(&a.3).then(a.0.cmp(&b.0)));

        Ok(totals
            .into_iter()
            .map(|(material_id, material_name, quantity, milli)| InventoryValue {
                material_id,
                material_name,
                total_quantity: Quantity::from_millis(saturate(quantity)),
                total_value: Money::from_milli_kopecks(milli),
            })
            .collect())
    }

    /// What part of a material group's purchases came from one supplier.
    ///
    /// `supplier_share` is `None` when nothing of the group was ever
    /// received; an unknown supplier simply has a zero share.
    pub async fn supplier_share(&self, supplier_id: i64, group_code: &str) -> DbResult<SupplierShare> {
        let lines: Vec<(Option<i64>, i64)> = sqlx::query_as(
            r#"
            SELECT su.supplier_id, su.quantity * su.unit_price
            FROM storage_units su
            JOIN material_catalog mc ON mc.material_id = su.material_id
            WHERE mc.group_code = ?1
            "#,
        )
        .bind(group_code)
        .fetch_all(&self.pool)
        .await?;

        let group_milli = milli_total(lines.iter().map(|(_, milli)| *milli));
        let supplier_milli = milli_total(
            lines
                .iter()
                .filter(|(supplier, _)| *supplier == Some(supplier_id))
                .map(|(_, milli)| *milli),
        );

        let supplier_share = if group_milli == 0 {
            None
        } else {
            Some(supplier_milli as f64 / group_milli as f64)
        };

        Ok(SupplierShare {
            supplier_id,
            group_code: group_code.to_string(),
            supplier_value: Money::from_milli_kopecks(supplier_milli),
            group_value: Money::from_milli_kopecks(group_milli),
            supplier_share,
        })
    }

    /// Receipt value per calendar month of `year`. Months without receipts
    /// are omitted.
    pub async fn monthly_load(&self, year: i32) -> DbResult<Vec<MonthlyLoad>> {
        // dates are stored as ISO-8601 text
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT
                CAST(strftime('%m', date) AS INTEGER) AS month,
                quantity * unit_price
            FROM storage_units
            WHERE CAST(strftime('%Y', date) AS INTEGER) = ?1
            ORDER BY month
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        let mut months: Vec<(i64, i128)> = Vec::new();
        for (month, milli) in rows {
            match months.last_mut() {
                Some(last) if last.0 == month => last.1 += i128::from(milli),
                _ => months.push((month, i128::from(milli))),
            }
        }

        Ok(months
            .into_iter()
            .map(|(month, milli)| MonthlyLoad {
                month: month as u32,
                monthly_value: Money::from_milli_kopecks(milli),
            })
            .collect())
    }

    /// Bank city of the supplier and value of a single receipt.
    ///
    /// `None` when the receipt does not exist or was recorded without a
    /// supplier.
    pub async fn order_bank_info(&self, order_number: i64) -> DbResult<Option<OrderBankInfo>> {
        let row: Option<(i64, Option<String>, i64)> = sqlx::query_as(
            r#"
            SELECT su.order_number, s.bank_address_city, su.quantity * su.unit_price
            FROM storage_units su
            JOIN suppliers s ON s.supplier_id = su.supplier_id
            WHERE su.order_number = ?1
            "#,
        )
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(order_number, bank_address_city, milli)| OrderBankInfo {
            order_number,
            bank_address_city,
            total_amount: Money::from_milli_kopecks(i128::from(milli)),
        }))
    }
}

fn milli_total(lines: impl IntoIterator<Item = i64>) -> i128 {
    lines.into_iter().map(i128::from).sum()
}

fn saturate(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

// =============================================================================
// Unit Tests
// =============================================================================
