//! # Repository Module
//!
//! One repository per table, plus the read-only reports.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every write is one transaction                       │
//! │                                                                         │
//! │  db.receipts().record(&new_receipt)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_receipt()          ← ConstraintViolation, nothing opened │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN IMMEDIATE                 (waits up to busy_timeout for lock)   │
//! │  ├── referenced rows exist?      ← NotFound                            │
//! │  ├── unique keys free?           ← UniqueViolation                     │
//! │  ├── dependents on delete?       ← ReferentialBlock                    │
//! │  ├── INSERT / UPDATE / DELETE                                          │
//! │  COMMIT                          (any error: dropped, rolled back)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MaterialRepository`](material::MaterialRepository) - material catalog
//! - [`UnitOfMeasureRepository`](unit::UnitOfMeasureRepository) - allowed units per material
//! - [`SupplierRepository`](supplier::SupplierRepository) - suppliers and bank details
//! - [`ReceiptRepository`](receipt::ReceiptRepository) - stock receipts
//! - [`ReportRepository`](report::ReportRepository) - aggregate queries

pub mod material;
pub mod receipt;
pub mod report;
pub mod supplier;
pub mod unit;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbResult;

/// Opens a write transaction that already holds the write lock.
///
/// SQLite fails the read-to-write upgrade of a deferred transaction with
/// `SQLITE_BUSY` without waiting on the busy timeout, so writers lock at
/// `BEGIN IMMEDIATE` and queue there.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
