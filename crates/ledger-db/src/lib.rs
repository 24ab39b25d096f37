//! # ledger-db: Ledger Store
//!
//! SQLite storage for the procurement ledger: material catalog, units of
//! measure, suppliers and stock receipts, plus the reports built on them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Supply Ledger Data Flow                          │
//! │                                                                         │
//! │  HTTP handler (ledger-api)  /  seed binary                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ledger-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Material      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ UnitOfMeasure │    │ 001_initial_ │  │   │
//! │  │   │ WAL + FKs     │    │ Supplier      │    │  schema.sql  │  │   │
//! │  │   │               │    │ Receipt       │    │              │  │   │
//! │  │   │               │    │ Report        │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - The store's error taxonomy
//! - [`repository`] - One repository per table, plus reports
//! - [`seed`] - Demo dataset
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("ledger.db")).await?;
//!
//! let paint = db.materials().add(&NewMaterial::new("Краска акриловая белая")).await?;
//! db.units().add(paint.material_id, "литры").await?;
//! let spent = db.reports().total_spent(start, end).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::material::MaterialRepository;
pub use repository::receipt::ReceiptRepository;
pub use repository::report::ReportRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::unit::UnitOfMeasureRepository;
