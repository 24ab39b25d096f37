//! # ledger-core: Pure Domain Logic for the Supply Ledger
//!
//! Entity types, fixed-point money and quantities, and input validation for
//! the procurement ledger. Zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Supply Ledger Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ledger-api (HTTP/JSON)                       │   │
//! │  │    reports, add material/unit/supplier, record receipt         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ledger-db (Ledger Store)                     │   │
//! │  │         SQLite schema, repositories, integrity rules            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledger-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ quantity  │  │ validation│  │   │
//! │  │   │ Material  │  │   Money   │  │ Quantity  │  │  widths   │  │   │
//! │  │   │ Receipt   │  │ (kopecks) │  │ (1/1000)  │  │  amounts  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Material, UnitOfMeasure, Supplier, Receipt) and report rows
//! - [`money`] - Money in integer kopecks
//! - [`quantity`] - Quantities in integer thousandths
//! - [`error`] - Validation errors
//! - [`validation`] - Field and amount rules
//!
//! ## Example Usage
//!
//! ```rust
//! use ledger_core::{Money, Quantity};
//!
//! let qty: Quantity = "500.000".parse().unwrap();
//! let price: Money = "550.50".parse().unwrap();
//!
//! assert_eq!(qty.extend(price), Money::from_kopecks(27_525_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use quantity::Quantity;
pub use types::*;
