//! # Validation Module
//!
//! Input validation for catalog, supplier and receipt writes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (pure)                                           │
//! │  ├── Required fields, column widths                                    │
//! │  ├── quantity > 0, unit_price >= 0                                     │
//! │  └── quantity × unit_price fits in i64 milli-kopecks                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository transaction (ledger-db)                           │
//! │  ├── Referenced rows exist                                             │
//! │  └── Unique keys are free                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite schema                                                │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign keys (restrict / cascade)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite does not enforce declared `VARCHAR(n)` widths, so the widths live
//! here as constants.

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{NewMaterial, NewReceipt, NewSupplier};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Column Widths
// =============================================================================

pub const CLASS_CODE_MAX: usize = 10;
pub const GROUP_CODE_MAX: usize = 10;
pub const MATERIAL_NAME_MAX: usize = 255;
pub const UNIT_NAME_MAX: usize = 50;
pub const SUPPLIER_NAME_MAX: usize = 255;
pub const TAX_ID_MAX: usize = 12;
pub const POSTAL_CODE_MAX: usize = 6;
pub const CITY_MAX: usize = 100;
pub const STREET_MAX: usize = 255;
pub const BANK_ACCOUNT_MAX: usize = 20;
pub const BALANCE_SHEET_ACCOUNT_MAX: usize = 10;
pub const DOCUMENT_CODE_MAX: usize = 10;
pub const DOCUMENT_NUMBER_MAX: usize = 20;
pub const MATERIAL_ACCOUNT_MAX: usize = 10;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required text field: not blank, at most `max` characters.
///
/// Width is counted in characters, not bytes, so Cyrillic names get the
/// same limit as Latin ones.
///
/// ## Example
/// ```rust
/// use ledger_core::validation::validate_required;
///
/// assert!(validate_required("material_name", "Краска", 255).is_ok());
/// assert!(validate_required("material_name", "   ", 255).is_err());
/// ```
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    validate_width(field, value, max)
}

/// Validates an optional text field. `None` always passes; a present value
/// must not be blank and must fit the column.
pub fn validate_optional(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) => validate_required(field, v, max),
        None => Ok(()),
    }
}

fn validate_width(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// A receipt quantity must be strictly positive; zero is rejected.
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// A unit price may be zero (free issue) but never negative.
///
/// ## Example
/// ```rust
/// use ledger_core::{validation::validate_unit_price, Money};
///
/// assert!(validate_unit_price(Money::zero()).is_ok());
/// assert!(validate_unit_price(Money::from_kopecks(-1)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_price".to_string(),
        });
    }
    Ok(())
}

/// `quantity × unit_price` must fit in an `i64` of milli-kopecks, the unit
/// reports sum in.
pub fn validate_line_value(qty: Quantity, price: Money) -> ValidationResult<()> {
    if qty.millis().checked_mul(price.kopecks()).is_none() {
        return Err(ValidationError::OutOfRange {
            field: "line_value".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

pub fn validate_new_material(material: &NewMaterial) -> ValidationResult<()> {
    validate_required("material_name", &material.material_name, MATERIAL_NAME_MAX)?;
    validate_optional("class_code", material.class_code.as_deref(), CLASS_CODE_MAX)?;
    validate_optional("group_code", material.group_code.as_deref(), GROUP_CODE_MAX)?;
    Ok(())
}

pub fn validate_unit_name(unit_name: &str) -> ValidationResult<()> {
    validate_required("unit_name", unit_name, UNIT_NAME_MAX)
}

pub fn validate_new_supplier(supplier: &NewSupplier) -> ValidationResult<()> {
    validate_required("name", &supplier.name, SUPPLIER_NAME_MAX)?;
    validate_required(
        "bank_account_number",
        &supplier.bank_account_number,
        BANK_ACCOUNT_MAX,
    )?;
    validate_optional("tax_id", supplier.tax_id.as_deref(), TAX_ID_MAX)?;

    let optional_fields = [
        ("legal_address_postal_code", &supplier.legal_address_postal_code, POSTAL_CODE_MAX),
        ("legal_address_city", &supplier.legal_address_city, CITY_MAX),
        ("legal_address_street", &supplier.legal_address_street, STREET_MAX),
        ("bank_address_postal_code", &supplier.bank_address_postal_code, POSTAL_CODE_MAX),
        ("bank_address_city", &supplier.bank_address_city, CITY_MAX),
        ("bank_address_street", &supplier.bank_address_street, STREET_MAX),
    ];
    for (field, value, max) in optional_fields {
        validate_optional(field, value.as_deref(), max)?;
    }

    Ok(())
}

/// Validates everything about a receipt that can be checked without the
/// store: amounts and field widths. Referenced rows are checked by the
/// repository.
pub fn validate_new_receipt(receipt: &NewReceipt) -> ValidationResult<()> {
    validate_quantity(receipt.quantity)?;
    validate_unit_price(receipt.unit_price)?;
    validate_line_value(receipt.quantity, receipt.unit_price)?;
    validate_unit_name(&receipt.unit_of_measure_code)?;

    validate_optional(
        "balance_sheet_account",
        receipt.balance_sheet_account.as_deref(),
        BALANCE_SHEET_ACCOUNT_MAX,
    )?;
    validate_optional(
        "document_code",
        receipt.document_code.as_deref(),
        DOCUMENT_CODE_MAX,
    )?;
    validate_optional(
        "document_number",
        receipt.document_number.as_deref(),
        DOCUMENT_NUMBER_MAX,
    )?;
    validate_optional(
        "material_account",
        receipt.material_account.as_deref(),
        MATERIAL_ACCOUNT_MAX,
    )?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
