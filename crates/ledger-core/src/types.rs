//! # Domain Types
//!
//! Entities of the procurement ledger and the rows produced by its reports.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────┐  1    n ┌──────────────────┐                     │
//! │  │ Material         │────────►│ UnitOfMeasure    │                     │
//! │  │ ──────────────── │ cascade │ ──────────────── │                     │
//! │  │ material_id (PK) │  delete │ material_id  (PK)│                     │
//! │  │ class_code       │         │ unit_name    (PK)│                     │
//! │  │ group_code       │         └────────┬─────────┘                     │
//! │  │ material_name    │                  │ 1                             │
//! │  └──────────────────┘                  │ restrict delete               │
//! │                                        │ cascade update                │
//! │  ┌──────────────────┐  1    n ┌────────▼─────────┐                     │
//! │  │ Supplier         │────────►│ Receipt          │                     │
//! │  │ ──────────────── │restrict │ ──────────────── │                     │
//! │  │ supplier_id (PK) │         │ order_number (PK)│                     │
//! │  │ tax_id    UNIQUE │         │ date             │                     │
//! │  │ bank_acct UNIQUE │         │ quantity  > 0    │                     │
//! │  └──────────────────┘         │ unit_price >= 0  │                     │
//! │                               └──────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity uses a surrogate integer key assigned by the store. Ids are
//! never reused, even after the row is deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Material Catalog
// =============================================================================

/// A catalog material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Material {
    pub material_id: i64,
    /// Classification class (e.g. `LKM` for paints and coatings).
    pub class_code: Option<String>,
    /// Classification group inside the class.
    pub group_code: Option<String>,
    /// Display name.
    pub material_name: String,
}

/// Input for adding or updating a catalog material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMaterial {
    #[serde(default)]
    pub class_code: Option<String>,
    #[serde(default)]
    pub group_code: Option<String>,
    pub material_name: String,
}

impl NewMaterial {
    pub fn new(material_name: impl Into<String>) -> Self {
        NewMaterial {
            class_code: None,
            group_code: None,
            material_name: material_name.into(),
        }
    }

    pub fn with_class(mut self, class_code: impl Into<String>) -> Self {
        self.class_code = Some(class_code.into());
        self
    }

    pub fn with_group(mut self, group_code: impl Into<String>) -> Self {
        self.group_code = Some(group_code.into());
        self
    }
}

// =============================================================================
// Units of Measure
// =============================================================================

/// A unit a material may legitimately be received in.
///
/// The pair `(material_id, unit_name)` is the key; receipts reference the
/// pair, not the material alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct UnitOfMeasure {
    pub material_id: i64,
    pub unit_name: String,
}

// =============================================================================
// Suppliers
// =============================================================================

/// A supplier with its legal and banking details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub supplier_id: i64,
    pub name: String,
    /// Taxpayer identification number, unique across suppliers.
    pub tax_id: Option<String>,
    pub legal_address_postal_code: Option<String>,
    pub legal_address_city: Option<String>,
    pub legal_address_street: Option<String>,
    pub bank_address_postal_code: Option<String>,
    pub bank_address_city: Option<String>,
    pub bank_address_street: Option<String>,
    /// Settlement account number, unique across suppliers.
    pub bank_account_number: String,
}

/// Input for adding or updating a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub legal_address_postal_code: Option<String>,
    #[serde(default)]
    pub legal_address_city: Option<String>,
    #[serde(default)]
    pub legal_address_street: Option<String>,
    #[serde(default)]
    pub bank_address_postal_code: Option<String>,
    #[serde(default)]
    pub bank_address_city: Option<String>,
    #[serde(default)]
    pub bank_address_street: Option<String>,
    pub bank_account_number: String,
}

impl NewSupplier {
    pub fn new(name: impl Into<String>, bank_account_number: impl Into<String>) -> Self {
        NewSupplier {
            name: name.into(),
            bank_account_number: bank_account_number.into(),
            ..Default::default()
        }
    }

    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    /// Sets the registered (legal) address.
    pub fn with_legal_address(
        mut self,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        self.legal_address_postal_code = Some(postal_code.into());
        self.legal_address_city = Some(city.into());
        self.legal_address_street = Some(street.into());
        self
    }

    /// Sets the address of the bank holding the supplier's account.
    pub fn with_bank_address(
        mut self,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        self.bank_address_postal_code = Some(postal_code.into());
        self.bank_address_city = Some(city.into());
        self.bank_address_street = Some(street.into());
        self
    }
}

// =============================================================================
// Receipts
// =============================================================================

/// An inbound stock receipt line (stored in the `storage_units` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Receipt {
    pub order_number: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub supplier_id: Option<i64>,
    pub balance_sheet_account: Option<String>,
    pub document_code: Option<String>,
    pub document_number: Option<String>,
    pub material_account: Option<String>,
    pub material_id: i64,
    pub unit_of_measure_code: String,
    #[ts(as = "String")]
    pub quantity: Quantity,
    #[ts(as = "String")]
    pub unit_price: Money,
}

impl Receipt {
    /// Quantity × unit price, rounded to the kopeck.
    #[inline]
    pub fn line_value(&self) -> Money {
        self.quantity.extend(self.unit_price)
    }
}

/// Input for recording a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReceipt {
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub supplier_id: Option<i64>,
    pub material_id: i64,
    pub unit_of_measure_code: String,
    #[ts(as = "String")]
    pub quantity: Quantity,
    #[ts(as = "String")]
    pub unit_price: Money,
    #[serde(default)]
    pub balance_sheet_account: Option<String>,
    #[serde(default)]
    pub document_code: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub material_account: Option<String>,
}

impl NewReceipt {
    pub fn new(
        date: NaiveDate,
        material_id: i64,
        unit_of_measure_code: impl Into<String>,
        quantity: Quantity,
        unit_price: Money,
    ) -> Self {
        NewReceipt {
            date,
            supplier_id: None,
            material_id,
            unit_of_measure_code: unit_of_measure_code.into(),
            quantity,
            unit_price,
            balance_sheet_account: None,
            document_code: None,
            document_number: None,
            material_account: None,
        }
    }

    pub fn from_supplier(mut self, supplier_id: i64) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Sets the accounting references of the receipt document.
    pub fn with_document(
        mut self,
        document_code: impl Into<String>,
        document_number: impl Into<String>,
    ) -> Self {
        self.document_code = Some(document_code.into());
        self.document_number = Some(document_number.into());
        self
    }

    /// Sets the ledger accounts the receipt is posted against.
    pub fn with_accounts(
        mut self,
        balance_sheet_account: impl Into<String>,
        material_account: impl Into<String>,
    ) -> Self {
        self.balance_sheet_account = Some(balance_sheet_account.into());
        self.material_account = Some(material_account.into());
        self
    }

    #[inline]
    pub fn line_value(&self) -> Money {
        self.quantity.extend(self.unit_price)
    }
}

// =============================================================================
// Report Rows
// =============================================================================

/// A supplier served by a given bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SupplierBankInfo {
    pub name: String,
    pub tax_id: Option<String>,
}

/// Number of suppliers per bank city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BankSupplierCount {
    pub bank_address_city: String,
    pub supplier_count: i64,
}

/// A material of a catalog group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MaterialAssortment {
    pub material_name: String,
    pub class_code: Option<String>,
}

/// Stock on hand of one material and what it cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryValue {
    pub material_id: i64,
    pub material_name: String,
    #[ts(as = "String")]
    pub total_quantity: Quantity,
    #[ts(as = "String")]
    pub total_value: Money,
}

/// A supplier's part of the purchases of one material group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierShare {
    pub supplier_id: i64,
    pub group_code: String,
    #[ts(as = "String")]
    pub supplier_value: Money,
    #[ts(as = "String")]
    pub group_value: Money,
    /// `supplier_value / group_value`; absent when the group has no purchases.
    pub supplier_share: Option<f64>,
}

/// Receipt value of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyLoad {
    /// 1 = January.
    pub month: u32,
    #[ts(as = "String")]
    pub monthly_value: Money,
}

/// Bank and amount of a single receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderBankInfo {
    pub order_number: i64,
    pub bank_address_city: Option<String>,
    #[ts(as = "String")]
    pub total_amount: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_line_value() {
        let receipt = NewReceipt::new(
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            5,
            "литры",
            "500.000".parse().unwrap(),
            "550.50".parse().unwrap(),
        )
        .from_supplier(1);

        assert_eq!(receipt.supplier_id, Some(1));
        assert_eq!(receipt.line_value().to_string(), "275250.00");
    }

    #[test]
    fn test_new_supplier_builder() {
        let supplier = NewSupplier::new("ООО \"СтройМастер\"", "40702810100000001001")
            .with_tax_id("7701234567")
            .with_bank_address("101000", "Москва", "ул. Мясницкая, 1");

        assert_eq!(supplier.tax_id.as_deref(), Some("7701234567"));
        assert_eq!(supplier.bank_address_city.as_deref(), Some("Москва"));
        assert!(supplier.legal_address_city.is_none());
    }

    #[test]
    fn test_new_receipt_deserializes_decimal_strings() {
        let json = r#"{
            "date": "2025-11-01",
            "supplier_id": 1,
            "material_id": 5,
            "unit_of_measure_code": "литры",
            "quantity": "500.000",
            "unit_price": "550.50"
        }"#;

        let receipt: NewReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.quantity.millis(), 500_000);
        assert_eq!(receipt.unit_price.kopecks(), 55_050);
        assert!(receipt.document_code.is_none());
    }
}
