//! # Demo Dataset
//!
//! A small catalog with opening balances, used by the `seed` binary and by
//! tests that want a realistic store.
//!
//! ## Contents
//! ```text
//! material_id  class/group   name                       units
//! ───────────  ───────────   ───────────────────────    ──────────
//! 1            MET / ARM     Арматура А500С 12 мм       т, м
//! 2            STR / CEM     Цемент М500 Д0             мешок, т
//! 3            LKM / GRUNT   Грунтовка ГФ-021 серая     кг
//! 4            DER / DOSKA   Доска обрезная 50×150      м3
//!
//! order_number 1..=3: opening balances of materials 1-3, no supplier
//! ```
//!
//! No suppliers are created, so the first supplier added afterwards gets
//! id 1, the next material id 5 and the next receipt order number 4.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use ledger_core::{Money, NewMaterial, NewReceipt, Quantity};

/// (class, group, name, units)
const MATERIALS: &[(&str, &str, &str, &[&str])] = &[
    ("MET", "ARM", "Арматура А500С 12 мм", &["т", "м"]),
    ("STR", "CEM", "Цемент М500 Д0", &["мешок", "т"]),
    ("LKM", "GRUNT", "Грунтовка ГФ-021 серая", &["кг"]),
    ("DER", "DOSKA", "Доска обрезная 50×150", &["м3"]),
];

/// (material index, unit, quantity in thousandths, unit price in kopecks)
const OPENING_BALANCES: &[(usize, &str, i64, i64)] = &[
    (0, "т", 12_500, 5_890_000),
    (1, "мешок", 200_000, 42_000),
    (2, "кг", 150_000, 13_550),
];

/// Date the opening balances are posted on.
const OPENING_DATE: (i32, u32, u32) = (2025, 1, 9);

/// What [`seed_demo_data`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub materials: usize,
    pub units: usize,
    pub receipts: usize,
}

/// Loads the demo dataset.
///
/// Returns `Ok(None)` without writing anything when the catalog already
/// holds materials.
pub async fn seed_demo_data(db: &Database) -> DbResult<Option<SeedSummary>> {
    let existing = db.materials().count().await?;
    if existing > 0 {
        info!(existing, "Catalog not empty, skipping demo data");
        return Ok(None);
    }

    let mut summary = SeedSummary {
        materials: 0,
        units: 0,
        receipts: 0,
    };
    let mut material_ids = Vec::with_capacity(MATERIALS.len());

    for (class_code, group_code, name, units) in MATERIALS {
        let material = db
            .materials()
            .add(&NewMaterial::new(*name).with_class(*class_code).with_group(*group_code))
            .await?;
        summary.materials += 1;

        for unit in units.iter() {
            db.units().add(material.material_id, unit).await?;
            summary.units += 1;
        }

        material_ids.push(material.material_id);
    }

    let (year, month, day) = OPENING_DATE;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DbError::Internal("invalid opening balance date".to_string()))?;

    for (number, (index, unit, millis, kopecks)) in OPENING_BALANCES.iter().enumerate() {
        let receipt = NewReceipt::new(
            date,
            material_ids[*index],
            *unit,
            Quantity::from_millis(*millis),
            Money::from_kopecks(*kopecks),
        )
        .with_document("ОСТ", (number + 1).to_string())
        .with_accounts("10", "10.01");

        db.receipts().record(&receipt).await?;
        summary.receipts += 1;
    }

    info!(
        materials = summary.materials,
        units = summary.units,
        receipts = summary.receipts,
        "Demo data loaded"
    );

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    #[tokio::test]
    async fn test_seed_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let summary = seed_demo_data(&db).await.unwrap().unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                materials: 4,
                units: 6,
                receipts: 3,
            }
        );
        assert_eq!(db.receipts().count().await.unwrap(), 3);
        assert_eq!(db.suppliers().count().await.unwrap(), 0);

        // second run leaves the store alone
        assert!(seed_demo_data(&db).await.unwrap().is_none());
        assert_eq!(db.materials().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_opening_balance_values() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        let rebar = db.receipts().get_by_order_number(1).await.unwrap().unwrap();
        assert_eq!(rebar.quantity.to_string(), "12.500");
        // 12.5 т × 58 900.00
        assert_eq!(rebar.line_value(), Money::from_rubles_kopecks(736_250, 0));
        assert_eq!(rebar.supplier_id, None);
    }
}
