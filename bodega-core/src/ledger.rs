use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable record of one transaction. Every priced field is a snapshot
/// taken at sale time and is never recomputed from the live product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    /// Units sold, expressed in base units rather than packages
    pub quantity: i64,
    /// Flat discount in whole currency units, not a percentage
    pub discount: i64,
    pub unit_price_at_sale: f64,
    pub total_price: f64,
    pub cost_price_at_sale: f64,
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// Margin realized by this sale, from the captured snapshots
    pub fn profit(&self) -> f64 {
        (self.unit_price_at_sale - self.cost_price_at_sale) * self.quantity as f64
    }
}

/// Fields supplied when recording a sale; the store assigns id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDraft {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_at_sale: f64,
    pub total_price: f64,
    pub discount: i64,
    pub cost_price_at_sale: f64,
}

/// One append-only audit entry. Entries are never updated or deleted, and
/// each one documents a single field-level change or deletion event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryModification {
    pub id: i64,
    /// Plain reference; outlives the product row it points at
    pub product_id: i64,
    pub field_modified: String,
    pub old_value: String,
    pub new_value: String,
    pub modification_date: DateTime<Utc>,
}
