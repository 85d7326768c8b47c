use bodega_catalog::{Product, ProductUpdate};

use crate::ledger::Sale;

/// Tag for the terminal audit entry written when a product is removed
pub const PRODUCT_DELETION: &str = "product_deletion";
/// Tag for the audit entry written when a sale is removed
pub const SALE_DELETION: &str = "sale_deletion";
/// New-value marker used by both deletion entries
pub const DELETED: &str = "DELETED";

/// One field-level difference between a product and its replacement values.
/// Old and new values are stringified for uniform storage and display;
/// numeric values round-trip through `Display` unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: String,
    pub new_value: String,
}

fn change(field: &'static str, old: impl ToString, new: impl ToString) -> FieldChange {
    FieldChange {
        field,
        old_value: old.to_string(),
        new_value: new.to_string(),
    }
}

/// Compare every mutable product field individually against its replacement
/// value. Each differing field yields its own change, never a batched one.
pub fn diff_product(current: &Product, update: &ProductUpdate) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    let prices = [
        ("price_caja_fria", current.prices.caja_fria, update.prices.caja_fria),
        ("price_caja_caliente", current.prices.caja_caliente, update.prices.caja_caliente),
        ("price_caja_particular", current.prices.caja_particular, update.prices.caja_particular),
        ("price_six_pack", current.prices.six_pack, update.prices.six_pack),
        ("price_unitario", current.prices.unitario, update.prices.unitario),
    ];
    for (field, old, new) in prices {
        if old != new {
            changes.push(change(field, old, new));
        }
    }

    if current.stock != update.stock {
        changes.push(change("stock", current.stock, update.stock));
    }
    if current.min_stock != update.min_stock {
        changes.push(change("min_stock", current.min_stock, update.min_stock));
    }
    if current.cost_price_box != update.cost_price_box {
        changes.push(change("cost_price_box", current.cost_price_box, update.cost_price_box));
    }

    changes
}

/// Terminal audit payload for a product removal: a human-readable snapshot
/// of what was deleted
pub fn product_deletion_change(product: &Product) -> FieldChange {
    FieldChange {
        field: PRODUCT_DELETION,
        old_value: format!("id={} name={}", product.id, product.name),
        new_value: DELETED.to_string(),
    }
}

/// Audit payload for a sale removal, tagged back to the owning product.
/// The product name is resolved best-effort by the caller.
pub fn sale_deletion_change(sale: &Sale, product_name: &str) -> FieldChange {
    FieldChange {
        field: SALE_DELETION,
        old_value: format!(
            "sale id={} product={} quantity={} total={}",
            sale.id, product_name, sale.quantity, sale.total_price
        ),
        new_value: DELETED.to_string(),
    }
}
