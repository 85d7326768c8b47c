use std::collections::HashMap;

use crate::product::{PriceTier, Product};

/// Units in one six-pack, independent of the product's units-per-box
const SIX_PACK_UNITS: i64 = 6;

/// Units covered by one package at the given tier
pub fn tier_unit_count(product: &Product, tier: PriceTier) -> i64 {
    match tier {
        PriceTier::CajaFria | PriceTier::CajaCaliente | PriceTier::CajaParticular => {
            product.units_per_box
        }
        PriceTier::SixPack => SIX_PACK_UNITS,
        PriceTier::Unitario => 1,
    }
}

/// Per-unit cost derived from the distributor's case price
pub fn cost_per_unit(product: &Product) -> f64 {
    if product.units_per_box > 0 {
        product.cost_price_box / product.units_per_box as f64
    } else {
        // Degenerate single-unit case: the case cost is the unit cost
        product.cost_price_box
    }
}

/// Per-unit price at a tier. A zero unit count means the stored price is
/// already per-unit.
pub fn unit_price_for_tier(product: &Product, tier: PriceTier) -> f64 {
    let units = tier_unit_count(product, tier);
    let price = product.prices.get(tier);
    if units > 0 {
        price / units as f64
    } else {
        price
    }
}

/// Per-unit profit for each of the five tiers
pub fn profit_per_tier(product: &Product) -> HashMap<PriceTier, f64> {
    let cost = cost_per_unit(product);
    PriceTier::ALL
        .iter()
        .map(|&tier| (tier, unit_price_for_tier(product, tier) - cost))
        .collect()
}

/// The four snapshot fields captured when a sale is recorded
#[derive(Debug, Clone, PartialEq)]
pub struct SaleQuote {
    /// Total individual units sold (packages converted to base units)
    pub quantity: i64,
    pub unit_price_at_sale: f64,
    pub total_price: f64,
    pub cost_price_at_sale: f64,
}

/// Price a sale of `packages` packages at the given tier with a flat
/// discount. Totals never go below zero.
pub fn quote_sale(product: &Product, tier: PriceTier, packages: i64, discount: i64) -> SaleQuote {
    let units = tier_unit_count(product, tier);
    let package_price = product.prices.get(tier);
    let total = package_price * packages as f64 - discount as f64;

    SaleQuote {
        quantity: packages * units,
        unit_price_at_sale: unit_price_for_tier(product, tier),
        total_price: total.max(0.0),
        cost_price_at_sale: cost_per_unit(product),
    }
}
