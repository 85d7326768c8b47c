use serde::{Deserialize, Serialize};

/// Packaging tiers a product can be priced under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceTier {
    CajaFria,
    CajaCaliente,
    CajaParticular,
    SixPack,
    Unitario,
}

impl PriceTier {
    pub const ALL: [PriceTier; 5] = [
        PriceTier::CajaFria,
        PriceTier::CajaCaliente,
        PriceTier::CajaParticular,
        PriceTier::SixPack,
        PriceTier::Unitario,
    ];

    /// Display label used by the reporting shell
    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::CajaFria => "Caja Fria",
            PriceTier::CajaCaliente => "Caja Caliente",
            PriceTier::CajaParticular => "Caja Particular",
            PriceTier::SixPack => "six-pack",
            PriceTier::Unitario => "Unitario",
        }
    }

    /// The three case tiers share the product's units-per-box conversion
    pub fn is_case(&self) -> bool {
        matches!(
            self,
            PriceTier::CajaFria | PriceTier::CajaCaliente | PriceTier::CajaParticular
        )
    }
}

/// The five parallel price points of a product, one per packaging tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TierPrices {
    pub caja_fria: f64,
    pub caja_caliente: f64,
    pub caja_particular: f64,
    pub six_pack: f64,
    pub unitario: f64,
}

impl TierPrices {
    pub fn get(&self, tier: PriceTier) -> f64 {
        match tier {
            PriceTier::CajaFria => self.caja_fria,
            PriceTier::CajaCaliente => self.caja_caliente,
            PriceTier::CajaParticular => self.caja_particular,
            PriceTier::SixPack => self.six_pack,
            PriceTier::Unitario => self.unitario,
        }
    }
}

/// A sellable item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub prices: TierPrices,
    pub stock: i64,
    pub min_stock: i64,
    pub units_per_box: i64,
    pub cost_price_box: f64,
}

impl Product {
    /// Low-stock alarm shown on the inventory report
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.min_stock
    }
}

/// Fields supplied when creating a product; the store assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub prices: TierPrices,
    pub stock: i64,
    pub min_stock: i64,
    pub units_per_box: i64,
    pub cost_price_box: f64,
}

/// Replacement values for the mutable fields of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub prices: TierPrices,
    pub stock: i64,
    pub min_stock: i64,
    pub cost_price_box: f64,
}
