pub mod product;
pub mod pricing;

pub use product::{PriceTier, Product, ProductDraft, ProductUpdate, TierPrices};
pub use pricing::{cost_per_unit, profit_per_tier, quote_sale, SaleQuote};
