use async_trait::async_trait;
use bodega_catalog::{Product, ProductDraft, ProductUpdate};

use crate::audit::FieldChange;
use crate::error::LedgerResult;
use crate::ledger::{InventoryModification, Sale, SaleDraft};

/// Data-access contract between the inventory core and the reporting shell.
/// Every mutating operation is a single all-or-nothing unit of work; read
/// operations return disconnected snapshots that stay valid after the call.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Create a product. Fails with `DuplicateName` when the store's
    /// uniqueness constraint rejects the name.
    async fn add_product(&self, draft: &ProductDraft) -> LedgerResult<Product>;

    async fn get_product(&self, id: i64) -> LedgerResult<Option<Product>>;

    async fn list_products(&self) -> LedgerResult<Vec<Product>>;

    /// Same rows as `list_products`, ordered for the stock report
    async fn current_inventory(&self) -> LedgerResult<Vec<Product>>;

    /// Record a sale and decrement the owning product's stock atomically.
    /// A partial result is never observable.
    async fn record_sale(&self, draft: &SaleDraft) -> LedgerResult<Sale>;

    /// Most recent sale first
    async fn list_sales(&self) -> LedgerResult<Vec<Sale>>;

    /// Apply the differing fields and append one audit entry per change.
    /// Returns `NoChange` when every value matches the current row.
    async fn update_product_details(
        &self,
        id: i64,
        update: &ProductUpdate,
    ) -> LedgerResult<Vec<FieldChange>>;

    /// Append a terminal audit entry, then remove the product and its sales
    async fn delete_product(&self, id: i64) -> LedgerResult<()>;

    /// Append a `sale_deletion` audit entry, then remove the sale. Stock is
    /// not restored.
    async fn delete_sale(&self, id: i64) -> LedgerResult<()>;

    /// Most recent modification first
    async fn list_modifications(&self) -> LedgerResult<Vec<InventoryModification>>;
}
