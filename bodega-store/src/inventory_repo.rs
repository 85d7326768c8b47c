use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use bodega_catalog::{Product, ProductDraft, ProductUpdate, TierPrices};
use bodega_core::audit::{self, FieldChange};
use bodega_core::error::{LedgerError, LedgerResult};
use bodega_core::ledger::{InventoryModification, Sale, SaleDraft};
use bodega_core::repository::InventoryRepository;

/// SQLite-backed implementation of the inventory contract. Every mutating
/// operation runs inside one transaction; dropping the transaction on an
/// early error return rolls it back, so no exit path can leave partial
/// state behind.
pub struct StoreInventoryRepository {
    pool: SqlitePool,
}

impl StoreInventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price_caja_fria: f64,
    price_caja_caliente: f64,
    price_caja_particular: f64,
    price_six_pack: f64,
    price_unitario: f64,
    stock: i64,
    min_stock: i64,
    units_per_box: i64,
    cost_price_box: f64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            prices: TierPrices {
                caja_fria: row.price_caja_fria,
                caja_caliente: row.price_caja_caliente,
                caja_particular: row.price_caja_particular,
                six_pack: row.price_six_pack,
                unitario: row.price_unitario,
            },
            stock: row.stock,
            min_stock: row.min_stock,
            units_per_box: row.units_per_box,
            cost_price_box: row.cost_price_box,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: i64,
    product_id: i64,
    quantity: i64,
    discount: i64,
    unit_price_at_sale: f64,
    total_price: f64,
    cost_price_at_sale: f64,
    sale_date: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            discount: row.discount,
            unit_price_at_sale: row.unit_price_at_sale,
            total_price: row.total_price,
            cost_price_at_sale: row.cost_price_at_sale,
            sale_date: row.sale_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ModificationRow {
    id: i64,
    product_id: i64,
    field_modified: String,
    old_value: String,
    new_value: String,
    modification_date: DateTime<Utc>,
}

impl From<ModificationRow> for InventoryModification {
    fn from(row: ModificationRow) -> Self {
        InventoryModification {
            id: row.id,
            product_id: row.product_id,
            field_modified: row.field_modified,
            old_value: row.old_value,
            new_value: row.new_value,
            modification_date: row.modification_date,
        }
    }
}

const SELECT_PRODUCT: &str = "SELECT id, name, price_caja_fria, price_caja_caliente, \
     price_caja_particular, price_six_pack, price_unitario, stock, min_stock, \
     units_per_box, cost_price_box FROM products";

const SELECT_SALE: &str = "SELECT id, product_id, quantity, discount, unit_price_at_sale, \
     total_price, cost_price_at_sale, sale_date FROM sales";

const SELECT_MODIFICATION: &str = "SELECT id, product_id, field_modified, old_value, \
     new_value, modification_date FROM inventory_modifications";

fn storage(err: sqlx::Error) -> LedgerError {
    LedgerError::Storage(err.to_string())
}

async fn product_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Product>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Product::from))
}

async fn append_modification(
    conn: &mut SqliteConnection,
    product_id: i64,
    change: &FieldChange,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO inventory_modifications \
         (product_id, field_modified, old_value, new_value, modification_date) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(product_id)
    .bind(change.field)
    .bind(&change.old_value)
    .bind(&change.new_value)
    .bind(at)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl InventoryRepository for StoreInventoryRepository {
    async fn add_product(&self, draft: &ProductDraft) -> LedgerResult<Product> {
        let result = sqlx::query(
            "INSERT INTO products (name, price_caja_fria, price_caja_caliente, \
             price_caja_particular, price_six_pack, price_unitario, stock, min_stock, \
             units_per_box, cost_price_box) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.name)
        .bind(draft.prices.caja_fria)
        .bind(draft.prices.caja_caliente)
        .bind(draft.prices.caja_particular)
        .bind(draft.prices.six_pack)
        .bind(draft.prices.unitario)
        .bind(draft.stock)
        .bind(draft.min_stock)
        .bind(draft.units_per_box)
        .bind(draft.cost_price_box)
        .execute(&self.pool)
        .await;

        let done = match result {
            Ok(done) => done,
            Err(err) if err.as_database_error().is_some_and(|db| db.is_unique_violation()) => {
                return Err(LedgerError::DuplicateName(draft.name.clone()));
            }
            Err(err) => return Err(storage(err)),
        };

        let id = done.last_insert_rowid();
        info!(product_id = id, name = %draft.name, "product added");

        Ok(Product {
            id,
            name: draft.name.clone(),
            prices: draft.prices,
            stock: draft.stock,
            min_stock: draft.min_stock,
            units_per_box: draft.units_per_box,
            cost_price_box: draft.cost_price_box,
        })
    }

    async fn get_product(&self, id: i64) -> LedgerResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;
        Ok(row.map(Product::from))
    }

    async fn list_products(&self) -> LedgerResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn current_inventory(&self) -> LedgerResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn record_sale(&self, draft: &SaleDraft) -> LedgerResult<Sale> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let product = product_by_id(&mut tx, draft.product_id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::ProductNotFound(draft.product_id))?;

        if product.stock < draft.quantity {
            return Err(LedgerError::InsufficientStock {
                requested: draft.quantity,
                available: product.stock,
            });
        }

        let sale_date = Utc::now();
        let done = sqlx::query(
            "INSERT INTO sales (product_id, quantity, discount, unit_price_at_sale, \
             total_price, cost_price_at_sale, sale_date) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(draft.product_id)
        .bind(draft.quantity)
        .bind(draft.discount)
        .bind(draft.unit_price_at_sale)
        .bind(draft.total_price)
        .bind(draft.cost_price_at_sale)
        .bind(sale_date)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;
        let sale_id = done.last_insert_rowid();

        // Conditional decrement: a concurrent sale that already consumed the
        // stock makes this a no-op instead of committing a negative balance.
        let updated = sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?")
            .bind(draft.quantity)
            .bind(draft.product_id)
            .bind(draft.quantity)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        if updated.rows_affected() == 0 {
            return Err(LedgerError::InsufficientStock {
                requested: draft.quantity,
                available: product.stock,
            });
        }

        tx.commit().await.map_err(storage)?;
        info!(
            sale_id,
            product_id = draft.product_id,
            quantity = draft.quantity,
            "sale recorded"
        );

        Ok(Sale {
            id: sale_id,
            product_id: draft.product_id,
            quantity: draft.quantity,
            discount: draft.discount,
            unit_price_at_sale: draft.unit_price_at_sale,
            total_price: draft.total_price,
            cost_price_at_sale: draft.cost_price_at_sale,
            sale_date,
        })
    }

    async fn list_sales(&self) -> LedgerResult<Vec<Sale>> {
        let rows =
            sqlx::query_as::<_, SaleRow>(&format!("{SELECT_SALE} ORDER BY sale_date DESC, id DESC"))
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn update_product_details(
        &self,
        id: i64,
        update: &ProductUpdate,
    ) -> LedgerResult<Vec<FieldChange>> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let product = product_by_id(&mut tx, id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::ProductNotFound(id))?;

        let changes = audit::diff_product(&product, update);
        if changes.is_empty() {
            return Err(LedgerError::NoChange);
        }

        sqlx::query(
            "UPDATE products SET price_caja_fria = ?, price_caja_caliente = ?, \
             price_caja_particular = ?, price_six_pack = ?, price_unitario = ?, \
             stock = ?, min_stock = ?, cost_price_box = ? WHERE id = ?",
        )
        .bind(update.prices.caja_fria)
        .bind(update.prices.caja_caliente)
        .bind(update.prices.caja_particular)
        .bind(update.prices.six_pack)
        .bind(update.prices.unitario)
        .bind(update.stock)
        .bind(update.min_stock)
        .bind(update.cost_price_box)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        let modified_at = Utc::now();
        for change in &changes {
            append_modification(&mut tx, id, change, modified_at)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;
        info!(product_id = id, changed = changes.len(), "product details updated");

        Ok(changes)
    }

    async fn delete_product(&self, id: i64) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let product = product_by_id(&mut tx, id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::ProductNotFound(id))?;

        let change = audit::product_deletion_change(&product);
        append_modification(&mut tx, id, &change, Utc::now())
            .await
            .map_err(storage)?;

        // Dependent sales go with the product (ON DELETE CASCADE); the audit
        // history stays.
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        info!(product_id = id, name = %product.name, "product deleted");
        Ok(())
    }

    async fn delete_sale(&self, id: i64) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let sale = sqlx::query_as::<_, SaleRow>(&format!("{SELECT_SALE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?
            .map(Sale::from)
            .ok_or(LedgerError::SaleNotFound(id))?;

        let product_name = sqlx::query_scalar::<_, String>("SELECT name FROM products WHERE id = ?")
            .bind(sale.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?
            .unwrap_or_else(|| "Unknown".to_string());

        let change = audit::sale_deletion_change(&sale, &product_name);
        append_modification(&mut tx, sale.product_id, &change, Utc::now())
            .await
            .map_err(storage)?;

        // Stock is not restored here; the deletion only removes the record.
        sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        info!(sale_id = id, product_id = sale.product_id, "sale deleted");
        Ok(())
    }

    async fn list_modifications(&self) -> LedgerResult<Vec<InventoryModification>> {
        let rows = sqlx::query_as::<_, ModificationRow>(&format!(
            "{SELECT_MODIFICATION} ORDER BY modification_date DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        Ok(rows.into_iter().map(InventoryModification::from).collect())
    }
}
