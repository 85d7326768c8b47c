use bodega_catalog::{ProductDraft, ProductUpdate, TierPrices};
use bodega_core::audit;
use bodega_core::error::LedgerError;
use bodega_core::ledger::SaleDraft;
use bodega_core::repository::InventoryRepository;
use bodega_store::{Database, StoreInventoryRepository};

async fn repo() -> StoreInventoryRepository {
    let db = Database::in_memory().await.expect("in-memory database");
    db.migrate().await.expect("migrations");
    StoreInventoryRepository::new(db.pool.clone())
}

fn beer_draft(name: &str) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        prices: TierPrices {
            caja_fria: 48.0,
            caja_caliente: 50.0,
            caja_particular: 52.0,
            six_pack: 15.0,
            unitario: 3.0,
        },
        stock: 100,
        min_stock: 10,
        units_per_box: 24,
        cost_price_box: 24.0,
    }
}

fn case_sale(product_id: i64) -> SaleDraft {
    // One caja fria: 24 units at 48.00 / 24 = 2.00 each
    SaleDraft {
        product_id,
        quantity: 24,
        unit_price_at_sale: 2.0,
        total_price: 48.0,
        discount: 0,
        cost_price_at_sale: 1.0,
    }
}

#[tokio::test]
async fn test_add_and_fetch_product() {
    let repo = repo().await;

    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();
    assert_eq!(product.name, "Cerveza Clara");
    assert_eq!(product.stock, 100);

    let fetched = repo.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(fetched.prices.caja_fria, 48.0);
    assert_eq!(fetched.units_per_box, 24);
    assert_eq!(fetched.cost_price_box, 24.0);

    assert!(repo.get_product(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let repo = repo().await;

    repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();
    let err = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateName(name) if name == "Cerveza Clara"));

    // The first product is unaffected
    let products = repo.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].stock, 100);
}

#[tokio::test]
async fn test_record_sale_decrements_stock() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();

    let sale = repo.record_sale(&case_sale(product.id)).await.unwrap();
    assert_eq!(sale.quantity, 24);
    assert_eq!(sale.unit_price_at_sale, 2.0);

    let after = repo.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(after.stock, 76);

    let sales = repo.list_sales().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].id, sale.id);
}

#[tokio::test]
async fn test_insufficient_stock_changes_nothing() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();

    let mut draft = case_sale(product.id);
    draft.quantity = 101;
    let err = repo.record_sale(&draft).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientStock {
            requested: 101,
            available: 100
        }
    ));

    // Neither a sale row nor a stock change is observable
    assert_eq!(repo.get_product(product.id).await.unwrap().unwrap().stock, 100);
    assert!(repo.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sale_for_missing_product_changes_nothing() {
    let repo = repo().await;

    let err = repo.record_sale(&case_sale(42)).await.unwrap_err();
    assert!(matches!(err, LedgerError::ProductNotFound(42)));
    assert!(repo.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stock_never_goes_negative_across_sales() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();

    let mut draft = case_sale(product.id);
    draft.quantity = 60;
    repo.record_sale(&draft).await.unwrap();
    draft.quantity = 40;
    repo.record_sale(&draft).await.unwrap();

    draft.quantity = 1;
    let err = repo.record_sale(&draft).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientStock {
            requested: 1,
            available: 0
        }
    ));
    assert_eq!(repo.get_product(product.id).await.unwrap().unwrap().stock, 0);
}

#[tokio::test]
async fn test_sale_snapshots_survive_product_updates() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();
    repo.record_sale(&case_sale(product.id)).await.unwrap();

    // Reprice the product after the sale
    let update = ProductUpdate {
        prices: TierPrices {
            caja_fria: 60.0,
            caja_caliente: 62.0,
            caja_particular: 64.0,
            six_pack: 18.0,
            unitario: 4.0,
        },
        stock: 76,
        min_stock: 10,
        cost_price_box: 30.0,
    };
    repo.update_product_details(product.id, &update).await.unwrap();

    let sales = repo.list_sales().await.unwrap();
    assert_eq!(sales[0].unit_price_at_sale, 2.0);
    assert_eq!(sales[0].total_price, 48.0);
    assert_eq!(sales[0].cost_price_at_sale, 1.0);
}

#[tokio::test]
async fn test_update_appends_one_entry_per_changed_field() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();

    let update = ProductUpdate {
        prices: TierPrices {
            caja_fria: 52.0, // changed
            caja_caliente: 50.0,
            caja_particular: 52.0,
            six_pack: 15.0,
            unitario: 3.0,
        },
        stock: 80,           // changed
        min_stock: 10,
        cost_price_box: 26.0, // changed
    };

    let changes = repo.update_product_details(product.id, &update).await.unwrap();
    assert_eq!(changes.len(), 3);

    let mods = repo.list_modifications().await.unwrap();
    assert_eq!(mods.len(), 3);

    let stock_mod = mods.iter().find(|m| m.field_modified == "stock").unwrap();
    assert_eq!(stock_mod.product_id, product.id);
    assert_eq!(stock_mod.old_value, "100");
    assert_eq!(stock_mod.new_value, "80");

    let price_mod = mods
        .iter()
        .find(|m| m.field_modified == "price_caja_fria")
        .unwrap();
    assert_eq!(price_mod.old_value, "48");
    assert_eq!(price_mod.new_value, "52");

    let updated = repo.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(updated.stock, 80);
    assert_eq!(updated.cost_price_box, 26.0);
}

#[tokio::test]
async fn test_update_with_identical_values_is_no_change() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();

    let update = ProductUpdate {
        prices: product.prices,
        stock: product.stock,
        min_stock: product.min_stock,
        cost_price_box: product.cost_price_box,
    };

    let err = repo.update_product_details(product.id, &update).await.unwrap_err();
    assert!(matches!(err, LedgerError::NoChange));
    assert!(repo.list_modifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_product() {
    let repo = repo().await;

    let update = ProductUpdate {
        prices: beer_draft("x").prices,
        stock: 1,
        min_stock: 1,
        cost_price_box: 1.0,
    };
    let err = repo.update_product_details(42, &update).await.unwrap_err();
    assert!(matches!(err, LedgerError::ProductNotFound(42)));
}

#[tokio::test]
async fn test_delete_sale_keeps_stock_deducted() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();
    let sale = repo.record_sale(&case_sale(product.id)).await.unwrap();
    assert_eq!(repo.get_product(product.id).await.unwrap().unwrap().stock, 76);

    repo.delete_sale(sale.id).await.unwrap();

    assert!(repo.list_sales().await.unwrap().is_empty());

    let mods = repo.list_modifications().await.unwrap();
    let deletion = mods
        .iter()
        .find(|m| m.field_modified == audit::SALE_DELETION)
        .unwrap();
    assert_eq!(deletion.product_id, product.id);
    assert_eq!(deletion.new_value, audit::DELETED);
    assert!(deletion.old_value.contains("Cerveza Clara"));

    // Stock stays where the sale left it; deletion does not restore it
    assert_eq!(repo.get_product(product.id).await.unwrap().unwrap().stock, 76);
}

#[tokio::test]
async fn test_delete_product_cascades_sales_and_keeps_history() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();
    repo.record_sale(&case_sale(product.id)).await.unwrap();

    repo.delete_product(product.id).await.unwrap();

    assert!(repo.get_product(product.id).await.unwrap().is_none());
    assert!(repo.list_sales().await.unwrap().is_empty());

    // The terminal entry outlives the product row
    let mods = repo.list_modifications().await.unwrap();
    let deletion = mods
        .iter()
        .find(|m| m.field_modified == audit::PRODUCT_DELETION)
        .unwrap();
    assert_eq!(deletion.product_id, product.id);
    assert!(deletion.old_value.contains("Cerveza Clara"));
    assert_eq!(deletion.new_value, audit::DELETED);
}

#[tokio::test]
async fn test_delete_missing_entities() {
    let repo = repo().await;

    assert!(matches!(
        repo.delete_product(42).await.unwrap_err(),
        LedgerError::ProductNotFound(42)
    ));
    assert!(matches!(
        repo.delete_sale(42).await.unwrap_err(),
        LedgerError::SaleNotFound(42)
    ));
}

#[tokio::test]
async fn test_cascaded_sale_is_gone_after_product_delete() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();
    let sale = repo.record_sale(&case_sale(product.id)).await.unwrap();

    repo.delete_product(product.id).await.unwrap();

    let err = repo.delete_sale(sale.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::SaleNotFound(_)));
}

#[tokio::test]
async fn test_reads_return_empty_collections() {
    let repo = repo().await;

    assert!(repo.list_products().await.unwrap().is_empty());
    assert!(repo.current_inventory().await.unwrap().is_empty());
    assert!(repo.list_sales().await.unwrap().is_empty());
    assert!(repo.list_modifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_current_inventory_is_ordered_by_name() {
    let repo = repo().await;
    repo.add_product(&beer_draft("Tequila Blanco")).await.unwrap();
    repo.add_product(&beer_draft("Agua Mineral")).await.unwrap();

    let inventory = repo.current_inventory().await.unwrap();
    assert_eq!(inventory[0].name, "Agua Mineral");
    assert_eq!(inventory[1].name, "Tequila Blanco");

    // list_products keeps insertion order
    let products = repo.list_products().await.unwrap();
    assert_eq!(products[0].name, "Tequila Blanco");
}

#[tokio::test]
async fn test_sales_listed_newest_first() {
    let repo = repo().await;
    let product = repo.add_product(&beer_draft("Cerveza Clara")).await.unwrap();

    let mut draft = case_sale(product.id);
    draft.quantity = 10;
    let first = repo.record_sale(&draft).await.unwrap();
    draft.quantity = 20;
    let second = repo.record_sale(&draft).await.unwrap();

    let sales = repo.list_sales().await.unwrap();
    assert_eq!(sales[0].id, second.id);
    assert_eq!(sales[1].id, first.id);
}

#[tokio::test]
async fn test_full_point_of_sale_scenario() {
    let repo = repo().await;

    let product = repo.add_product(&beer_draft("Beer A")).await.unwrap();
    let sale = repo.record_sale(&case_sale(product.id)).await.unwrap();
    assert_eq!(repo.get_product(product.id).await.unwrap().unwrap().stock, 76);

    repo.delete_sale(sale.id).await.unwrap();

    let mods = repo.list_modifications().await.unwrap();
    assert!(mods.iter().any(|m| m.field_modified == audit::SALE_DELETION));
    assert_eq!(repo.get_product(product.id).await.unwrap().unwrap().stock, 76);
}
