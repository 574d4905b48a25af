//! End-to-end behaviour of `CartStore` against in-memory collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cart_core::prelude::*;
use cart_storage::{MemoryStore, StorageBackend};

const KEY: &str = "@RocketShoes:cart";

/// Stock oracle with a per-product table; products missing from the table
/// have no stock record. `fail` makes every lookup error out.
#[derive(Default)]
struct StockTable {
    levels: Mutex<HashMap<ProductId, i64>>,
    fail: bool,
    calls: Mutex<u32>,
}

impl StockTable {
    fn with(levels: &[(u64, i64)]) -> Self {
        Self {
            levels: Mutex::new(
                levels
                    .iter()
                    .map(|(id, amount)| (ProductId::new(*id), *amount))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl StockOracle for StockTable {
    async fn stock(&self, product_id: ProductId) -> Result<Option<StockLevel>, LookupError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(LookupError::Unavailable("connection refused".to_string()));
        }
        Ok(self
            .levels
            .lock()
            .unwrap()
            .get(&product_id)
            .map(|amount| StockLevel::new(product_id, *amount)))
    }
}

/// Catalog that knows a fixed set of products.
#[derive(Default)]
struct CatalogTable {
    products: Vec<Product>,
    fail: bool,
}

impl CatalogTable {
    fn shoes() -> Self {
        Self {
            products: vec![
                Product::new(ProductId::new(1), "Shoe", 10.0, "x"),
                Product::new(ProductId::new(2), "Running Shoe", 139.9, "https://img/2.jpg"),
                Product::new(ProductId::new(3), "Sandal", 45.5, "https://img/3.jpg"),
                Product::new(ProductId::new(4), "Lace", 19.999, "https://img/4.jpg"),
            ],
            fail: false,
        }
    }
}

#[async_trait]
impl ProductCatalog for CatalogTable {
    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, LookupError> {
        if self.fail {
            return Err(LookupError::Malformed("unexpected end of input".to_string()));
        }
        Ok(self.products.iter().find(|p| p.id == product_id).cloned())
    }

    async fn products(&self) -> Result<Vec<Product>, LookupError> {
        Ok(self.products.clone())
    }
}

/// Collects every notice it receives.
#[derive(Default)]
struct Recorder(Mutex<Vec<Notice>>);

impl Notifier for Recorder {
    fn notify(&self, notice: &Notice) {
        self.0.lock().unwrap().push(*notice);
    }
}

impl Recorder {
    fn kinds(&self) -> Vec<ErrorKind> {
        self.0.lock().unwrap().iter().map(|n| n.kind).collect()
    }
}

struct Harness {
    store: CartStore<Arc<MemoryStore>>,
    storage: Arc<MemoryStore>,
    stock: Arc<StockTable>,
    notices: Arc<Recorder>,
}

impl Harness {
    fn new(stock: StockTable, catalog: CatalogTable) -> Self {
        Self::with_storage(stock, catalog, Arc::new(MemoryStore::new()))
    }

    fn with_storage(stock: StockTable, catalog: CatalogTable, storage: Arc<MemoryStore>) -> Self {
        Self::with_config(CartConfig::default(), stock, catalog, storage)
    }

    fn with_config(
        config: CartConfig,
        stock: StockTable,
        catalog: CatalogTable,
        storage: Arc<MemoryStore>,
    ) -> Self {
        let stock = Arc::new(stock);
        let notices = Arc::new(Recorder::default());
        let store = CartStore::open(
            config,
            storage.clone(),
            stock.clone(),
            Arc::new(catalog),
        )
        .with_notifier(notices.clone());
        Self {
            store,
            storage,
            stock,
            notices,
        }
    }

    fn seeded(items: &[(u64, u32)], stock: StockTable) -> Self {
        let items: Vec<LineItem> = items
            .iter()
            .map(|(id, amount)| {
                LineItem::new(ProductId::new(*id), "Shoe", 10.0, "x", *amount)
            })
            .collect();
        let bytes = serde_json::to_vec(&items).unwrap();
        let storage = Arc::new(MemoryStore::with_entry(KEY, bytes));
        Self::with_storage(stock, CatalogTable::shoes(), storage)
    }

    fn persisted(&self) -> Option<Vec<u8>> {
        self.storage.get(KEY).unwrap()
    }

    fn persisted_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.persisted().unwrap()).unwrap()
    }

    fn snapshot(&self) -> (Cart, Option<Vec<u8>>) {
        (self.store.cart().clone(), self.persisted())
    }

    fn quantities(&self) -> Vec<(u64, u32)> {
        self.store
            .items()
            .iter()
            .map(|i| (i.product_id.get(), i.quantity))
            .collect()
    }
}

fn id(n: u64) -> ProductId {
    ProductId::new(n)
}

// === add_product ===

#[tokio::test]
async fn add_to_empty_cart_appends_catalog_item() {
    let mut h = Harness::new(StockTable::with(&[(1, 5)]), CatalogTable::shoes());

    h.store.add_product(id(1)).await.unwrap();

    assert_eq!(
        h.store.items(),
        &[LineItem::new(id(1), "Shoe", 10.0, "x", 1)]
    );
    assert_eq!(
        h.persisted_json(),
        serde_json::json!([{"id": 1, "title": "Shoe", "price": 10.0, "image": "x", "amount": 1}])
    );
    assert!(h.notices.kinds().is_empty());
}

#[tokio::test]
async fn add_existing_at_stock_limit_is_out_of_stock() {
    let mut h = Harness::seeded(&[(1, 1)], StockTable::with(&[(1, 1)]));
    let before = h.snapshot();

    let err = h.store.add_product(id(1)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OutOfStock);
    assert_eq!(h.snapshot(), before);
    assert_eq!(h.notices.kinds(), vec![ErrorKind::OutOfStock]);
}

#[tokio::test]
async fn add_existing_below_stock_increments() {
    let mut h = Harness::seeded(&[(1, 1), (2, 1)], StockTable::with(&[(1, 3)]));

    h.store.add_product(id(1)).await.unwrap();

    assert_eq!(h.quantities(), vec![(1, 2), (2, 1)]);
    assert_eq!(h.persisted_json()[0]["amount"], 2);
}

#[tokio::test]
async fn add_with_zero_stock_is_out_of_stock() {
    let mut h = Harness::new(StockTable::with(&[(1, 0)]), CatalogTable::shoes());

    let err = h.store.add_product(id(1)).await.unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { available: 0, .. }));
    assert!(h.store.is_empty());
    assert_eq!(h.persisted(), None);
}

#[tokio::test]
async fn add_without_stock_record_is_out_of_stock() {
    let mut h = Harness::new(StockTable::with(&[]), CatalogTable::shoes());

    let err = h.store.add_product(id(2)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OutOfStock);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn add_when_stock_lookup_fails_is_add_failed() {
    let mut h = Harness::seeded(&[(1, 1)], StockTable::failing());
    let before = h.snapshot();

    let err = h.store.add_product(id(1)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AddFailed);
    assert_eq!(h.snapshot(), before);
    assert_eq!(h.notices.kinds(), vec![ErrorKind::AddFailed]);
}

#[tokio::test]
async fn add_when_catalog_fails_is_add_failed() {
    let catalog = CatalogTable {
        fail: true,
        ..CatalogTable::shoes()
    };
    let mut h = Harness::new(StockTable::with(&[(1, 5)]), catalog);

    let err = h.store.add_product(id(1)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AddFailed);
    assert!(h.store.is_empty());
    assert_eq!(h.persisted(), None);
}

#[tokio::test]
async fn add_unknown_to_catalog_is_add_failed() {
    let mut h = Harness::new(StockTable::with(&[(99, 5)]), CatalogTable::shoes());

    let err = h.store.add_product(id(99)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AddFailed);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn add_never_duplicates_or_stores_zero() {
    let mut h = Harness::new(StockTable::with(&[(1, 3), (2, 3)]), CatalogTable::shoes());

    for product in [1, 2, 1, 1, 2, 1, 2, 2] {
        let _ = h.store.add_product(id(product)).await;
    }

    assert_eq!(h.quantities(), vec![(1, 3), (2, 3)]);
    assert!(h.store.items().iter().all(|i| i.quantity > 0));
}

#[tokio::test]
async fn failed_write_leaves_add_unapplied() {
    let mut h = Harness::seeded(&[(1, 1)], StockTable::with(&[(1, 5), (2, 5)]));
    let before = h.snapshot();
    h.storage.fail_writes(true);

    let err = h.store.add_product(id(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AddFailed);
    let err = h.store.add_product(id(2)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AddFailed);

    assert_eq!(h.snapshot(), before);
}

// === remove_product ===

#[tokio::test]
async fn remove_preserves_order_and_persists() {
    let mut h = Harness::seeded(&[(1, 1), (2, 2), (3, 1)], StockTable::default());

    h.store.remove_product(id(2)).unwrap();

    assert_eq!(h.quantities(), vec![(1, 1), (3, 1)]);
    let ids: Vec<u64> = h
        .persisted_json()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn remove_from_empty_cart_is_remove_failed() {
    let mut h = Harness::new(StockTable::default(), CatalogTable::shoes());

    let err = h.store.remove_product(id(9)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoveFailed);
    assert!(h.store.is_empty());
    assert_eq!(h.persisted(), None);
    assert_eq!(h.notices.kinds(), vec![ErrorKind::RemoveFailed]);
}

#[test]
fn remove_twice_fails_the_second_time() {
    let mut h = Harness::seeded(&[(1, 1)], StockTable::default());

    h.store.remove_product(id(1)).unwrap();
    let after_first = h.snapshot();
    let err = h.store.remove_product(id(1)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoveFailed);
    assert_eq!(h.snapshot(), after_first);
    assert_eq!(h.persisted_json(), serde_json::json!([]));
}

#[test]
fn failed_write_leaves_remove_unapplied() {
    let mut h = Harness::seeded(&[(1, 1), (2, 1)], StockTable::default());
    let before = h.snapshot();
    h.storage.fail_writes(true);

    let err = h.store.remove_product(id(1)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoveFailed);
    assert_eq!(h.snapshot(), before);
}

#[test]
fn remove_needs_no_stock_lookup() {
    let mut h = Harness::seeded(&[(1, 1)], StockTable::failing());
    h.store.remove_product(id(1)).unwrap();
    assert_eq!(h.stock.calls(), 0);
}

// === update_product_amount ===

#[tokio::test]
async fn update_sets_quantity_absolutely() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::with(&[(1, 5)]));

    h.store.update_product_amount(id(1), 2).await.unwrap();

    assert_eq!(h.quantities(), vec![(1, 2)]);
    assert_eq!(h.persisted_json()[0]["amount"], 2);
}

#[tokio::test]
async fn update_up_to_available_is_allowed() {
    let mut h = Harness::seeded(&[(1, 1)], StockTable::with(&[(1, 5)]));

    h.store.update_product_amount(id(1), 5).await.unwrap();

    assert_eq!(h.quantities(), vec![(1, 5)]);
}

#[tokio::test]
async fn update_above_available_is_out_of_stock() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::with(&[(1, 5)]));
    let before = h.snapshot();

    let err = h.store.update_product_amount(id(1), 6).await.unwrap_err();

    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 6,
            available: 5,
            ..
        }
    ));
    assert_eq!(h.snapshot(), before);
    assert_eq!(h.notices.kinds(), vec![ErrorKind::OutOfStock]);
}

#[tokio::test]
async fn update_with_non_positive_quantity_is_a_silent_no_op() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::with(&[(1, 5)]));
    let before = h.snapshot();

    for quantity in [0, -1, i64::MIN] {
        h.store.update_product_amount(id(1), quantity).await.unwrap();
    }

    assert_eq!(h.snapshot(), before);
    assert_eq!(h.stock.calls(), 0);
    assert!(h.notices.kinds().is_empty());
}

#[tokio::test]
async fn update_without_stock_record_is_update_failed() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::with(&[]));
    let before = h.snapshot();

    let err = h.store.update_product_amount(id(1), 2).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpdateFailed);
    assert_eq!(h.snapshot(), before);
}

#[tokio::test]
async fn update_when_stock_lookup_fails_is_update_failed() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::failing());
    let before = h.snapshot();

    let err = h.store.update_product_amount(id(1), 2).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpdateFailed);
    assert_eq!(h.snapshot(), before);
    assert_eq!(h.notices.kinds(), vec![ErrorKind::UpdateFailed]);
}

#[tokio::test]
async fn update_product_not_in_cart_is_ignored() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::with(&[(1, 5), (2, 5)]));
    let before = h.snapshot();

    h.store.update_product_amount(id(2), 1).await.unwrap();

    assert_eq!(h.snapshot(), before);
}

#[tokio::test]
async fn failed_write_leaves_update_unapplied() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::with(&[(1, 5)]));
    let before = h.snapshot();
    h.storage.fail_writes(true);

    let err = h.store.update_product_amount(id(1), 4).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpdateFailed);
    assert_eq!(h.snapshot(), before);
}

#[tokio::test]
async fn stock_is_checked_once_per_update() {
    let mut h = Harness::seeded(&[(1, 3)], StockTable::with(&[(1, 5)]));
    h.store.update_product_amount(id(1), 4).await.unwrap();
    assert_eq!(h.stock.calls(), 1);
}

// === lifecycle ===

#[tokio::test]
async fn reopening_restores_persisted_cart() {
    let storage = Arc::new(MemoryStore::new());
    let mut h = Harness::with_storage(
        StockTable::with(&[(1, 5), (3, 5)]),
        CatalogTable::shoes(),
        storage.clone(),
    );
    h.store.add_product(id(3)).await.unwrap();
    h.store.add_product(id(1)).await.unwrap();
    h.store.update_product_amount(id(1), 4).await.unwrap();
    let cart = h.store.cart().clone();

    let reopened = Harness::with_storage(StockTable::default(), CatalogTable::shoes(), storage);

    assert_eq!(reopened.store.cart(), &cart);
    assert_eq!(reopened.quantities(), vec![(3, 1), (1, 4)]);
}

#[test]
fn open_drops_invalid_persisted_entries() {
    let storage = Arc::new(MemoryStore::with_entry(
        KEY,
        r#"[{"id":1,"title":"A","price":1.5,"image":"a","amount":0},
            {"id":2,"title":"B","price":2,"image":"b","amount":2},
            {"id":2,"title":"B","price":2,"image":"b","amount":9}]"#,
    ));

    let h = Harness::with_storage(StockTable::default(), CatalogTable::shoes(), storage);

    assert_eq!(h.quantities(), vec![(2, 2)]);
}

#[tokio::test]
async fn pricing_reflects_current_cart() {
    let mut h = Harness::new(StockTable::with(&[(2, 5), (3, 5)]), CatalogTable::shoes());
    h.store.add_product(id(2)).await.unwrap();
    h.store.add_product(id(3)).await.unwrap();
    h.store.update_product_amount(id(3), 2).await.unwrap();

    let pricing = h.store.pricing().unwrap();

    assert_eq!(pricing.line(id(2)).unwrap().subtotal.amount_cents, 13990);
    assert_eq!(pricing.line(id(3)).unwrap().subtotal.amount_cents, 9100);
    assert_eq!(pricing.total.display(), "$230.90");
    assert_eq!(h.store.len(), 2);
    assert_eq!(h.store.item_count(), 3);
    assert_eq!(h.store.quantities().get(&id(3)), Some(&2));
}

#[tokio::test]
async fn catalog_prices_are_stored_as_received() {
    for currency in [Currency::USD, Currency::JPY] {
        let storage = Arc::new(MemoryStore::new());
        let mut h = Harness::with_config(
            CartConfig::default().with_currency(currency),
            StockTable::with(&[(2, 5), (4, 5)]),
            CatalogTable::shoes(),
            storage.clone(),
        );
        h.store.add_product(id(2)).await.unwrap();
        h.store.add_product(id(4)).await.unwrap();

        let prices: Vec<serde_json::Value> = h
            .persisted_json()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["price"].clone())
            .collect();
        assert_eq!(prices, vec![serde_json::json!(139.9), serde_json::json!(19.999)]);

        let reopened = Harness::with_config(
            CartConfig::default().with_currency(currency),
            StockTable::default(),
            CatalogTable::shoes(),
            storage,
        );
        assert_eq!(reopened.store.get(id(4)).unwrap().unit_price, 19.999);
        assert_eq!(reopened.store.cart(), h.store.cart());
    }
}

#[tokio::test]
async fn changing_currency_does_not_rewrite_stored_prices() {
    let storage = Arc::new(MemoryStore::new());
    let mut usd = Harness::with_storage(
        StockTable::with(&[(4, 5)]),
        CatalogTable::shoes(),
        storage.clone(),
    );
    usd.store.add_product(id(4)).await.unwrap();

    let mut jpy = Harness::with_config(
        CartConfig::default().with_currency(Currency::JPY),
        StockTable::with(&[(4, 5)]),
        CatalogTable::shoes(),
        storage,
    );
    jpy.store.update_product_amount(id(4), 3).await.unwrap();

    assert_eq!(jpy.persisted_json()[0]["price"], serde_json::json!(19.999));
    assert_eq!(jpy.store.pricing().unwrap().total, Money::new(60, Currency::JPY));
}

#[tokio::test]
async fn unusual_catalog_prices_are_kept_and_fail_pricing_when_unrepresentable() {
    let catalog = CatalogTable {
        products: vec![
            Product::new(ProductId::new(5), "Refund", -5.25, "x"),
            Product::new(ProductId::new(6), "Glitch", 1e300, "x"),
        ],
        fail: false,
    };
    let mut h = Harness::new(StockTable::with(&[(5, 1), (6, 1)]), catalog);

    h.store.add_product(id(5)).await.unwrap();
    assert_eq!(h.persisted_json()[0]["price"], serde_json::json!(-5.25));
    assert_eq!(h.store.pricing().unwrap().total, Money::new(-525, Currency::USD));

    h.store.add_product(id(6)).await.unwrap();
    assert_eq!(h.store.get(id(6)).unwrap().unit_price, 1e300);
    assert_eq!(h.store.pricing(), Err(PricingError::InvalidPrice(id(6))));
    assert!(h.notices.kinds().is_empty());
}
