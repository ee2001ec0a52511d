//! End-to-end catalog and cart flows against an in-process backend.
use async_trait::async_trait;
use shopfront_commerce::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

struct FakeCatalog {
    products: Vec<(Product, CatalogTab, &'static str)>,
    fail_next: AtomicBool,
    seen: Mutex<Vec<CatalogQuery>>,
    /// Added to every reported total, like a backend that counts deleted rows.
    phantom_total: u64,
}

impl FakeCatalog {
    fn new() -> Self {
        let mut products = Vec::new();
        for i in 0..57 {
            let category = if i < 12 { "lathes" } else { "mills" };
            let product = Product::new(format!("m{}", i), format!("Станок {}", i))
                .with_price(100_000.0 + i as f64);
            products.push((product, CatalogTab::Machines, category));
        }
        for i in 0..5 {
            let product = Product::new(format!("s{}", i), format!("Запчасть {}", i));
            products.push((product, CatalogTab::Spares, "bearings"));
        }
        Self {
            products,
            fail_next: AtomicBool::new(false),
            seen: Mutex::new(Vec::new()),
            phantom_total: 0,
        }
    }

    fn queries(&self) -> Vec<CatalogQuery> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, CommerceError> {
        self.seen.lock().unwrap().push(query.clone());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CommerceError::FetchError("HTTP 502: bad gateway".into()));
        }

        let matching: Vec<Product> = self
            .products
            .iter()
            .filter(|(_, tab, _)| *tab == query.tab)
            .filter(|(_, _, cat)| query.category.as_deref().map_or(true, |c| c == *cat))
            .filter(|(p, _, _)| {
                query
                    .search_term
                    .as_deref()
                    .map_or(true, |t| p.name.contains(t))
            })
            .map(|(p, _, _)| p.clone())
            .collect();
        let total = matching.len() as u64 + self.phantom_total;
        let results = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        Ok(SearchPage::new(results, total))
    }

    async fn filters(&self) -> Result<FilterGroups, CommerceError> {
        Ok(FilterGroups::default())
    }

    async fn product(&self, id_or_slug: &str) -> Result<Option<Product>, CommerceError> {
        Ok(self
            .products
            .iter()
            .map(|(p, _, _)| p)
            .find(|p| p.route_key() == id_or_slug)
            .cloned())
    }
}

#[tokio::test]
async fn test_paging_through_machines() {
    let api = FakeCatalog::new();
    let mut catalog = CatalogController::new();

    let ticket = catalog.reset();
    catalog.execute(&api, ticket).await;
    assert_eq!(catalog.results().len(), 20);
    assert_eq!(catalog.total(), 57);

    while let Some(ticket) = catalog.load_more() {
        catalog.execute(&api, ticket).await;
    }

    assert_eq!(catalog.results().len(), 57);
    assert!(!catalog.has_more());
    let offsets: Vec<u32> = api.queries().iter().map(|q| q.offset).collect();
    assert_eq!(offsets, vec![0, 20, 40]);

    let ids: Vec<&str> = catalog.results().iter().map(|p| p.id.as_str()).collect();
    let expected: Vec<String> = (0..57).map(|i| format!("m{}", i)).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_paging_stops_when_backend_overstates_total() {
    let mut api = FakeCatalog::new();
    api.phantom_total = 1000;
    let mut catalog = CatalogController::new();

    let ticket = catalog.reset();
    catalog.execute(&api, ticket).await;
    let mut fetches = 1;
    while let Some(ticket) = catalog.load_more() {
        catalog.execute(&api, ticket).await;
        fetches += 1;
        assert!(fetches < 10, "paging did not stop");
    }

    assert_eq!(catalog.results().len(), 57);
    assert_eq!(catalog.total(), 1057);
    assert!(!catalog.has_more());
    assert_eq!(fetches, 3);
}

#[tokio::test]
async fn test_category_change_discards_loaded_pages() {
    let api = FakeCatalog::new();
    let mut catalog = CatalogController::new();

    let ticket = catalog.reset();
    catalog.execute(&api, ticket).await;
    let ticket = catalog.load_more().unwrap();
    catalog.execute(&api, ticket).await;
    assert_eq!(catalog.results().len(), 40);

    let ticket = catalog.set_filter(FilterChange::category(Some("lathes")));
    let outcome = catalog.execute(&api, ticket).await;

    assert_eq!(outcome, ApplyOutcome::Replaced { count: 12 });
    assert_eq!(catalog.offset(), 0);
    assert_eq!(catalog.total(), 12);
    assert!(catalog.load_more().is_none());
}

#[tokio::test]
async fn test_slow_stale_search_is_ignored() {
    let api = FakeCatalog::new();
    let mut catalog = CatalogController::new();

    let slow = catalog.set_filter(FilterChange::search("Станок 1"));
    let fast = catalog.set_filter(FilterChange::search("Станок 5"));

    let fast_page = api.search(fast.query()).await;
    let slow_page = api.search(slow.query()).await;
    catalog.apply(fast, fast_page);
    assert_eq!(catalog.apply(slow, slow_page), ApplyOutcome::Stale);

    assert!(catalog
        .results()
        .iter()
        .all(|p| p.name.starts_with("Станок 5")));
}

#[tokio::test]
async fn test_failed_page_keeps_results_and_can_retry() {
    let api = FakeCatalog::new();
    let mut catalog = CatalogController::new();

    let ticket = catalog.reset();
    catalog.execute(&api, ticket).await;

    api.fail_next.store(true, Ordering::SeqCst);
    let ticket = catalog.load_more().unwrap();
    assert_eq!(catalog.execute(&api, ticket).await, ApplyOutcome::Failed);
    assert_eq!(catalog.results().len(), 20);
    assert!(!catalog.is_loading());

    let ticket = catalog.load_more().unwrap();
    assert_eq!(ticket.query().offset, 20);
    catalog.execute(&api, ticket).await;
    assert_eq!(catalog.results().len(), 40);
}

#[tokio::test]
async fn test_add_found_product_to_cart() {
    let api = FakeCatalog::new();
    let mut cart = CartStore::in_memory();

    for key in ["m3", "m3", "s1"] {
        let product = api.product(key).await.unwrap().unwrap();
        cart.add_item(CartItemDraft::from_product(&product, Currency::RUB, None));
    }

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 3);
    // s1 has no price and counts as zero
    assert_eq!(cart.total_amount(), Money::from_decimal(200_006.0, Currency::RUB));
}

#[cfg(feature = "storage")]
fn open_storage(dir: &std::path::Path) -> shopfront_commerce::cart::CacheCartStorage {
    shopfront_commerce::cart::CacheCartStorage::new(shopfront_cache::Cache::open(dir).unwrap())
}

#[cfg(feature = "storage")]
#[test]
fn test_cart_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut cart = CartStore::hydrate(open_storage(dir.path()));
        cart.add_item(CartItemDraft::new(
            "p1",
            "Патрон",
            Money::new(1_250_000, Currency::RUB),
        ));
        cart.update_quantity(&ProductId::new("p1"), 3);
    }

    let cart = CartStore::hydrate(open_storage(dir.path()));
    assert!(cart.is_hydrated());
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total_amount(), Money::new(3_750_000, Currency::RUB));
}
