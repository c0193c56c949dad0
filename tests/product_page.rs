//! End-to-end tests for `ProductPageSession` over the fixture catalog.
//!
//! Backend latency is simulated with `tokio::time::sleep` under paused time,
//! so completion order is deterministic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use opensase_storefront::catalog::{CatalogApi, FamilyPayload};
use opensase_storefront::domain::PageEvent;
use opensase_storefront::fixtures::FixtureCatalog;
use opensase_storefront::navigation::{ProductPageSession, SelectOutcome};
use opensase_storefront::{LoadError, SelectionState, VariantDetail, VariantId, VariantProperties};

#[derive(Default)]
struct SlowCatalog {
    inner: FixtureCatalog,
    delays: HashMap<VariantId, Duration>,
    detail_calls: AtomicUsize,
    family_calls: AtomicUsize,
    /// Detail fetches that got past the simulated latency.
    detail_completions: AtomicUsize,
}

impl SlowCatalog {
    fn new(delays: &[(&str, u64)]) -> Arc<Self> {
        Arc::new(Self {
            inner: FixtureCatalog::sample(),
            delays: delays.iter().map(|(id, ms)| (VariantId::new(*id), Duration::from_millis(*ms))).collect(),
            ..Default::default()
        })
    }

    async fn wait(&self, id: &VariantId) {
        let delay = self.delays.get(id).copied().unwrap_or(Duration::from_millis(10));
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl CatalogApi for SlowCatalog {
    async fn fetch_variant_detail(&self, id: &VariantId) -> Result<VariantDetail, LoadError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.wait(id).await;
        self.detail_completions.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_variant_detail(id).await
    }

    async fn fetch_variant_family(&self, id: &VariantId) -> Result<FamilyPayload, LoadError> {
        self.family_calls.fetch_add(1, Ordering::SeqCst);
        self.wait(id).await;
        self.inner.fetch_variant_family(id).await
    }

    async fn fetch_variant_properties(&self, id: &VariantId) -> Result<VariantProperties, LoadError> {
        self.wait(id).await;
        self.inner.fetch_variant_properties(id).await
    }
}

async fn opened(catalog: &Arc<SlowCatalog>, id: &str) -> ProductPageSession<SlowCatalog> {
    let mut session = ProductPageSession::open(Arc::clone(catalog), VariantId::new(id));
    assert!(session.controller().is_loading());
    session.settle_all().await;
    session.take_events();
    session
}

#[tokio::test(start_paused = true)]
async fn open_loads_family_and_selection() {
    let catalog = SlowCatalog::new(&[]);
    let session = opened(&catalog, "phone-black-256").await;
    let c = session.controller();

    assert!(!c.is_loading());
    assert!(c.is_idle());
    assert_eq!(c.selection(), &SelectionState::new().with("color", "black").with("storage", "256GB"));
    let storages: Vec<_> = c.available_values("storage").into_iter().collect();
    assert_eq!(storages, vec!["128GB", "256GB"]);
    let colors: Vec<_> = c.available_values("color").into_iter().collect();
    assert_eq!(colors, vec!["black"]);
    assert_eq!(catalog.family_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn slower_stale_reload_is_ignored() {
    let catalog = SlowCatalog::new(&[("phone-black-256", 500), ("phone-white-128", 50)]);
    let mut session = opened(&catalog, "phone-black-128").await;

    assert!(matches!(session.select("storage", "256GB"), SelectOutcome::Transition(_)));
    assert_eq!(session.select("color", "white"), SelectOutcome::NoMatchingVariant);
    assert!(matches!(session.select("storage", "128GB"), SelectOutcome::Transition(_)));

    session.settle_all().await;
    let c = session.controller();
    assert_eq!(c.displayed_variant(), Some(&VariantId::new("phone-white-128")));
    assert_eq!(c.detail().unwrap().name, "OpenPhone white 128GB");
    assert!(!c.detail().unwrap().is_in_stock());
    assert_eq!(c.selection(), &SelectionState::new().with("color", "white").with("storage", "128GB"));
}

#[tokio::test(start_paused = true)]
async fn router_echo_does_not_reload_twice() {
    let catalog = SlowCatalog::new(&[]);
    let mut session = opened(&catalog, "phone-black-128").await;

    assert!(matches!(session.select("storage", "256GB"), SelectOutcome::Transition(_)));
    let replaced: Vec<_> = session.take_events().into_iter()
        .filter_map(|e| match e { PageEvent::UrlReplaced { variant_id, path } => Some((variant_id, path)), _ => None })
        .collect();
    assert_eq!(replaced, vec![(VariantId::new("phone-black-256"), "/products/phone-black-256".to_string())]);

    session.route_changed(VariantId::new("phone-black-256"));
    session.settle_all().await;

    assert_eq!(catalog.detail_calls.load(Ordering::SeqCst), 1);
    assert!(session.controller().is_idle());
    assert_eq!(session.controller().displayed_variant(), Some(&VariantId::new("phone-black-256")));
}

#[tokio::test(start_paused = true)]
async fn back_navigation_within_family_is_silent() {
    let catalog = SlowCatalog::new(&[]);
    let mut session = opened(&catalog, "phone-black-128").await;
    session.select("storage", "256GB");
    session.route_changed(VariantId::new("phone-black-256"));
    session.settle_all().await;

    session.route_changed(VariantId::new("phone-black-128"));
    assert!(!session.controller().is_loading());
    session.settle_all().await;

    assert_eq!(session.controller().displayed_variant(), Some(&VariantId::new("phone-black-128")));
    assert_eq!(session.controller().selection().get("storage"), Some("128GB"));
    assert_eq!(catalog.family_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn navigating_to_another_family_reloads_matrix() {
    let catalog = SlowCatalog::new(&[]);
    let mut session = opened(&catalog, "phone-black-128").await;

    session.route_changed(VariantId::new("case-clear"));
    assert!(session.controller().is_loading());
    session.settle_all().await;

    let c = session.controller();
    assert_eq!(c.matrix().unwrap().selectable_names(), ["finish"]);
    assert_eq!(c.selection(), &SelectionState::new().with("finish", "clear"));
    assert_eq!(catalog.family_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn unknown_variant_blocks_variant_area() {
    let catalog = SlowCatalog::new(&[]);
    let mut session = ProductPageSession::open(Arc::clone(&catalog), VariantId::new("discontinued"));
    session.settle_all().await;

    let err = session.controller().error().expect("page error");
    assert!(err.blocks_variant_area());
    assert_eq!(err.message, "Product not found");
    assert!(session.controller().matrix().is_none());
}

#[tokio::test(start_paused = true)]
async fn close_drops_in_flight_loads() {
    let catalog = SlowCatalog::new(&[("phone-black-256", 1_000)]);
    let mut session = opened(&catalog, "phone-black-128").await;
    session.select("storage", "256GB");
    assert!(session.has_pending());
    // Start the load without letting it finish.
    assert!(tokio::time::timeout(Duration::from_millis(100), session.next_settled()).await.is_err());
    assert_eq!(catalog.detail_calls.load(Ordering::SeqCst), 1);
    assert!(Arc::strong_count(&catalog) > 2);

    session.close();
    assert_eq!(Arc::strong_count(&catalog), 1);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(catalog.detail_completions.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn picking_back_to_displayed_variant_fetches_nothing_new() {
    let catalog = SlowCatalog::new(&[("phone-black-256", 200)]);
    let mut session = opened(&catalog, "phone-black-128").await;

    assert!(matches!(session.select("storage", "256GB"), SelectOutcome::Transition(_)));
    assert_eq!(session.select("storage", "128GB"), SelectOutcome::SameVariant);
    session.settle_all().await;

    assert_eq!(catalog.detail_calls.load(Ordering::SeqCst), 1);
    let c = session.controller();
    assert_eq!(c.displayed_variant(), Some(&VariantId::new("phone-black-128")));
    assert_eq!(c.selection(), &SelectionState::new().with("color", "black").with("storage", "128GB"));
}

#[tokio::test(start_paused = true)]
async fn routing_back_during_family_load_keeps_current_page() {
    let catalog = SlowCatalog::new(&[("case-clear", 300)]);
    let mut session = opened(&catalog, "phone-black-128").await;

    session.route_changed(VariantId::new("case-clear"));
    assert!(session.controller().is_loading());
    session.route_changed(VariantId::new("phone-black-128"));
    assert!(!session.controller().is_loading());
    session.settle_all().await;

    let c = session.controller();
    assert_eq!(c.matrix().unwrap().selectable_names(), ["color", "storage"]);
    assert_eq!(c.displayed_variant(), Some(&VariantId::new("phone-black-128")));
    assert_eq!(catalog.detail_calls.load(Ordering::SeqCst), 0);
}
