//! Page-scoped driver executing the controller's load requests.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};

use super::controller::{LoadKind, LoadRequest, Loaded, NavigationController, SelectOutcome, Ticket};
use crate::catalog::{load_family, load_variant, CatalogApi};
use crate::domain::{PageEvent, VariantId};
use crate::LoadError;

type Settled = (Ticket, Result<Loaded, LoadError>);

/// One product page visit. Loads run concurrently and are fed back in
/// completion order; the controller decides which of them still count.
pub struct ProductPageSession<C: CatalogApi + 'static> {
    api: Arc<C>,
    controller: NavigationController,
    in_flight: FuturesUnordered<BoxFuture<'static, Settled>>,
}

impl<C: CatalogApi + 'static> ProductPageSession<C> {
    /// Starts a visit on the router's initial variant id.
    pub fn open(api: Arc<C>, variant_id: VariantId) -> Self {
        let mut session = Self { api, controller: NavigationController::new(), in_flight: FuturesUnordered::new() };
        let request = session.controller.mount(variant_id);
        session.dispatch(request);
        session
    }

    pub fn controller(&self) -> &NavigationController { &self.controller }
    pub fn take_events(&mut self) -> Vec<PageEvent> { self.controller.take_events() }
    pub fn has_pending(&self) -> bool { !self.in_flight.is_empty() }

    pub fn select(&mut self, property: &str, value: &str) -> SelectOutcome {
        let outcome = self.controller.select_value(property, value);
        if let SelectOutcome::Transition(request) = &outcome {
            self.dispatch(request.clone());
        }
        outcome
    }

    pub fn route_changed(&mut self, variant_id: VariantId) {
        if let Some(request) = self.controller.route_changed(variant_id) {
            self.dispatch(request);
        }
    }

    /// Waits for the next load to settle and applies it. `None` when nothing is in flight.
    pub async fn next_settled(&mut self) -> Option<Ticket> {
        let (ticket, result) = self.in_flight.next().await?;
        self.controller.complete(&ticket, result);
        Some(ticket)
    }

    pub async fn settle_all(&mut self) {
        while self.next_settled().await.is_some() {}
    }

    /// Ends the visit; responses still in flight are dropped unseen.
    pub fn close(self) {
        tracing::debug!(in_flight = self.in_flight.len(), "Product page closed");
    }

    fn dispatch(&mut self, request: LoadRequest) {
        let api = Arc::clone(&self.api);
        let ticket = request.ticket;
        self.in_flight.push(async move {
            let id = ticket.variant_id().clone();
            let result = match ticket.kind() {
                LoadKind::Family => load_family(api.as_ref(), &id).await.map(Loaded::Family),
                LoadKind::Variant => load_variant(api.as_ref(), &id).await.map(Loaded::Variant),
            };
            (ticket, result)
        }.boxed());
    }
}
