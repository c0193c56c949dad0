//! Navigation-sync controller
//!
//! Reconciles two triggers that both want to change the displayed variant:
//! the shopper picking a property value, and the router announcing a
//! different id in the address bar. The controller performs no IO. It hands
//! out [`LoadRequest`]s, gets their results back through
//! [`NavigationController::complete`], and raises [`PageEvent`]s for the URL.

use indexmap::IndexSet;

use crate::catalog::{DetailLoad, FamilyLoad};
use crate::domain::resolver::{available_values, repair_selection, resolve_variant_id};
use crate::domain::{PageEvent, SelectionState, VariantId, VariantMatrix};
use crate::{ErrorScope, LoadError, PageError, VariantDetail, VariantProperties};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    /// Full family load with the page spinner.
    Family,
    /// Detail + properties for an id of the loaded family, without spinner.
    Variant,
}

/// Identifies one issued load; completions carry it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    variant_id: VariantId,
    kind: LoadKind,
}

impl Ticket {
    pub fn variant_id(&self) -> &VariantId { &self.variant_id }
    pub fn kind(&self) -> LoadKind { self.kind }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: Ticket,
    /// Silent loads must not toggle the page loading indicator.
    pub silent: bool,
}

#[derive(Clone, Debug)]
pub enum Loaded {
    Family(FamilyLoad),
    Variant(DetailLoad),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Started by a pick. `echo_pending` is the one-shot guard for the
    /// router change our own URL replace will cause.
    InternalTransition { target: VariantId, reload: Option<Ticket>, echo_pending: bool },
    ExternalNavigation { target: VariantId, reload: Ticket },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Unknown property or value, or no family on display.
    Ignored,
    /// The selection is incomplete or names a combination that does not exist.
    NoMatchingVariant,
    SameVariant,
    Transition(LoadRequest),
}

#[derive(Debug, Default)]
pub struct NavigationController {
    matrix: Option<VariantMatrix>,
    detail: Option<VariantDetail>,
    properties: Option<VariantProperties>,
    selection: SelectionState,
    /// Selection of the variant actually on display.
    committed_selection: SelectionState,
    desired: Option<VariantId>,
    route: Option<VariantId>,
    phase: Phase,
    loading: bool,
    error: Option<PageError>,
    next_seq: u64,
    events: Vec<PageEvent>,
}

impl NavigationController {
    pub fn new() -> Self { Self::default() }

    pub fn matrix(&self) -> Option<&VariantMatrix> { self.matrix.as_ref() }
    pub fn detail(&self) -> Option<&VariantDetail> { self.detail.as_ref() }
    pub fn properties(&self) -> Option<&VariantProperties> { self.properties.as_ref() }
    pub fn selection(&self) -> &SelectionState { &self.selection }
    pub fn phase(&self) -> &Phase { &self.phase }
    pub fn is_idle(&self) -> bool { self.phase == Phase::Idle }
    pub fn is_loading(&self) -> bool { self.loading }
    pub fn error(&self) -> Option<&PageError> { self.error.as_ref() }
    pub fn desired_variant(&self) -> Option<&VariantId> { self.desired.as_ref() }
    pub fn displayed_variant(&self) -> Option<&VariantId> { self.detail.as_ref().map(|d| &d.id) }
    pub fn take_events(&mut self) -> Vec<PageEvent> { std::mem::take(&mut self.events) }

    /// Title to show: the target's name from the matrix while a pick is
    /// still loading, otherwise the displayed detail's.
    pub fn display_name(&self) -> Option<&str> {
        if let (Phase::InternalTransition { target, reload: Some(_), .. }, Some(m)) = (&self.phase, &self.matrix) {
            if let Some(name) = m.row(target).and_then(|r| r.name.as_deref()) { return Some(name); }
        }
        self.detail.as_ref().map(|d| d.name.as_str())
    }

    /// Choosable values of `property` under the current selection.
    pub fn available_values(&self, property: &str) -> IndexSet<&str> {
        match &self.matrix {
            Some(m) => available_values(property, &self.selection, m),
            None => IndexSet::new(),
        }
    }

    /// First load of a page visit, from the router's id.
    pub fn mount(&mut self, variant_id: VariantId) -> LoadRequest {
        self.route = Some(variant_id.clone());
        self.begin_external(variant_id)
    }

    pub fn select_value(&mut self, property: &str, value: &str) -> SelectOutcome {
        let Some(matrix) = self.matrix.as_ref() else { return SelectOutcome::Ignored };
        if self.loading { return SelectOutcome::Ignored; }
        if !matrix.is_selectable(property) || !matrix.has_value(property, value) {
            tracing::warn!(property, value, "Rejected pick outside the variant family");
            return SelectOutcome::Ignored;
        }

        let names = matrix.selectable_names();
        let repaired = repair_selection(property, value, &self.selection, names, matrix);
        let resolved = resolve_variant_id(&repaired, names, matrix).cloned();
        self.selection = repaired;

        let Some(id) = resolved else {
            tracing::debug!(property, value, "Selection has no matching variant");
            return SelectOutcome::NoMatchingVariant;
        };
        if self.desired.as_ref() == Some(&id) { return SelectOutcome::SameVariant; }

        // No replace, and so no echo to skip, when the address bar already shows the id.
        let replace = self.url_target() != Some(&id);
        if replace { self.events.push(PageEvent::url_replaced(&id)); }
        self.desired = Some(id.clone());

        if self.displayed_variant() == Some(&id) {
            tracing::debug!(variant_id = %id, "Pick returned to the displayed variant");
            self.phase = match replace {
                true => Phase::InternalTransition { target: id, reload: None, echo_pending: true },
                false => Phase::Idle,
            };
            return SelectOutcome::SameVariant;
        }

        let ticket = self.issue(id.clone(), LoadKind::Variant);
        self.phase = Phase::InternalTransition { target: id.clone(), reload: Some(ticket.clone()), echo_pending: replace };
        tracing::info!(variant_id = %id, "Switching variant");
        SelectOutcome::Transition(LoadRequest { ticket, silent: true })
    }

    /// The router's variant id param changed.
    pub fn route_changed(&mut self, variant_id: VariantId) -> Option<LoadRequest> {
        if self.route.as_ref() == Some(&variant_id) { return None; }
        self.route = Some(variant_id.clone());

        if let Phase::InternalTransition { echo_pending, reload, .. } = &mut self.phase {
            if *echo_pending {
                *echo_pending = false;
                let settled = reload.is_none();
                tracing::debug!(variant_id = %variant_id, "Skipping router echo of our own URL replace");
                if settled { self.phase = Phase::Idle; }
                return None;
            }
        }
        if self.desired.as_ref() == Some(&variant_id) { return None; }
        if self.displayed_variant() == Some(&variant_id) {
            tracing::debug!(variant_id = %variant_id, "Router returned to the displayed variant");
            self.desired = Some(variant_id);
            self.selection = self.committed_selection.clone();
            self.loading = false;
            self.phase = Phase::Idle;
            return None;
        }
        Some(self.begin_external(variant_id))
    }

    /// Feeds back a settled load. Anything but the current pending load is stale.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<Loaded, LoadError>) {
        if self.pending_ticket() != Some(ticket) {
            tracing::debug!(variant_id = %ticket.variant_id, "Discarding stale response");
            return;
        }
        self.loading = false;
        match result {
            Ok(loaded) => self.commit(ticket, loaded),
            Err(e) => self.fail(ticket, e),
        }
    }

    fn pending_ticket(&self) -> Option<&Ticket> {
        match &self.phase {
            Phase::Idle => None,
            Phase::InternalTransition { reload, .. } => reload.as_ref(),
            Phase::ExternalNavigation { reload, .. } => Some(reload),
        }
    }

    /// Where the address bar ends up once our outstanding replace is echoed.
    fn url_target(&self) -> Option<&VariantId> {
        match &self.phase {
            Phase::InternalTransition { target, echo_pending: true, .. } => Some(target),
            _ => self.route.as_ref(),
        }
    }

    fn issue(&mut self, variant_id: VariantId, kind: LoadKind) -> Ticket {
        self.next_seq += 1;
        Ticket { seq: self.next_seq, variant_id, kind }
    }

    fn begin_external(&mut self, variant_id: VariantId) -> LoadRequest {
        let in_family = self.matrix.as_ref().is_some_and(|m| m.contains(&variant_id));
        let kind = if in_family { LoadKind::Variant } else { LoadKind::Family };
        let ticket = self.issue(variant_id.clone(), kind);
        self.loading = kind == LoadKind::Family;
        tracing::info!(variant_id = %variant_id, ?kind, "External navigation");
        self.desired = Some(variant_id.clone());
        self.phase = Phase::ExternalNavigation { target: variant_id, reload: ticket.clone() };
        LoadRequest { ticket, silent: kind == LoadKind::Variant }
    }

    fn commit(&mut self, ticket: &Ticket, loaded: Loaded) {
        let id = ticket.variant_id.clone();
        let external = matches!(self.phase, Phase::ExternalNavigation { .. });
        let (detail, properties) = match loaded {
            Loaded::Family(load) => {
                self.events.push(PageEvent::FamilyLoaded { variant_id: id.clone(), variant_count: load.matrix.len() });
                self.matrix = Some(load.matrix);
                (load.detail, load.properties)
            }
            Loaded::Variant(load) => (load.detail, load.properties),
        };
        let committed = self.matrix.as_ref()
            .and_then(|m| m.row(&id).map(|row| SelectionState::from_row(row, m.selectable_names())))
            .unwrap_or_default();
        if external { self.selection = committed.clone(); }
        self.committed_selection = committed;
        self.detail = Some(detail);
        self.properties = Some(properties);
        self.error = None;
        self.events.push(PageEvent::VariantDisplayed { variant_id: id.clone() });
        tracing::info!(variant_id = %id, "Variant displayed");

        self.phase = match std::mem::take(&mut self.phase) {
            Phase::InternalTransition { target, echo_pending: true, .. } => {
                Phase::InternalTransition { target, reload: None, echo_pending: true }
            }
            _ => Phase::Idle,
        };
    }

    fn fail(&mut self, ticket: &Ticket, error: LoadError) {
        let scope = match ticket.kind { LoadKind::Family => ErrorScope::Family, LoadKind::Variant => ErrorScope::Variant };
        let page_error = PageError::from_load(&error, scope);
        tracing::warn!(variant_id = %ticket.variant_id, %error, "Load failed");
        self.events.push(PageEvent::LoadFailed { variant_id: ticket.variant_id.clone(), error: page_error.clone() });
        self.error = Some(page_error);

        let displayed = self.displayed_variant().cloned();
        self.desired = displayed.clone();
        let internal = matches!(self.phase, Phase::InternalTransition { .. });
        if internal { self.selection = self.committed_selection.clone(); }
        let url_target = self.url_target().cloned();
        self.phase = match displayed {
            Some(id) if internal && url_target.as_ref() != Some(&id) => {
                self.events.push(PageEvent::url_replaced(&id));
                Phase::InternalTransition { target: id, reload: None, echo_pending: true }
            }
            _ => Phase::Idle,
        };
    }
}
