//! # Invoices Controller
//!
//! Owns the invoice list shown on the invoices page.
//!
//! ## Responsibilities:
//! - Initial list fetch (stale answers are discarded by ticket)
//! - Client-side search and status filtering
//! - Status changes, deletes and creates, applied locally once the backend
//!   acknowledges them
//! - Detail view selection and single-invoice reads

use log::{error, info, warn};
use shared::{Invoice, InvoicePatch, InvoiceQuery, InvoiceStatus, StatusFilter};

use crate::context::AppContext;
use crate::controllers::state::{LoadState, Notice, Notices, RequestSequencer, RequestTicket};
use crate::services::api::{ApiError, DataOrigin, Served};
use crate::services::gateway::Gateway;

pub struct InvoicesController {
    gateway: Gateway,
    invoices: Vec<Invoice>,
    state: LoadState,
    query: InvoiceQuery,
    selected: Option<String>,
    offline: bool,
    sequencer: RequestSequencer,
    notices: Notices,
}

impl InvoicesController {
    pub fn new(context: &AppContext) -> Self {
        Self {
            gateway: context.gateway().clone(),
            invoices: Vec::new(),
            state: LoadState::Idle,
            query: InvoiceQuery::default(),
            selected: None,
            offline: false,
            sequencer: RequestSequencer::new(),
            notices: Notices::default(),
        }
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.state = LoadState::Loading;
        self.sequencer.issue()
    }

    /// Apply a list answer. Returns false if it was superseded.
    pub fn complete_load(&mut self, ticket: RequestTicket, result: Result<Served<Vec<Invoice>>, ApiError>) -> bool {
        if !self.sequencer.accept(ticket, "invoice list") {
            return false;
        }

        match result.and_then(Served::into_data) {
            Ok((invoices, origin)) => {
                info!("Loaded {} invoices", invoices.len());
                for invoice in &invoices {
                    if !invoice.totals_consistent() {
                        warn!("Invoice {} has inconsistent totals", invoice.number);
                    }
                }
                self.invoices = invoices;
                self.note_origin(origin);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                error!("Failed to fetch invoices: {}", e);
                self.notices.error(format!("Failed to fetch invoices: {}", e));
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let result = self.gateway.list_invoices().await;
        self.complete_load(ticket, result);
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.search = text.into();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.query.status = filter;
    }

    /// Invoices passing the current search and status filter
    pub fn visible(&self) -> Vec<&Invoice> {
        self.query.apply(&self.invoices)
    }

    /// Move an invoice to `status`. The transition is checked locally first;
    /// an illegal one never reaches the backend.
    pub async fn update_status(&mut self, id: &str, status: InvoiceStatus) -> bool {
        let current = match self.find(id) {
            Some(invoice) => invoice.status,
            None => {
                self.notices.error(format!("Invoice {} is not loaded", id));
                return false;
            }
        };

        if let Err(e) = current.transition(status) {
            let e = ApiError::from(e);
            warn!("Rejected status change for invoice {}: {}", id, e);
            self.notices.error(e.to_string());
            return false;
        }

        info!("Updating invoice {} status: {} -> {}", id, current, status);
        let result = self
            .gateway
            .update_invoice(id, &InvoicePatch::status(status))
            .await
            .and_then(Served::into_data);

        match result {
            Ok((_, origin)) => {
                if let Some(invoice) = self.invoices.iter_mut().find(|invoice| invoice.has_id(id)) {
                    invoice.status = status;
                }
                self.note_origin(origin);
                self.notices.success("Invoice status updated");
                true
            }
            Err(e) => {
                error!("Failed to update invoice {}: {}", id, e);
                self.notices.error(format!("Failed to update invoice: {}", e));
                false
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        info!("Deleting invoice {}", id);
        let result = self.gateway.delete_invoice(id).await.and_then(Served::into_data);

        match result {
            Ok((_, origin)) => {
                self.invoices.retain(|invoice| !invoice.has_id(id));
                if self.selected.as_deref() == Some(id) {
                    self.selected = None;
                }
                self.note_origin(origin);
                self.notices.success("Invoice deleted successfully");
                true
            }
            Err(e) => {
                error!("Failed to delete invoice {}: {}", id, e);
                self.notices.error(format!("Failed to delete invoice: {}", e));
                false
            }
        }
    }

    /// Create an invoice from a draft (no id yet) and append the stored copy
    pub async fn create(&mut self, draft: Invoice) -> Option<Invoice> {
        info!("Creating invoice {} for {}", draft.number, draft.client_name);
        let result = self.gateway.create_invoice(&draft).await.and_then(Served::into_data);

        match result {
            Ok((created, origin)) => {
                if origin == DataOrigin::Fixture {
                    warn!("Invoice {} only exists locally", created.number);
                }
                self.invoices.push(created.clone());
                self.note_origin(origin);
                self.notices.success("Invoice created successfully");
                Some(created)
            }
            Err(e) => {
                error!("Failed to create invoice: {}", e);
                self.notices.error(format!("Failed to create invoice: {}", e));
                None
            }
        }
    }

    /// Read one invoice from the backend, refreshing the cached copy
    pub async fn get(&mut self, id: &str) -> Result<Invoice, ApiError> {
        let result = self.gateway.get_invoice(id).await.and_then(Served::into_data);

        match result {
            Ok((invoice, origin)) => {
                if let Some(cached) = self.invoices.iter_mut().find(|cached| cached.has_id(id)) {
                    *cached = invoice.clone();
                }
                self.note_origin(origin);
                Ok(invoice)
            }
            Err(e) => {
                error!("Failed to fetch invoice {}: {}", id, e);
                self.notices.error(format!("Failed to fetch invoice: {}", e));
                Err(e)
            }
        }
    }

    /// Open the detail view for a loaded invoice
    pub fn select(&mut self, id: &str) -> bool {
        if self.find(id).is_some() {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&Invoice> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Identifiers (or numbers, for unsaved records) of loaded invoices whose
    /// arithmetic does not add up
    pub fn totals_report(&self) -> Vec<String> {
        self.invoices
            .iter()
            .filter(|invoice| !invoice.totals_consistent())
            .map(|invoice| invoice.id.clone().unwrap_or_else(|| invoice.number.clone()))
            .collect()
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    fn find(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| invoice.has_id(id))
    }

    fn note_origin(&mut self, origin: DataOrigin) {
        self.offline = origin == DataOrigin::Fixture;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::state::NoticeLevel;
    use crate::services::config::{AppConfig, DataSourceMode};
    use crate::services::fixtures::fixture_invoices;
    use crate::services::gateway::tests::{failing_gateway, unreachable_gateway};
    use crate::services::logging::init_test_logging;
    use crate::services::storage::{ClientStorage, MemoryClientStorage};
    use serde_json::json;
    use shared::{ApiResponse, InvoiceDraft};
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_for(gateway: Gateway) -> AppContext {
        AppContext::new(AppConfig::default(), Arc::new(MemoryClientStorage::new()), gateway)
    }

    async fn loaded(context: &AppContext) -> InvoicesController {
        let mut controller = InvoicesController::new(context);
        controller.load().await;
        controller
    }

    fn ids(invoices: &[&Invoice]) -> Vec<String> {
        invoices.iter().filter_map(|invoice| invoice.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_filter_and_search() {
        let mut controller = loaded(&AppContext::offline()).await;
        assert_eq!(controller.visible().len(), 2);

        controller.set_status_filter(StatusFilter::Only(InvoiceStatus::Paid));
        assert_eq!(ids(&controller.visible()), vec!["2"]);

        controller.set_status_filter(StatusFilter::All);
        controller.set_search("jane");
        assert_eq!(ids(&controller.visible()), vec!["2"]);

        controller.set_search("inv-2024-001");
        assert_eq!(ids(&controller.visible()), vec!["1"]);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let mut controller = loaded(&AppContext::offline()).await;
        controller.select("1");

        assert!(controller.delete("1").await);
        assert_eq!(ids(&controller.invoices().iter().collect::<Vec<_>>()), vec!["2"]);
        assert!(controller.selected().is_none());

        // Deleting again is harmless
        assert!(controller.delete("1").await);
        assert_eq!(controller.invoices().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_with_unreachable_backend() {
        init_test_logging();
        let context = context_for(unreachable_gateway(DataSourceMode::RemoteWithFallback));
        let mut controller = loaded(&context).await;
        assert!(controller.is_offline());

        assert!(controller.delete("1").await);
        assert_eq!(controller.invoices().len(), 1);
        assert!(controller.invoices()[0].has_id("2"));
    }

    #[tokio::test]
    async fn test_status_update_touches_only_target() {
        let mut controller = InvoicesController::new(&AppContext::offline());
        let mut invoices = fixture_invoices();
        invoices[1].status = InvoiceStatus::Sent;
        controller.invoices = invoices.clone();

        assert!(controller.update_status("2", InvoiceStatus::Paid).await);

        assert_eq!(controller.invoices()[0], invoices[0]);
        let updated = &controller.invoices()[1];
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(updated.client_name, "Jane Smith");
        assert_eq!(updated.total, invoices[1].total);

        let notices = controller.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Success);
    }

    fn remote_with_fallback(server: &MockServer) -> InvoicesController {
        let config = AppConfig {
            crud_base_url: server.uri(),
            crud_timeout_secs: 2,
            data_source: DataSourceMode::RemoteWithFallback,
            ..AppConfig::default()
        };
        let storage: Arc<dyn ClientStorage> = Arc::new(MemoryClientStorage::new());
        let gateway = Gateway::from_config(&config, Arc::clone(&storage)).unwrap();
        let mut controller = InvoicesController::new(&AppContext::new(config, storage, gateway));
        controller.invoices = fixture_invoices();
        controller.offline = true;
        controller
    }

    #[tokio::test]
    async fn test_remote_delete_clears_offline() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/invoices/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        let mut controller = remote_with_fallback(&server);

        assert!(controller.delete("1").await);

        assert_eq!(controller.invoices().len(), 1);
        assert!(controller.invoices()[0].has_id("2"));
        assert!(!controller.is_offline());
    }

    #[tokio::test]
    async fn test_remote_status_update_clears_offline() {
        let mut stored = fixture_invoices()[1].clone();
        stored.status = InvoiceStatus::Paid;
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/invoices/2"))
            .and(body_json(json!({ "status": "paid" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": stored,
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut controller = remote_with_fallback(&server);
        controller.invoices[1].status = InvoiceStatus::Sent;

        assert!(controller.update_status("2", InvoiceStatus::Paid).await);

        assert_eq!(controller.invoices()[1].status, InvoiceStatus::Paid);
        assert_eq!(controller.invoices()[0], fixture_invoices()[0]);
        assert!(!controller.is_offline());
    }

    #[tokio::test]
    async fn test_invalid_transition_sends_nothing() {
        let (server, gateway) = failing_gateway(DataSourceMode::Remote).await;
        let mut controller = InvoicesController::new(&context_for(gateway));
        controller.invoices = fixture_invoices();

        assert!(!controller.update_status("2", InvoiceStatus::Draft).await);

        assert_eq!(controller.invoices()[1].status, InvoiceStatus::Paid);
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
        assert_eq!(controller.take_notices()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_list_untouched() {
        let (_server, gateway) = failing_gateway(DataSourceMode::Remote).await;
        let mut controller = InvoicesController::new(&context_for(gateway));
        controller.invoices = fixture_invoices();

        assert!(!controller.update_status("1", InvoiceStatus::Paid).await);
        assert_eq!(controller.invoices(), fixture_invoices().as_slice());
    }

    #[tokio::test]
    async fn test_get_propagates_errors() {
        let (_server, gateway) = failing_gateway(DataSourceMode::RemoteWithFallback).await;
        let mut controller = InvoicesController::new(&context_for(gateway));

        assert!(controller.get("1").await.is_err());
        assert_eq!(controller.take_notices()[0].level, NoticeLevel::Error);

        let mut offline = loaded(&AppContext::offline()).await;
        assert!(matches!(offline.get("42").await, Err(ApiError::NotFound(_))));
        assert_eq!(offline.get("2").await.unwrap().client_name, "Jane Smith");
    }

    #[tokio::test]
    async fn test_create_appends() {
        let mut controller = loaded(&AppContext::offline()).await;
        let draft = InvoiceDraft::new("INV-2024-003", "Acme Corp")
            .dated("2024-03-01", "2024-03-31")
            .item("Support", 3.0, 200.0)
            .tax_rate(0.1)
            .build();

        let created = controller.create(draft).await.unwrap();

        assert!(created.id.is_some());
        assert_eq!(controller.invoices().len(), 3);
        assert_eq!(controller.invoices()[2].client_name, "Acme Corp");
        assert!(controller.totals_report().is_empty());
    }

    #[test]
    fn test_stale_list_is_discarded() {
        let mut controller = InvoicesController::new(&AppContext::offline());
        let first = controller.begin_load();
        let second = controller.begin_load();

        assert!(controller.complete_load(second, Ok(Served::remote(ApiResponse::ok(fixture_invoices())))));
        assert!(!controller.complete_load(first, Ok(Served::fixture(ApiResponse::ok(Vec::new())))));

        assert_eq!(controller.invoices().len(), 2);
        assert!(!controller.is_offline());
        assert!(controller.state().is_ready());
    }

    #[test]
    fn test_totals_report_and_selection() {
        let mut controller = InvoicesController::new(&AppContext::offline());
        let mut invoices = fixture_invoices();
        invoices[0].total += 10.0;
        controller.invoices = invoices;

        assert_eq!(controller.totals_report(), vec!["1".to_string()]);
        assert!(controller.select("2"));
        assert_eq!(controller.selected().unwrap().client_name, "Jane Smith");
        assert!(!controller.select("9"));
        controller.clear_selection();
        assert!(controller.selected().is_none());
    }
}
