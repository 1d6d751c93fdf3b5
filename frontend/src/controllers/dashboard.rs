//! # Dashboard Controller
//!
//! Fetches the aggregate statistics once and exposes them for the summary
//! cards, the monthly revenue chart and the status breakdown.

use log::{error, info};
use shared::DashboardStats;

use crate::context::AppContext;
use crate::controllers::state::{LoadState, Notice, Notices, RequestSequencer, RequestTicket};
use crate::services::api::{ApiError, DataOrigin, Served};
use crate::services::gateway::Gateway;

/// Text of the panel shown instead of the dashboard when loading fails
pub const LOAD_FAILED_MESSAGE: &str = "Unable to load dashboard";

pub struct DashboardController {
    gateway: Gateway,
    state: LoadState,
    stats: Option<DashboardStats>,
    offline: bool,
    sequencer: RequestSequencer,
    notices: Notices,
}

impl DashboardController {
    pub fn new(context: &AppContext) -> Self {
        Self {
            gateway: context.gateway().clone(),
            state: LoadState::Idle,
            stats: None,
            offline: false,
            sequencer: RequestSequencer::new(),
            notices: Notices::default(),
        }
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.state = LoadState::Loading;
        self.sequencer.issue()
    }

    /// Apply the answer to the request tagged `ticket`. Returns false when a
    /// newer request has been issued since and the answer was dropped.
    pub fn complete_load(&mut self, ticket: RequestTicket, result: Result<Served<DashboardStats>, ApiError>) -> bool {
        if !self.sequencer.accept(ticket, "dashboard stats") {
            return false;
        }

        match result.and_then(Served::into_data) {
            Ok((stats, origin)) => {
                info!(
                    "Dashboard loaded: {} invoices, {} overdue",
                    stats.total_invoices, stats.overdue_invoices
                );
                self.offline = origin == DataOrigin::Fixture;
                self.stats = Some(stats);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                error!("Failed to load dashboard stats: {}", e);
                self.notices.error(format!("Failed to load dashboard: {}", e));
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let result = self.gateway.dashboard_stats().await;
        self.complete_load(ticket, result);
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    /// Panel text to show in place of the dashboard, if loading failed
    pub fn failure_panel(&self) -> Option<&'static str> {
        self.state.error().map(|_| LOAD_FAILED_MESSAGE)
    }

    /// Caption of the overdue card
    pub fn overdue_attention(&self) -> Option<&'static str> {
        self.stats.as_ref().map(|stats| {
            if stats.overdue_invoices > 0 {
                "Needs attention"
            } else {
                "All caught up!"
            }
        })
    }

    /// Whether the figures on screen came from fixtures
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config::{AppConfig, DataSourceMode};
    use crate::services::fixtures::fixture_stats;
    use crate::services::gateway::tests::failing_gateway;
    use crate::services::storage::MemoryClientStorage;
    use shared::ApiResponse;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_offline_load() {
        let mut controller = DashboardController::new(&AppContext::offline());
        controller.load().await;

        assert!(controller.state().is_ready());
        assert!(controller.is_offline());
        assert_eq!(controller.stats().unwrap().total_invoices, 25);
        assert_eq!(controller.overdue_attention(), Some("Needs attention"));
        assert!(controller.failure_panel().is_none());
    }

    #[tokio::test]
    async fn test_failure_shows_panel() {
        let (_server, gateway) = failing_gateway(DataSourceMode::Remote).await;
        let context = AppContext::new(AppConfig::default(), Arc::new(MemoryClientStorage::new()), gateway);
        let mut controller = DashboardController::new(&context);

        controller.load().await;

        assert!(controller.state().error().is_some());
        assert_eq!(controller.failure_panel(), Some(LOAD_FAILED_MESSAGE));
        assert!(controller.stats().is_none());
        assert_eq!(controller.take_notices().len(), 1);
    }

    #[test]
    fn test_stale_answer_is_discarded() {
        let mut controller = DashboardController::new(&AppContext::offline());
        let first = controller.begin_load();
        let second = controller.begin_load();

        let mut calm = fixture_stats();
        calm.overdue_invoices = 0;
        assert!(controller.complete_load(second, Ok(Served::remote(ApiResponse::ok(calm)))));
        assert!(!controller.complete_load(first, Ok(Served::fixture(ApiResponse::ok(fixture_stats())))));

        assert_eq!(controller.overdue_attention(), Some("All caught up!"));
        assert!(!controller.is_offline());
    }
}
