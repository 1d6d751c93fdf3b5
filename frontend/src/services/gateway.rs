//! # Service Gateway
//!
//! Single entry point the page controllers use for backend data. The
//! gateway owns the remote and fixture data sources and decides, per the
//! configured `DataSourceMode`, which one answers. Every result is tagged
//! with the `DataOrigin` that served it, so a fallback to fixtures is
//! visible to the caller instead of being indistinguishable from real data.
//!
//! Single-invoice reads never fall back: a known resource is not faked.

use std::sync::Arc;

use log::{info, warn};
use shared::{DashboardStats, ExtractedData, ExtractionKind, Invoice, InvoicePatch};

use crate::services::api::{ApiError, ApiResult, DataSource, Served};
use crate::services::config::{AppConfig, DataSourceMode};
use crate::services::fixtures::FixtureDataSource;
use crate::services::remote::RemoteDataSource;
use crate::services::storage::ClientStorage;
use crate::services::upload::ImageUpload;

#[derive(Clone)]
pub struct Gateway {
    mode: DataSourceMode,
    remote: Arc<dyn DataSource>,
    fixtures: Arc<dyn DataSource>,
}

impl Gateway {
    pub fn new(mode: DataSourceMode, remote: Arc<dyn DataSource>, fixtures: Arc<dyn DataSource>) -> Self {
        Self { mode, remote, fixtures }
    }

    /// Gateway over the HTTP backends described by `config`
    pub fn from_config(config: &AppConfig, storage: Arc<dyn ClientStorage>) -> Result<Self, ApiError> {
        let remote = RemoteDataSource::new(config, storage)?;
        info!(
            "Gateway ready: mode={}, crud={}, ai={}",
            config.data_source, config.crud_base_url, config.ai_base_url
        );
        Ok(Self::new(
            config.data_source,
            Arc::new(remote),
            Arc::new(FixtureDataSource::new()),
        ))
    }

    /// Gateway answering only from fixtures
    pub fn offline() -> Self {
        let fixtures: Arc<dyn DataSource> = Arc::new(FixtureDataSource::new());
        Self::new(DataSourceMode::Fixture, fixtures.clone(), fixtures)
    }

    pub fn mode(&self) -> DataSourceMode {
        self.mode
    }

    fn remote(&self) -> Option<&Arc<dyn DataSource>> {
        match self.mode {
            DataSourceMode::Fixture => None,
            DataSourceMode::Remote | DataSourceMode::RemoteWithFallback => Some(&self.remote),
        }
    }

    /// Resolve a remote result. `Ok(None)` means the caller should answer
    /// from fixtures instead.
    fn settle<T>(&self, operation: &str, result: ApiResult<T>) -> Result<Option<Served<T>>, ApiError> {
        match result {
            Ok(response) => Ok(Some(Served::remote(response))),
            Err(e) if self.mode == DataSourceMode::RemoteWithFallback && e.is_transport() => {
                warn!("{} failed, serving fixture data instead: {}", operation, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_invoices(&self) -> Result<Served<Vec<Invoice>>, ApiError> {
        if let Some(remote) = self.remote() {
            if let Some(served) = self.settle("List invoices", remote.list_invoices().await)? {
                return Ok(served);
            }
        }
        self.fixtures.list_invoices().await.map(Served::fixture)
    }

    /// Fetch one invoice. Errors always propagate.
    pub async fn get_invoice(&self, id: &str) -> Result<Served<Invoice>, ApiError> {
        match self.remote() {
            Some(remote) => remote.get_invoice(id).await.map(Served::remote),
            None => self.fixtures.get_invoice(id).await.map(Served::fixture),
        }
    }

    /// Create an invoice. A fixture answer carries a local, non-durable id.
    pub async fn create_invoice(&self, invoice: &Invoice) -> Result<Served<Invoice>, ApiError> {
        if let Some(remote) = self.remote() {
            if let Some(served) = self.settle("Create invoice", remote.create_invoice(invoice).await)? {
                return Ok(served);
            }
        }
        self.fixtures.create_invoice(invoice).await.map(Served::fixture)
    }

    pub async fn update_invoice(&self, id: &str, patch: &InvoicePatch) -> Result<Served<Invoice>, ApiError> {
        if let Some(remote) = self.remote() {
            if let Some(served) = self.settle("Update invoice", remote.update_invoice(id, patch).await)? {
                return Ok(served);
            }
        }
        self.fixtures.update_invoice(id, patch).await.map(Served::fixture)
    }

    pub async fn delete_invoice(&self, id: &str) -> Result<Served<()>, ApiError> {
        if let Some(remote) = self.remote() {
            if let Some(served) = self.settle("Delete invoice", remote.delete_invoice(id).await)? {
                return Ok(served);
            }
        }
        self.fixtures.delete_invoice(id).await.map(Served::fixture)
    }

    pub async fn dashboard_stats(&self) -> Result<Served<DashboardStats>, ApiError> {
        if let Some(remote) = self.remote() {
            if let Some(served) = self.settle("Dashboard stats", remote.dashboard_stats().await)? {
                return Ok(served);
            }
        }
        self.fixtures.dashboard_stats().await.map(Served::fixture)
    }

    pub async fn process_image(
        &self,
        upload: &ImageUpload,
        kind: ExtractionKind,
    ) -> Result<Served<ExtractedData>, ApiError> {
        if let Some(remote) = self.remote() {
            if let Some(served) = self.settle("Process image", remote.process_image(upload, kind).await)? {
                return Ok(served);
            }
        }
        self.fixtures.process_image(upload, kind).await.map(Served::fixture)
    }

    pub async fn save_extracted(&self, data: &ExtractedData) -> Result<Served<ExtractedData>, ApiError> {
        if let Some(remote) = self.remote() {
            if let Some(served) = self.settle("Save extracted data", remote.save_extracted(data).await)? {
                return Ok(served);
            }
        }
        self.fixtures.save_extracted(data).await.map(Served::fixture)
    }
}
