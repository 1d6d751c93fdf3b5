use async_trait::async_trait;
use shared::{
    ApiResponse, DashboardStats, ExtractedData, ExtractionKind, Invoice, InvoicePatch, StatusTransitionError,
};
use thiserror::Error;

use crate::services::upload::ImageUpload;

/// Result of a single data source call
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Errors surfaced by the service gateway
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The server answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    UnknownKind(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionError),

    #[error("Unknown theme: '{0}'")]
    UnknownTheme(String),

    #[error("Client storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Failures caused by the network or a misbehaving server, as opposed
    /// to an answer the server gave on purpose.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::Status { .. } | ApiError::Decode(_)
        )
    }
}

/// Resolve a processing type name, failing before any network call
pub fn parse_kind(kind: &str) -> Result<ExtractionKind, ApiError> {
    kind.parse()
        .map_err(|e: shared::ParseEnumError| ApiError::UnknownKind(e.to_string()))
}

/// Which data source produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Remote,
    Fixture,
}

/// Envelope tagged with the data source that served it
#[derive(Debug, Clone, PartialEq)]
pub struct Served<T> {
    pub response: ApiResponse<T>,
    pub origin: DataOrigin,
}

impl<T> Served<T> {
    pub fn remote(response: ApiResponse<T>) -> Self {
        Self {
            response,
            origin: DataOrigin::Remote,
        }
    }

    pub fn fixture(response: ApiResponse<T>) -> Self {
        Self {
            response,
            origin: DataOrigin::Fixture,
        }
    }

    pub fn is_fixture(&self) -> bool {
        self.origin == DataOrigin::Fixture
    }

    /// Payload and origin of a successful envelope, or the reason it failed
    pub fn into_data(self) -> Result<(T, DataOrigin), ApiError> {
        let origin = self.origin;
        self.response
            .into_result()
            .map(|data| (data, origin))
            .map_err(ApiError::Rejected)
    }
}

/// Capability shared by the HTTP backends and the offline fixtures.
///
/// Every operation answers with the uniform `ApiResponse` envelope.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// List every invoice
    async fn list_invoices(&self) -> ApiResult<Vec<Invoice>>;

    /// Fetch a single invoice by id
    async fn get_invoice(&self, id: &str) -> ApiResult<Invoice>;

    /// Persist a new invoice; the returned copy carries the assigned id
    async fn create_invoice(&self, invoice: &Invoice) -> ApiResult<Invoice>;

    /// Apply a partial update to an existing invoice
    async fn update_invoice(&self, id: &str, patch: &InvoicePatch) -> ApiResult<Invoice>;

    async fn delete_invoice(&self, id: &str) -> ApiResult<()>;

    async fn dashboard_stats(&self) -> ApiResult<DashboardStats>;

    /// Upload an image for extraction with the schema of `kind`
    async fn process_image(&self, upload: &ImageUpload, kind: ExtractionKind) -> ApiResult<ExtractedData>;

    /// Persist an extraction result; the returned copy carries the assigned id
    async fn save_extracted(&self, data: &ExtractedData) -> ApiResult<ExtractedData>;
}
