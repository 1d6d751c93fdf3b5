use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{multipart, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{ApiResponse, DashboardStats, ExtractedData, ExtractionKind, Invoice, InvoicePatch};

use crate::services::api::{ApiError, ApiResult, DataSource};
use crate::services::config::AppConfig;
use crate::services::storage::{ClientStorage, AUTH_TOKEN_KEY};
use crate::services::upload::ImageUpload;

/// One configured backend
#[derive(Clone)]
struct Endpoint {
    client: Client,
    base_url: String,
}

impl Endpoint {
    fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Data source talking to the CRUD and AI backends over HTTP
#[derive(Clone)]
pub struct RemoteDataSource {
    crud: Endpoint,
    ai: Endpoint,
    storage: Arc<dyn ClientStorage>,
}

impl RemoteDataSource {
    /// Build both HTTP clients with the configured timeouts
    pub fn new(config: &AppConfig, storage: Arc<dyn ClientStorage>) -> Result<Self, ApiError> {
        Ok(Self {
            crud: Endpoint::new(&config.crud_base_url, config.crud_timeout())?,
            ai: Endpoint::new(&config.ai_base_url, config.ai_timeout())?,
            storage,
        })
    }

    /// Attach the stored bearer token, if any. The token is read on every
    /// request so a login after startup takes effect immediately. Storage
    /// may hit the disk, so the read runs on the blocking pool.
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let storage = Arc::clone(&self.storage);
        match tokio::task::spawn_blocking(move || storage.get(AUTH_TOKEN_KEY)).await {
            Ok(Ok(Some(token))) if !token.is_empty() => request.bearer_auth(token),
            Ok(Ok(_)) => request,
            Ok(Err(e)) => {
                warn!("Could not read auth token, sending request without it: {}", e);
                request
            }
            Err(e) => {
                warn!("Auth token read did not finish, sending request without it: {}", e);
                request
            }
        }
    }

    async fn send_raw<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<ApiResponse<Option<T>>, ApiError> {
        let response = self.authorize(request).await.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ApiResponse<Option<T>>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request whose envelope must carry data
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let envelope = self.send_raw::<T>(request).await?;
        require_data(envelope)
    }

    /// Send a request whose envelope carries no meaningful data
    async fn send_unit(&self, request: RequestBuilder) -> ApiResult<()> {
        let envelope = self.send_raw::<serde_json::Value>(request).await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.failure_reason()));
        }
        Ok(envelope.map(|_| ()))
    }
}

/// Turn an envelope with optional data into one with data, rejecting
/// unsuccessful envelopes
fn require_data<T>(envelope: ApiResponse<Option<T>>) -> ApiResult<T> {
    if !envelope.success {
        return Err(ApiError::Rejected(envelope.failure_reason()));
    }

    let ApiResponse {
        success,
        data,
        message,
        error,
    } = envelope;

    match data {
        Some(data) => Ok(ApiResponse {
            success,
            data,
            message,
            error,
        }),
        None => Err(ApiError::Decode("Response envelope has no data".to_string())),
    }
}

#[async_trait]
impl DataSource for RemoteDataSource {
    async fn list_invoices(&self) -> ApiResult<Vec<Invoice>> {
        let url = self.crud.url("/invoices");
        debug!("GET {}", url);
        self.send(self.crud.client.get(url)).await
    }

    async fn get_invoice(&self, id: &str) -> ApiResult<Invoice> {
        let url = self.crud.url(&format!("/invoices/{}", id));
        debug!("GET {}", url);
        self.send(self.crud.client.get(url)).await
    }

    async fn create_invoice(&self, invoice: &Invoice) -> ApiResult<Invoice> {
        let url = self.crud.url("/invoices");
        debug!("POST {}", url);
        self.send(self.crud.client.post(url).json(invoice)).await
    }

    async fn update_invoice(&self, id: &str, patch: &InvoicePatch) -> ApiResult<Invoice> {
        let url = self.crud.url(&format!("/invoices/{}", id));
        debug!("PUT {}", url);
        self.send(self.crud.client.put(url).json(patch)).await
    }

    async fn delete_invoice(&self, id: &str) -> ApiResult<()> {
        let url = self.crud.url(&format!("/invoices/{}", id));
        debug!("DELETE {}", url);
        self.send_unit(self.crud.client.delete(url)).await
    }

    async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let url = self.crud.url("/dashboard/stats");
        debug!("GET {}", url);
        self.send(self.crud.client.get(url)).await
    }

    async fn process_image(&self, upload: &ImageUpload, kind: ExtractionKind) -> ApiResult<ExtractedData> {
        let url = self.ai.url(&kind.endpoint());
        debug!("POST {} ({} bytes)", url, upload.len());

        let part = multipart::Part::bytes(upload.bytes().to_vec())
            .file_name(upload.file_name().to_string())
            .mime_str(upload.mime_type())?;
        let form = multipart::Form::new().part("image", part);

        self.send(self.ai.client.post(url).multipart(form)).await
    }

    async fn save_extracted(&self, data: &ExtractedData) -> ApiResult<ExtractedData> {
        let url = self.ai.url("/save-extracted");
        debug!("POST {}", url);
        self.send(self.ai.client.post(url).json(data)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{fixture_extraction, fixture_invoices, fixture_stats};
    use crate::services::storage::{FileClientStorage, MemoryClientStorage};
    use serde_json::json;
    use shared::InvoiceStatus;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn remote_for(server: &MockServer, storage: MemoryClientStorage) -> RemoteDataSource {
        let config = AppConfig {
            crud_base_url: server.uri(),
            ai_base_url: format!("{}/ai/", server.uri()),
            crud_timeout_secs: 2,
            ai_timeout_secs: 2,
            ..AppConfig::default()
        };
        RemoteDataSource::new(&config, Arc::new(storage)).unwrap()
    }

    #[tokio::test]
    async fn test_list_invoices_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": fixture_invoices(),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new().with_value(AUTH_TOKEN_KEY, "token-123"));
        let response = remote.list_invoices().await.unwrap();

        assert!(response.success);
        assert_eq!(response.data, fixture_invoices());
    }

    #[tokio::test]
    async fn test_bearer_token_read_from_file_storage() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/invoices/1"))
            .and(header("authorization", "Bearer from-disk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = FileClientStorage::new(temp_dir.path().join("client_storage.yaml"));
        storage.set(AUTH_TOKEN_KEY, "from-disk").unwrap();
        let config = AppConfig {
            crud_base_url: server.uri(),
            crud_timeout_secs: 2,
            ..AppConfig::default()
        };
        let remote = RemoteDataSource::new(&config, Arc::new(storage)).unwrap();

        assert!(remote.delete_invoice("1").await.unwrap().success);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/stats"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new());
        match remote.dashboard_stats().await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Invoice 9 is archived",
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new());
        let err = remote.get_invoice("9").await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref reason) if reason == "Invoice 9 is archived"));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_update_sends_patch_body() {
        let server = MockServer::start().await;
        let mut updated = fixture_invoices().remove(0);
        updated.status = InvoiceStatus::Paid;

        Mock::given(method("PUT"))
            .and(path("/invoices/1"))
            .and(body_json(json!({"status": "paid"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": updated,
                "message": "Invoice updated",
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new());
        let response = remote
            .update_invoice("1", &InvoicePatch::status(InvoiceStatus::Paid))
            .await
            .unwrap();

        assert_eq!(response.data.status, InvoiceStatus::Paid);
        assert_eq!(response.message.as_deref(), Some("Invoice updated"));
    }

    #[tokio::test]
    async fn test_delete_accepts_envelope_without_data() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/invoices/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new());
        assert!(remote.delete_invoice("2").await.unwrap().success);
    }

    #[tokio::test]
    async fn test_missing_data_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new());
        assert!(matches!(remote.dashboard_stats().await, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_process_image_posts_to_kind_endpoint() {
        let server = MockServer::start().await;
        let extraction = fixture_extraction(ExtractionKind::Kimbiale, "part.jpg").unwrap();

        Mock::given(method("POST"))
            .and(path("/ai/kimbiale"))
            .and(body_string_contains("name=\"image\""))
            .and(body_string_contains("filename=\"part.jpg\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": extraction,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new());
        let upload = ImageUpload::new("part.jpg", b"JPEGDATA".to_vec()).unwrap();
        let response = remote.process_image(&upload, ExtractionKind::Kimbiale).await.unwrap();

        assert_eq!(response.data.kind, ExtractionKind::Kimbiale);
        assert_eq!(response.data.confidence, extraction.confidence);
    }

    #[tokio::test]
    async fn test_stats_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": fixture_stats(),
            })))
            .mount(&server)
            .await;

        let remote = remote_for(&server, MemoryClientStorage::new());
        assert_eq!(remote.dashboard_stats().await.unwrap().data, fixture_stats());
    }
}
