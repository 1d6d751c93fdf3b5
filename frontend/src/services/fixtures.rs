//! # Fixture Data Source
//!
//! Deterministic stand-in payloads used when the dashboard runs offline or
//! when a backend call fails in fallback mode. Nothing here is persisted:
//! creates and saves only receive a timestamp-based id.

use async_trait::async_trait;
use log::debug;
use shared::{
    ApiResponse, ChequePayload, DashboardStats, ExtractedData, ExtractedPayload, ExtractionKind, FacturePayload,
    Invoice, InvoiceItem, InvoicePatch, InvoiceStatus, KimbialePayload, MonthlyRevenue, PartSpecifications,
    StatusCount,
};

use crate::services::api::{ApiError, ApiResult, DataSource};
use crate::services::date_utils::{now_rfc3339, timestamp_id};
use crate::services::upload::ImageUpload;

/// Confidence reported by the canned extraction of each kind
pub fn fallback_confidence(kind: ExtractionKind) -> f64 {
    match kind {
        ExtractionKind::Facture => 0.95,
        ExtractionKind::Cheque => 0.92,
        ExtractionKind::Kimbiale => 0.88,
    }
}

/// The two invoices shown when no backend is reachable
pub fn fixture_invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            id: Some("1".to_string()),
            number: "INV-2024-001".to_string(),
            date: "2024-01-15".to_string(),
            due_date: "2024-02-15".to_string(),
            client_name: "John Doe".to_string(),
            client_email: "john@example.com".to_string(),
            client_address: "123 Main St, City, State 12345".to_string(),
            items: vec![
                InvoiceItem::new("Web Development", 1.0, 1500.0).with_id("1"),
                InvoiceItem::new("Design Services", 2.0, 500.0).with_id("2"),
            ],
            subtotal: 2500.0,
            tax: 250.0,
            total: 2750.0,
            status: InvoiceStatus::Sent,
            notes: None,
            created_at: Some("2024-01-15T10:00:00Z".to_string()),
            updated_at: Some("2024-01-15T10:00:00Z".to_string()),
        },
        Invoice {
            id: Some("2".to_string()),
            number: "INV-2024-002".to_string(),
            date: "2024-01-20".to_string(),
            due_date: "2024-02-20".to_string(),
            client_name: "Jane Smith".to_string(),
            client_email: "jane@example.com".to_string(),
            client_address: "456 Oak Ave, City, State 12345".to_string(),
            items: vec![InvoiceItem::new("Consulting Services", 10.0, 150.0).with_id("3")],
            subtotal: 1500.0,
            tax: 150.0,
            total: 1650.0,
            status: InvoiceStatus::Paid,
            notes: None,
            created_at: Some("2024-01-20T10:00:00Z".to_string()),
            updated_at: Some("2024-01-20T10:00:00Z".to_string()),
        },
    ]
}

pub fn fixture_stats() -> DashboardStats {
    let monthly = [
        ("Jan", 12500.0),
        ("Feb", 15200.0),
        ("Mar", 18050.0),
        ("Apr", 22100.0),
        ("May", 19800.0),
        ("Jun", 25400.0),
    ];
    let by_status = [("paid", 14), ("sent", 8), ("draft", 2), ("overdue", 1)];

    DashboardStats {
        total_invoices: 25,
        total_revenue: 45750.0,
        pending_invoices: 8,
        overdue_invoices: 3,
        monthly_revenue: monthly
            .iter()
            .map(|(month, revenue)| MonthlyRevenue {
                month: month.to_string(),
                revenue: *revenue,
            })
            .collect(),
        invoices_by_status: by_status
            .iter()
            .map(|(status, count)| StatusCount {
                status: status.to_string(),
                count: *count,
            })
            .collect(),
    }
}

/// Canned extraction payload matching the schema of `kind`
pub fn fixture_payload(kind: ExtractionKind) -> ExtractedPayload {
    match kind {
        ExtractionKind::Facture => ExtractedPayload::Facture(FacturePayload {
            invoice_number: "INV-2024-001".to_string(),
            date: "2024-01-15".to_string(),
            client_name: "John Doe".to_string(),
            client_email: "john@example.com".to_string(),
            items: vec![
                InvoiceItem::new("Web Development", 1.0, 1500.0),
                InvoiceItem::new("Design Services", 2.0, 500.0),
            ],
            subtotal: 2500.0,
            tax: 250.0,
            total: 2750.0,
        }),
        ExtractionKind::Cheque => ExtractedPayload::Cheque(ChequePayload {
            check_number: "CHK-001234".to_string(),
            date: "2024-01-15".to_string(),
            payee: "ABC Company".to_string(),
            amount: 2750.0,
            amount_in_words: "Two Thousand Seven Hundred Fifty Dollars".to_string(),
            bank_name: "First National Bank".to_string(),
            account_number: "****1234".to_string(),
        }),
        ExtractionKind::Kimbiale => ExtractedPayload::Kimbiale(KimbialePayload {
            part_number: "KMB-2024-001".to_string(),
            part_name: "Engine Component".to_string(),
            manufacturer: "Kimbiale Industries".to_string(),
            specifications: PartSpecifications {
                weight: "2.5kg".to_string(),
                dimensions: "15x10x5 cm".to_string(),
                material: "Aluminum Alloy".to_string(),
            },
            price: 450.0,
            availability: "In Stock".to_string(),
        }),
    }
}

/// Completed extraction record for `kind`, stamped with the current time
pub fn fixture_extraction(kind: ExtractionKind, original_image: &str) -> Result<ExtractedData, ApiError> {
    ExtractedData::from_payload(
        &fixture_payload(kind),
        original_image,
        fallback_confidence(kind),
        now_rfc3339(),
    )
    .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Data source answering every call from the fixtures above
#[derive(Debug, Clone, Default)]
pub struct FixtureDataSource;

impl FixtureDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for FixtureDataSource {
    async fn list_invoices(&self) -> ApiResult<Vec<Invoice>> {
        Ok(ApiResponse::ok(fixture_invoices()))
    }

    async fn get_invoice(&self, id: &str) -> ApiResult<Invoice> {
        fixture_invoices()
            .into_iter()
            .find(|invoice| invoice.has_id(id))
            .map(ApiResponse::ok)
            .ok_or_else(|| ApiError::NotFound(format!("invoice {}", id)))
    }

    async fn create_invoice(&self, invoice: &Invoice) -> ApiResult<Invoice> {
        let mut created = invoice.clone();
        created.id = Some(timestamp_id());
        debug!("Fixture create assigned id {:?}", created.id);
        Ok(ApiResponse::ok(created))
    }

    async fn update_invoice(&self, id: &str, patch: &InvoicePatch) -> ApiResult<Invoice> {
        // The patch is echoed back onto an empty record tagged with the id
        let mut updated = Invoice::placeholder(id);
        patch.apply_to(&mut updated);
        Ok(ApiResponse::ok(updated))
    }

    async fn delete_invoice(&self, _id: &str) -> ApiResult<()> {
        Ok(ApiResponse::ok(()))
    }

    async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        Ok(ApiResponse::ok(fixture_stats()))
    }

    async fn process_image(&self, upload: &ImageUpload, kind: ExtractionKind) -> ApiResult<ExtractedData> {
        fixture_extraction(kind, upload.file_name()).map(ApiResponse::ok)
    }

    async fn save_extracted(&self, data: &ExtractedData) -> ApiResult<ExtractedData> {
        let mut saved = data.clone();
        saved.id = Some(timestamp_id());
        Ok(ApiResponse::ok(saved))
    }
}
