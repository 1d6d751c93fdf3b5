use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance used when checking invoice arithmetic (half a cent)
pub const TOTALS_TOLERANCE: f64 = 0.005;

/// Theme applied when the client storage holds no preference
pub const DEFAULT_THEME: &str = "dark";

/// Uniform wrapper around every response coming back from either backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether `data` is meaningful
    pub success: bool,
    pub data: T,
    /// Optional human-readable message from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error description when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope around `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Transform the payload while keeping the envelope metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: f(self.data),
            message: self.message,
            error: self.error,
        }
    }

    /// Best description of why the envelope is unsuccessful
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Request was not successful".to_string())
    }

    /// Payload of a successful envelope, or the failure reason
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.failure_reason())
        }
    }
}

impl<T: Default> ApiResponse<T> {
    /// Unsuccessful envelope carrying `error`
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: T::default(),
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Lifecycle status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    /// Badge label for display
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    /// Whether an invoice in this status may move to `next`.
    ///
    /// Invoices progress draft -> sent -> paid, one step at a time. Overdue
    /// is only ever set by the backend.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Draft, InvoiceStatus::Sent) | (InvoiceStatus::Sent, InvoiceStatus::Paid)
        )
    }

    /// Validate a transition, returning the new status
    pub fn transition(self, next: InvoiceStatus) -> Result<InvoiceStatus, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError { from: self, to: next })
        }
    }

    /// Statuses reachable from this one, in display order
    pub fn next_actions(self) -> Vec<InvoiceStatus> {
        Self::ALL
            .iter()
            .copied()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(ParseEnumError::new("invoice status", s)),
        }
    }
}

/// Rejected invoice status change
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransitionError {
    pub from: InvoiceStatus,
    pub to: InvoiceStatus,
}

impl fmt::Display for StatusTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoice cannot move from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for StatusTransitionError {}

/// A string did not name any known variant
#[derive(Debug, Clone, PartialEq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Single billable line of an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    /// Expected to equal `quantity * rate`
    pub amount: f64,
}

impl InvoiceItem {
    /// Create an item with its amount computed from quantity and rate
    pub fn new(description: impl Into<String>, quantity: f64, rate: f64) -> Self {
        Self {
            id: None,
            description: description.into(),
            quantity,
            rate,
            amount: round_cents(quantity * rate),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Invoice as exchanged with the CRUD backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Assigned by the server on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub number: String,
    /// Issue date (YYYY-MM-DD)
    pub date: String,
    pub due_date: String,
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Invoice {
    /// Empty invoice carrying only an identifier
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            number: String::new(),
            date: String::new(),
            due_date: String::new(),
            client_name: String::new(),
            client_email: String::new(),
            client_address: String::new(),
            items: Vec::new(),
            subtotal: 0.0,
            tax: 0.0,
            total: 0.0,
            status: InvoiceStatus::Draft,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Sum of the item amounts
    pub fn items_subtotal(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Every arithmetic rule the invoice breaks.
    ///
    /// Item amounts are compared at cent precision, like `InvoiceItem::new`
    /// computes them. Violations are reported, never rejected.
    pub fn totals_violations(&self) -> Vec<TotalsViolation> {
        let mut violations = Vec::new();

        for (index, item) in self.items.iter().enumerate() {
            let expected = round_cents(item.quantity * item.rate);
            if !approx_eq(expected, item.amount) {
                violations.push(TotalsViolation::ItemAmount {
                    index,
                    expected,
                    actual: item.amount,
                });
            }
        }

        let expected_subtotal = self.items_subtotal();
        if !approx_eq(expected_subtotal, self.subtotal) {
            violations.push(TotalsViolation::Subtotal {
                expected: expected_subtotal,
                actual: self.subtotal,
            });
        }

        let expected_total = self.subtotal + self.tax;
        if !approx_eq(expected_total, self.total) {
            violations.push(TotalsViolation::Total {
                expected: expected_total,
                actual: self.total,
            });
        }

        violations
    }

    pub fn totals_consistent(&self) -> bool {
        self.totals_violations().is_empty()
    }
}

/// A broken invoice arithmetic rule
#[derive(Debug, Clone, PartialEq)]
pub enum TotalsViolation {
    ItemAmount { index: usize, expected: f64, actual: f64 },
    Subtotal { expected: f64, actual: f64 },
    Total { expected: f64, actual: f64 },
}

impl fmt::Display for TotalsViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalsViolation::ItemAmount { index, expected, actual } => write!(
                f,
                "item {} amount is {:.2}, expected quantity x rate = {:.2}",
                index, actual, expected
            ),
            TotalsViolation::Subtotal { expected, actual } => write!(
                f,
                "subtotal is {:.2}, expected sum of items = {:.2}",
                actual, expected
            ),
            TotalsViolation::Total { expected, actual } => write!(
                f,
                "total is {:.2}, expected subtotal + tax = {:.2}",
                actual, expected
            ),
        }
    }
}

/// Builder for a not-yet-persisted invoice.
///
/// Item amounts, subtotal, tax and total are computed so the result always
/// satisfies the totals rules.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub number: String,
    pub date: String,
    pub due_date: String,
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub items: Vec<InvoiceItem>,
    /// Fraction of the subtotal charged as tax (0.1 = 10%)
    pub tax_rate: f64,
    pub notes: Option<String>,
}

impl InvoiceDraft {
    pub fn new(number: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            date: String::new(),
            due_date: String::new(),
            client_name: client_name.into(),
            client_email: String::new(),
            client_address: String::new(),
            items: Vec::new(),
            tax_rate: 0.0,
            notes: None,
        }
    }

    pub fn dated(mut self, date: impl Into<String>, due_date: impl Into<String>) -> Self {
        self.date = date.into();
        self.due_date = due_date.into();
        self
    }

    pub fn client_contact(mut self, email: impl Into<String>, address: impl Into<String>) -> Self {
        self.client_email = email.into();
        self.client_address = address.into();
        self
    }

    pub fn item(mut self, description: impl Into<String>, quantity: f64, rate: f64) -> Self {
        self.items.push(InvoiceItem::new(description, quantity, rate));
        self
    }

    pub fn tax_rate(mut self, tax_rate: f64) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Produce a draft-status invoice without an id
    pub fn build(self) -> Invoice {
        let subtotal = round_cents(self.items.iter().map(|item| item.amount).sum());
        let tax = round_cents(subtotal * self.tax_rate);

        Invoice {
            id: None,
            number: self.number,
            date: self.date,
            due_date: self.due_date,
            client_name: self.client_name,
            client_email: self.client_email,
            client_address: self.client_address,
            items: self.items,
            subtotal,
            tax,
            total: subtotal + tax,
            status: InvoiceStatus::Draft,
            notes: self.notes,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial invoice update sent with PUT
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InvoiceItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InvoicePatch {
    /// Patch changing only the status
    pub fn status(status: InvoiceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge every present field into `invoice`
    pub fn apply_to(&self, invoice: &mut Invoice) {
        if let Some(number) = &self.number {
            invoice.number = number.clone();
        }
        if let Some(date) = &self.date {
            invoice.date = date.clone();
        }
        if let Some(due_date) = &self.due_date {
            invoice.due_date = due_date.clone();
        }
        if let Some(client_name) = &self.client_name {
            invoice.client_name = client_name.clone();
        }
        if let Some(client_email) = &self.client_email {
            invoice.client_email = client_email.clone();
        }
        if let Some(client_address) = &self.client_address {
            invoice.client_address = client_address.clone();
        }
        if let Some(items) = &self.items {
            invoice.items = items.clone();
        }
        if let Some(subtotal) = self.subtotal {
            invoice.subtotal = subtotal;
        }
        if let Some(tax) = self.tax {
            invoice.tax = tax;
        }
        if let Some(total) = self.total {
            invoice.total = total;
        }
        if let Some(status) = self.status {
            invoice.status = status;
        }
        if let Some(notes) = &self.notes {
            invoice.notes = Some(notes.clone());
        }
    }
}

/// Status part of an invoice list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(InvoiceStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: InvoiceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Client-side invoice list filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceQuery {
    /// Case-insensitive substring matched against client name and number
    pub search: String,
    pub status: StatusFilter,
}

impl InvoiceQuery {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || invoice.client_name.to_lowercase().contains(&needle)
            || invoice.number.to_lowercase().contains(&needle);

        matches_search && self.status.matches(invoice.status)
    }

    /// Invoices passing the filter, in their original order
    pub fn apply<'a>(&self, invoices: &'a [Invoice]) -> Vec<&'a Invoice> {
        invoices.iter().filter(|invoice| self.matches(invoice)).collect()
    }
}

/// Document families the AI backend can extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionKind {
    Facture,
    Cheque,
    Kimbiale,
}

impl ExtractionKind {
    pub const ALL: [ExtractionKind; 3] = [
        ExtractionKind::Facture,
        ExtractionKind::Cheque,
        ExtractionKind::Kimbiale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionKind::Facture => "facture",
            ExtractionKind::Cheque => "cheque",
            ExtractionKind::Kimbiale => "kimbiale",
        }
    }

    /// Path of the AI endpoint handling this kind
    pub fn endpoint(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for ExtractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtractionKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facture" => Ok(ExtractionKind::Facture),
            "cheque" => Ok(ExtractionKind::Cheque),
            "kimbiale" => Ok(ExtractionKind::Kimbiale),
            _ => Err(ParseEnumError::new("processing type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Processing,
    Completed,
    Error,
}

/// Fields extracted from an invoice image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacturePayload {
    pub invoice_number: String,
    pub date: String,
    pub client_name: String,
    pub client_email: String,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Fields extracted from a cheque image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequePayload {
    pub check_number: String,
    pub date: String,
    pub payee: String,
    pub amount: f64,
    pub amount_in_words: String,
    pub bank_name: String,
    /// Masked account number
    pub account_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSpecifications {
    pub weight: String,
    pub dimensions: String,
    pub material: String,
}

/// Fields extracted from a Kimbiale part photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KimbialePayload {
    pub part_number: String,
    pub part_name: String,
    pub manufacturer: String,
    pub specifications: PartSpecifications,
    pub price: f64,
    pub availability: String,
}

/// Typed view of `ExtractedData::extracted_text`
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedPayload {
    Facture(FacturePayload),
    Cheque(ChequePayload),
    Kimbiale(KimbialePayload),
}

impl ExtractedPayload {
    pub fn kind(&self) -> ExtractionKind {
        match self {
            ExtractedPayload::Facture(_) => ExtractionKind::Facture,
            ExtractedPayload::Cheque(_) => ExtractionKind::Cheque,
            ExtractedPayload::Kimbiale(_) => ExtractionKind::Kimbiale,
        }
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            ExtractedPayload::Facture(payload) => serde_json::to_value(payload),
            ExtractedPayload::Cheque(payload) => serde_json::to_value(payload),
            ExtractedPayload::Kimbiale(payload) => serde_json::to_value(payload),
        }
    }
}

/// Result of an AI extraction, optionally persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    /// Assigned when the record is saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ExtractionKind,
    /// Reference to the uploaded image
    pub original_image: String,
    /// Raw payload; its schema is selected by `kind`
    pub extracted_text: serde_json::Value,
    /// Between 0 and 1
    pub confidence: f64,
    /// RFC 3339 timestamp
    pub processed_at: String,
    pub status: ExtractionStatus,
}

impl ExtractedData {
    /// Build a completed record whose kind always agrees with the payload
    pub fn from_payload(
        payload: &ExtractedPayload,
        original_image: impl Into<String>,
        confidence: f64,
        processed_at: impl Into<String>,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            id: None,
            kind: payload.kind(),
            original_image: original_image.into(),
            extracted_text: payload.to_value()?,
            confidence: confidence.clamp(0.0, 1.0),
            processed_at: processed_at.into(),
            status: ExtractionStatus::Completed,
        })
    }

    /// Decode `extracted_text` according to `kind`
    pub fn payload(&self) -> serde_json::Result<ExtractedPayload> {
        let raw = self.extracted_text.clone();
        match self.kind {
            ExtractionKind::Facture => serde_json::from_value(raw).map(ExtractedPayload::Facture),
            ExtractionKind::Cheque => serde_json::from_value(raw).map(ExtractedPayload::Cheque),
            ExtractionKind::Kimbiale => serde_json::from_value(raw).map(ExtractedPayload::Kimbiale),
        }
    }

    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// File name used when exporting the payload as JSON
    pub fn export_file_name(&self, timestamp_millis: i64) -> String {
        format!("extracted-{}-{}.json", self.kind, timestamp_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u32,
}

/// Aggregate snapshot computed by the CRUD backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_invoices: u32,
    pub total_revenue: f64,
    pub pending_invoices: u32,
    pub overdue_invoices: u32,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub invoices_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    #[default]
    Pending,
    Cashed,
    Cancelled,
}

impl ChequeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChequeStatus::Pending => "pending",
            ChequeStatus::Cashed => "cashed",
            ChequeStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ChequeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChequeStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ChequeStatus::Pending),
            "cashed" => Ok(ChequeStatus::Cashed),
            "cancelled" => Ok(ChequeStatus::Cancelled),
            _ => Err(ParseEnumError::new("cheque status", s)),
        }
    }
}

/// Cheque tracked locally by the cheques page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cheque {
    pub id: String,
    pub number: String,
    pub bank: String,
    pub amount: f64,
    /// Date written on the cheque (YYYY-MM-DD)
    pub date: String,
    pub client: String,
    pub status: ChequeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePreview {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub neutral: String,
}

/// Selectable colour theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub value: String,
    pub preview: ThemePreview,
}

impl Theme {
    fn new(name: &str, value: &str, colors: [&str; 4]) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            preview: ThemePreview {
                primary: colors[0].to_string(),
                secondary: colors[1].to_string(),
                accent: colors[2].to_string(),
                neutral: colors[3].to_string(),
            },
        }
    }

    /// All themes offered on the settings page
    pub fn catalogue() -> Vec<Theme> {
        vec![
            Theme::new("Light", "light", ["#570df8", "#f000b8", "#37cdbe", "#3d4451"]),
            Theme::new("Dark", "dark", ["#661ae6", "#d926aa", "#1fb2a5", "#191d24"]),
            Theme::new("Cupcake", "cupcake", ["#65c3c8", "#ef9fbc", "#eeaf3a", "#291334"]),
            Theme::new("Synthwave", "synthwave", ["#e779c1", "#58c7f3", "#f3cc30", "#20134e"]),
            Theme::new("Cyberpunk", "cyberpunk", ["#ff7598", "#75d1f0", "#c7f59b", "#423aa0"]),
            Theme::new("Corporate", "corporate", ["#4b6bfb", "#7b92b2", "#67cba0", "#181a2a"]),
            Theme::new("Luxury", "luxury", ["#ffffff", "#152747", "#513448", "#0f0f0f"]),
            Theme::new("Dracula", "dracula", ["#ff79c6", "#bd93f9", "#ffb86c", "#414558"]),
        ]
    }

    pub fn is_known(value: &str) -> bool {
        Self::catalogue().iter().any(|theme| theme.value == value)
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOTALS_TOLERANCE
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
