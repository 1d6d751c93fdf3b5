//! # AI Processing Controller
//!
//! Drives the upload -> extraction -> save flow of the AI page.
//!
//! Only one extraction runs at a time. A finished extraction becomes the
//! current result; it enters the history only once the user saves it.

use log::{error, info, warn};
use shared::{ExtractedData, ExtractionKind};

use crate::context::AppContext;
use crate::controllers::state::{Notice, Notices, RequestSequencer, RequestTicket};
use crate::services::api::{parse_kind, ApiError, DataOrigin, Served};
use crate::services::date_utils::now_millis;
use crate::services::gateway::Gateway;
use crate::services::upload::ImageUpload;

/// JSON rendering of an extraction, ready to be written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct JsonExport {
    pub file_name: String,
    pub contents: String,
}

/// Clears the in-flight flag when dropped, including when the request
/// future is abandoned before it completes
struct ProcessingReset<'a>(&'a mut bool);

impl Drop for ProcessingReset<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct AiProcessingController {
    gateway: Gateway,
    current: Option<ExtractedData>,
    history: Vec<ExtractedData>,
    is_processing: bool,
    offline: bool,
    sequencer: RequestSequencer,
    notices: Notices,
}

impl AiProcessingController {
    pub fn new(context: &AppContext) -> Self {
        Self {
            gateway: context.gateway().clone(),
            current: None,
            history: Vec::new(),
            is_processing: false,
            offline: false,
            sequencer: RequestSequencer::new(),
            notices: Notices::default(),
        }
    }

    /// Start an extraction of `kind`. Returns `None` when the kind is unknown
    /// or another extraction is still running.
    pub fn begin_processing(&mut self, kind: &str) -> Option<(RequestTicket, ExtractionKind)> {
        let kind = match parse_kind(kind) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Refusing to process image: {}", e);
                self.notices.error(e.to_string());
                return None;
            }
        };

        if self.is_processing {
            warn!("An extraction is already running, ignoring new {} request", kind);
            return None;
        }

        self.is_processing = true;
        self.current = None;
        Some((self.sequencer.issue(), kind))
    }

    pub fn complete_processing(&mut self, ticket: RequestTicket, result: Result<Served<ExtractedData>, ApiError>) -> bool {
        if !self.sequencer.accept(ticket, "extraction") {
            return false;
        }
        self.is_processing = false;

        match result.and_then(Served::into_data) {
            Ok((data, origin)) => {
                info!(
                    "Extracted {} data from {} ({}% confidence)",
                    data.kind,
                    data.original_image,
                    data.confidence_percent()
                );
                self.offline = origin == DataOrigin::Fixture;
                self.current = Some(data);
                self.notices.success("Image processed successfully");
            }
            Err(e) => {
                error!("Failed to process image: {}", e);
                self.notices.error(format!("Failed to process image: {}", e));
            }
        }
        true
    }

    /// Upload `upload` for extraction as `kind`
    pub async fn process(&mut self, upload: &ImageUpload, kind: &str) -> bool {
        let Some((ticket, kind)) = self.begin_processing(kind) else {
            return false;
        };
        let result = {
            let _reset = ProcessingReset(&mut self.is_processing);
            self.gateway.process_image(upload, kind).await
        };
        self.complete_processing(ticket, result);
        self.current.is_some()
    }

    /// Persist the current result and put it at the top of the history
    pub async fn save(&mut self) -> bool {
        let Some(current) = self.current.as_ref() else {
            self.notices.error("There is no extracted data to save");
            return false;
        };

        let result = self.gateway.save_extracted(current).await.and_then(Served::into_data);
        match result {
            Ok((saved, origin)) => {
                info!("Saved {} extraction with id {:?}", saved.kind, saved.id);
                self.offline = origin == DataOrigin::Fixture;
                self.history.insert(0, saved);
                self.notices.success("Data saved successfully");
                true
            }
            Err(e) => {
                error!("Failed to save extracted data: {}", e);
                self.notices.error(format!("Failed to save data: {}", e));
                false
            }
        }
    }

    pub fn export_json(&mut self) -> Option<JsonExport> {
        self.export_json_at(now_millis())
    }

    /// Pretty JSON of the current payload, named after its kind and
    /// `timestamp_millis`
    pub fn export_json_at(&mut self, timestamp_millis: i64) -> Option<JsonExport> {
        let current = self.current.as_ref()?;
        match serde_json::to_string_pretty(&current.extracted_text) {
            Ok(contents) => Some(JsonExport {
                file_name: current.export_file_name(timestamp_millis),
                contents,
            }),
            Err(e) => {
                error!("Failed to export extracted data: {}", e);
                self.notices.error(format!("Failed to export data: {}", e));
                None
            }
        }
    }

    pub fn current(&self) -> Option<&ExtractedData> {
        self.current.as_ref()
    }

    /// Saved extractions, most recent first
    pub fn history(&self) -> &[ExtractedData] {
        &self.history
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn confidence_percent(&self) -> Option<u32> {
        self.current.as_ref().map(ExtractedData::confidence_percent)
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}
