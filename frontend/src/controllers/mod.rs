//! Page controllers: one per dashboard page, each owning the state the
//! page displays and turning user intents into gateway calls.

pub mod ai_processing;
pub mod cheques;
pub mod dashboard;
pub mod invoices;
pub mod settings;
pub mod state;

pub use ai_processing::{AiProcessingController, JsonExport};
pub use cheques::{ChequeForm, ChequeFormError, ChequeSummary, ChequesController};
pub use dashboard::DashboardController;
pub use invoices::InvoicesController;
pub use settings::SettingsController;
pub use state::{LoadState, Notice, NoticeLevel, RequestSequencer, RequestTicket};
