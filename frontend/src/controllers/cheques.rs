//! # Cheques Controller
//!
//! Local cheque register. Nothing here talks to a backend: the list starts
//! from two seeded records and lives as long as the controller.

use log::{info, warn};
use shared::{Cheque, ChequeStatus};
use thiserror::Error;

use crate::controllers::state::{Notice, Notices};
use crate::services::date_utils::parse_iso_date;

/// Validation failures of the cheque form
#[derive(Debug, Error, PartialEq)]
pub enum ChequeFormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Amount must be a positive number, got '{0}'")]
    InvalidAmount(String),

    #[error("Date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),
}

/// Cheque add/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChequeForm {
    pub number: String,
    pub bank: String,
    /// Amount input (as string for validation)
    pub amount_text: String,
    pub date: String,
    pub client: String,
    pub status: ChequeStatus,
}

impl ChequeForm {
    fn from_cheque(cheque: &Cheque) -> Self {
        Self {
            number: cheque.number.clone(),
            bank: cheque.bank.clone(),
            amount_text: cheque.amount.to_string(),
            date: cheque.date.clone(),
            client: cheque.client.clone(),
            status: cheque.status,
        }
    }

    /// Check every field, returning the parsed amount
    pub fn validate(&self) -> Result<f64, ChequeFormError> {
        let required = [
            ("Number", &self.number),
            ("Bank", &self.bank),
            ("Amount", &self.amount_text),
            ("Date", &self.date),
            ("Client", &self.client),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ChequeFormError::Missing(*field));
        }

        let amount = self
            .amount_text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or_else(|| ChequeFormError::InvalidAmount(self.amount_text.clone()))?;

        if parse_iso_date(&self.date).is_none() {
            return Err(ChequeFormError::InvalidDate(self.date.clone()));
        }

        Ok(amount)
    }
}

/// Per-status counts and the total amount of the register
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChequeSummary {
    pub pending: usize,
    pub cashed: usize,
    pub cancelled: usize,
    pub total_amount: f64,
}

pub struct ChequesController {
    cheques: Vec<Cheque>,
    form: ChequeForm,
    form_open: bool,
    form_error: Option<String>,
    editing: Option<String>,
    viewing: Option<String>,
    notices: Notices,
}

impl Default for ChequesController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChequesController {
    pub fn new() -> Self {
        Self::with_cheques(seed_cheques())
    }

    pub fn with_cheques(cheques: Vec<Cheque>) -> Self {
        Self {
            cheques,
            form: ChequeForm::default(),
            form_open: false,
            form_error: None,
            editing: None,
            viewing: None,
            notices: Notices::default(),
        }
    }

    pub fn cheques(&self) -> &[Cheque] {
        &self.cheques
    }

    /// Open an empty form for a new cheque
    pub fn open_create(&mut self) {
        self.form = ChequeForm::default();
        self.form_error = None;
        self.editing = None;
        self.form_open = true;
    }

    /// Open the form pre-filled with an existing cheque
    pub fn open_edit(&mut self, id: &str) -> bool {
        let Some(cheque) = self.cheques.iter().find(|cheque| cheque.id == id) else {
            warn!("Cannot edit unknown cheque {}", id);
            return false;
        };
        self.form = ChequeForm::from_cheque(cheque);
        self.form_error = None;
        self.editing = Some(id.to_string());
        self.form_open = true;
        true
    }

    pub fn form(&self) -> &ChequeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ChequeForm {
        &mut self.form
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
        self.editing = None;
        self.form_error = None;
    }

    /// Validate the form and either update the edited cheque or append a
    /// new one. The form stays open with an error message if invalid.
    pub fn submit(&mut self) -> bool {
        let amount = match self.form.validate() {
            Ok(amount) => amount,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return false;
            }
        };

        match self.editing.clone() {
            Some(id) => {
                let Some(cheque) = self.cheques.iter_mut().find(|cheque| cheque.id == id) else {
                    self.form_error = Some(format!("Cheque {} no longer exists", id));
                    return false;
                };
                cheque.number = self.form.number.trim().to_string();
                cheque.bank = self.form.bank.trim().to_string();
                cheque.amount = amount;
                cheque.date = self.form.date.trim().to_string();
                cheque.client = self.form.client.trim().to_string();
                cheque.status = self.form.status;
                info!("Updated cheque {}", id);
                self.notices.success("Cheque updated");
            }
            None => {
                let cheque = Cheque {
                    id: (self.cheques.len() + 1).to_string(),
                    number: self.form.number.trim().to_string(),
                    bank: self.form.bank.trim().to_string(),
                    amount,
                    date: self.form.date.trim().to_string(),
                    client: self.form.client.trim().to_string(),
                    status: self.form.status,
                };
                info!("Added cheque {} ({})", cheque.id, cheque.number);
                self.cheques.push(cheque);
                self.notices.success("Cheque added");
            }
        }

        self.close_form();
        true
    }

    /// Open the details view for a cheque
    pub fn view(&mut self, id: &str) -> Option<&Cheque> {
        if self.cheques.iter().any(|cheque| cheque.id == id) {
            self.viewing = Some(id.to_string());
        }
        self.viewed()
    }

    pub fn viewed(&self) -> Option<&Cheque> {
        let id = self.viewing.as_deref()?;
        self.cheques.iter().find(|cheque| cheque.id == id)
    }

    pub fn close_details(&mut self) {
        self.viewing = None;
    }

    pub fn summary(&self) -> ChequeSummary {
        self.cheques.iter().fold(ChequeSummary::default(), |mut summary, cheque| {
            match cheque.status {
                ChequeStatus::Pending => summary.pending += 1,
                ChequeStatus::Cashed => summary.cashed += 1,
                ChequeStatus::Cancelled => summary.cancelled += 1,
            }
            summary.total_amount += cheque.amount;
            summary
        })
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }
}

fn seed_cheques() -> Vec<Cheque> {
    vec![
        Cheque {
            id: "1".to_string(),
            number: "CHQ-001".to_string(),
            bank: "Banque X".to_string(),
            amount: 1500.0,
            date: "2025-08-09".to_string(),
            client: "John Doe".to_string(),
            status: ChequeStatus::Pending,
        },
        Cheque {
            id: "2".to_string(),
            number: "CHQ-002".to_string(),
            bank: "Banque Y".to_string(),
            amount: 3000.0,
            date: "2025-08-01".to_string(),
            client: "Jane Smith".to_string(),
            status: ChequeStatus::Cashed,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ChequeForm {
        ChequeForm {
            number: "CHQ-003".to_string(),
            bank: "Banque Z".to_string(),
            amount_text: "250.50".to_string(),
            date: "2025-09-01".to_string(),
            client: "Acme Corp".to_string(),
            status: ChequeStatus::Pending,
        }
    }

    #[test]
    fn test_seeded_register() {
        let controller = ChequesController::new();
        assert_eq!(controller.cheques().len(), 2);

        let summary = controller.summary();
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.cashed, 1);
        assert_eq!(summary.cancelled, 0);
        assert_eq!(summary.total_amount, 4500.0);
    }

    #[test]
    fn test_form_validation() {
        assert_eq!(filled_form().validate(), Ok(250.5));

        let mut form = filled_form();
        form.bank = "  ".to_string();
        assert_eq!(form.validate(), Err(ChequeFormError::Missing("Bank")));

        let mut form = filled_form();
        form.amount_text = "-5".to_string();
        assert!(matches!(form.validate(), Err(ChequeFormError::InvalidAmount(_))));

        let mut form = filled_form();
        form.amount_text = "abc".to_string();
        assert!(matches!(form.validate(), Err(ChequeFormError::InvalidAmount(_))));

        let mut form = filled_form();
        form.date = "09/01/2025".to_string();
        assert!(matches!(form.validate(), Err(ChequeFormError::InvalidDate(_))));
    }

    #[test]
    fn test_create_appends_with_next_id() {
        let mut controller = ChequesController::new();
        controller.open_create();
        *controller.form_mut() = filled_form();

        assert!(controller.submit());
        assert!(!controller.is_form_open());

        let added = &controller.cheques()[2];
        assert_eq!(added.id, "3");
        assert_eq!(added.amount, 250.5);
        assert_eq!(controller.take_notices()[0].message, "Cheque added");
    }

    #[test]
    fn test_edit_replaces_fields() {
        let mut controller = ChequesController::new();
        assert!(controller.open_edit("1"));
        assert!(controller.is_editing());
        assert_eq!(controller.form().number, "CHQ-001");

        controller.form_mut().status = ChequeStatus::Cashed;
        controller.form_mut().amount_text = "1750".to_string();
        assert!(controller.submit());

        assert_eq!(controller.cheques().len(), 2);
        assert_eq!(controller.cheques()[0].status, ChequeStatus::Cashed);
        assert_eq!(controller.cheques()[0].amount, 1750.0);
        assert_eq!(controller.summary().cashed, 2);
    }

    #[test]
    fn test_invalid_submit_keeps_form_open() {
        let mut controller = ChequesController::new();
        controller.open_create();
        controller.form_mut().number = "CHQ-009".to_string();

        assert!(!controller.submit());
        assert!(controller.is_form_open());
        assert_eq!(controller.form_error(), Some("Bank is required"));
        assert_eq!(controller.cheques().len(), 2);
    }

    #[test]
    fn test_details_view() {
        let mut controller = ChequesController::new();
        assert_eq!(controller.view("2").map(|cheque| cheque.bank.as_str()), Some("Banque Y"));
        assert!(controller.viewed().is_some());

        controller.close_details();
        assert!(controller.viewed().is_none());
        assert!(controller.view("7").is_none());
        assert!(!controller.open_edit("7"));
    }
}
