//! # Controller State
//!
//! Pieces every page controller shares:
//!
//! - `LoadState` - single-shot `Idle -> Loading -> Ready | Failed` machine
//! - `RequestSequencer` - tags requests so late, superseded answers are dropped
//! - `Notices` - transient user feedback drained by the presentation layer

use log::debug;

/// Progress of a page's initial fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Sequence number attached to an outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets; only the most recent one is
/// considered current.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Whether a completion carrying `ticket` should be applied
    pub fn accept(&self, ticket: RequestTicket, operation: &str) -> bool {
        let current = self.is_current(ticket);
        if !current {
            debug!(
                "Discarding stale {} response (ticket {}, latest {})",
                operation, ticket.0, self.latest
            );
        }
        current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the user (a toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Queue of notices waiting to be displayed
#[derive(Debug, Default)]
pub struct Notices {
    pending: Vec<Notice>,
}

impl Notices {
    pub fn success(&mut self, message: impl Into<String>) {
        self.pending.push(Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.pending.push(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        });
    }

    pub fn peek(&self) -> &[Notice] {
        &self.pending
    }

    /// Hand every pending notice to the caller
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let mut sequencer = RequestSequencer::new();
        let first = sequencer.issue();
        assert!(sequencer.is_current(first));

        let second = sequencer.issue();
        assert!(second > first);
        assert!(!sequencer.accept(first, "test"));
        assert!(sequencer.accept(second, "test"));
        assert_eq!(second.sequence(), 2);
    }

    #[test]
    fn test_notices_drain() {
        let mut notices = Notices::default();
        notices.success("Saved");
        notices.error("Failed");
        assert_eq!(notices.peek().len(), 2);

        let taken = notices.take();
        assert_eq!(taken[0].level, NoticeLevel::Success);
        assert_eq!(taken[1].message, "Failed");
        assert!(notices.take().is_empty());
    }

    #[test]
    fn test_load_state_helpers() {
        assert!(LoadState::Loading.is_loading());
        assert!(LoadState::Ready.is_ready());
        assert_eq!(LoadState::Failed("down".to_string()).error(), Some("down"));
        assert_eq!(LoadState::default(), LoadState::Idle);
    }
}
