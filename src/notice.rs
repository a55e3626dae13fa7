//! Transient notices: the short status line under the remote.
//!
//! DESIGN
//! ======
//! One slot. Posting replaces whatever is showing and restarts the display
//! window. Expiry is evaluated lazily against `tokio::time::Instant`, so the
//! event loop only needs to wake at `deadline()` to repaint, and tests can
//! drive it with a paused clock.

use std::time::Duration;

use tokio::time::Instant;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    text: String,
    posted_at: Instant,
}

/// Holds at most one live notice.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    slot: Option<Notice>,
}

impl NoticeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text`, replacing any current notice and restarting the timer.
    pub fn post(&mut self, text: impl Into<String>) {
        self.slot = Some(Notice { text: text.into(), posted_at: Instant::now() });
    }

    /// The visible notice, if it has not expired.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.slot
            .as_ref()
            .filter(|n| n.posted_at.elapsed() < NOTICE_TTL)
            .map(|n| n.text.as_str())
    }

    /// When the visible notice disappears.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|n| n.posted_at + NOTICE_TTL)
    }

    /// Drop an expired notice. Returns `true` if one was removed.
    pub fn clear_expired(&mut self) -> bool {
        if self.slot.is_some() && self.current().is_none() {
            self.slot = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;
