//! Session: everything the remote's front end keeps between events.
//!
//! DESIGN
//! ======
//! `Session` owns the single `ApplianceState` and replaces it wholesale on
//! every transition. Around it sit the presentation concerns: the notice
//! line, the protocol-selection view, the AI input text and the `thinking`
//! flag.
//!
//! The AI flow is split in two so the event loop can keep handling input
//! while the request is in flight:
//!
//! ```text
//! Idle --begin_assist--> Requesting --complete_assist(Some)--> Applied --> Idle
//!                                   --complete_assist(None)--> Failed  --> Idle
//! ```
//!
//! `complete_assist` applies the suggestion to whatever the state is *then*,
//! not to the snapshot that was sent.

use tracing::{debug, info};

use crate::notice::NoticeBoard;
use crate::services::recommend::{Recommender, Suggestion};
use crate::state::{ApplianceState, IrProtocol};
use crate::transition::{self, Transition};

pub const ASSIST_FAILED_NOTICE: &str = "AI 暂时开小差了";

/// Phase of the AI-assist flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistPhase {
    Idle,
    Requesting,
}

/// What `begin_assist` hands to the caller to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistRequest {
    pub input: String,
    pub snapshot: ApplianceState,
}

/// How an AI request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistOutcome {
    Applied(Suggestion),
    Failed,
}

#[derive(Debug, Default)]
pub struct Session {
    state: ApplianceState,
    notices: NoticeBoard,
    ai_input: String,
    thinking: bool,
    settings_open: bool,
}

impl Session {
    #[must_use]
    pub fn new(state: ApplianceState) -> Self {
        Self { state, ..Self::default() }
    }

    #[must_use]
    pub fn state(&self) -> &ApplianceState {
        &self.state
    }

    #[must_use]
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    /// Run one transition and post its notice, if any.
    pub fn dispatch(&mut self, transition: Transition) {
        let applied = transition::apply(self.state, transition);
        if applied.state != self.state {
            debug!(?transition, "state updated");
        }
        self.state = applied.state;
        if let Some(notice) = applied.notice {
            self.notices.post(notice);
        }
    }

    // -------------------------------------------------------------------------
    // protocol-selection view
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    /// Pick a protocol from the selection view; closes the view.
    pub fn select_protocol(&mut self, protocol: IrProtocol) {
        self.dispatch(Transition::SetProtocol(protocol));
        self.settings_open = false;
    }

    // -------------------------------------------------------------------------
    // AI assist
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn ai_input(&self) -> &str {
        &self.ai_input
    }

    pub fn set_ai_input(&mut self, text: impl Into<String>) {
        self.ai_input = text.into();
    }

    #[must_use]
    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    #[must_use]
    pub fn assist_phase(&self) -> AssistPhase {
        if self.thinking { AssistPhase::Requesting } else { AssistPhase::Idle }
    }

    /// Enter `Requesting` if idle and the input is not blank.
    ///
    /// Returns `None` (and changes nothing) when a request is already in
    /// flight or the input is blank.
    pub fn begin_assist(&mut self) -> Option<AssistRequest> {
        if self.thinking {
            debug!("assist: request already in flight");
            return None;
        }
        let input = self.ai_input.trim();
        if input.is_empty() {
            return None;
        }
        self.thinking = true;
        info!(input_len = input.len(), "assist: requesting");
        Some(AssistRequest { input: input.to_string(), snapshot: self.state })
    }

    /// Leave `Requesting` with the recommender's result.
    pub fn complete_assist(&mut self, result: Option<Suggestion>) -> AssistOutcome {
        self.thinking = false;
        match result {
            Some(suggestion) => {
                self.dispatch(Transition::ApplyRecommendation {
                    mode: suggestion.recommended_mode,
                    temperature: suggestion.temperature(),
                });
                self.notices.post(format!("AI建议: {}", suggestion.explanation));
                self.ai_input.clear();
                info!(mode = %suggestion.recommended_mode, temperature = self.state.temperature, "assist: applied");
                AssistOutcome::Applied(suggestion)
            }
            None => {
                self.notices.post(ASSIST_FAILED_NOTICE);
                info!("assist: failed");
                AssistOutcome::Failed
            }
        }
    }

    /// Whole AI flow in one call, for callers with nothing else to do meanwhile.
    pub async fn assist(&mut self, recommender: &dyn Recommender) -> Option<AssistOutcome> {
        let request = self.begin_assist()?;
        let result = recommender.recommend(&request.input, &request.snapshot).await;
        Some(self.complete_assist(result))
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
