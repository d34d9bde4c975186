//! Chat UI model.
//!
//! The conversation lives entirely on the client. [`ChatSession`] is the
//! state, [`ChatSession::update`] applies a [`UiEvent`] and may hand back a
//! [`Submission`] to send, and [`view::render`] turns the state into a
//! [`view::View`].

pub mod client;
pub mod format;
pub mod view;

use crate::models::{ChatMessage, ChatRequest, Role};

/// Shown when a submission fails for any reason.
pub const SUBMIT_ERROR: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// Token of the submission awaiting an answer.
    pub pending: Option<u64>,
    /// Tokens issued so far. Never rewinds, so a token is never reused.
    pub issued: u64,
    pub error: Option<String>,
}

/// A request started by [`UiEvent::Submit`]. Its answer must come back
/// tagged with `token`.
#[derive(Debug, Clone)]
pub struct Submission {
    pub token: u64,
    pub request: ChatRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The input field changed.
    Input(String),
    Submit,
    /// The server answered submission `token`.
    Reply { token: u64, text: String },
    /// Submission `token` failed.
    Failed { token: u64 },
    /// Start a new chat.
    Reset,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a submit would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.loading() && !self.input.is_empty()
    }

    /// Apply `event`. Returns the submission to send when the event starts one.
    pub fn update(mut self, event: UiEvent) -> (Self, Option<Submission>) {
        let outbound = match event {
            UiEvent::Input(text) => {
                if !self.loading() {
                    self.input = text;
                }
                None
            }
            UiEvent::Submit => {
                if !self.can_submit() {
                    return (self, None);
                }
                let token = self.issued;
                self.issued += 1;
                self.messages.push(ChatMessage::user(self.input.clone()));
                self.pending = Some(token);
                self.error = None;
                Some(Submission {
                    token,
                    request: ChatRequest {
                        data: self.messages.clone(),
                    },
                })
            }
            UiEvent::Reply { token, text } => {
                if self.pending == Some(token) {
                    self.messages.push(ChatMessage::assistant(text));
                    self.input.clear();
                    self.pending = None;
                }
                None
            }
            UiEvent::Failed { token } => {
                if self.pending == Some(token) {
                    // Roll back the unanswered turn; the input keeps its text for a retry.
                    if self.messages.last().is_some_and(|m| m.role == Role::User) {
                        self.messages.pop();
                    }
                    self.pending = None;
                    self.error = Some(SUBMIT_ERROR.to_string());
                }
                None
            }
            UiEvent::Reset => {
                self.messages.clear();
                self.input.clear();
                self.pending = None;
                self.error = None;
                None
            }
        };
        (self, outbound)
    }
}
