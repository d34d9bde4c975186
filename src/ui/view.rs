use serde::Serialize;

use super::format::{format_reply, Block};
use super::ChatSession;
use crate::models::Role;

pub const TITLE: &str = "Rate My Professor Chat";

/// Everything the page needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub title: &'static str,
    pub transcript: Vec<Entry>,
    pub input: String,
    pub input_enabled: bool,
    pub send_enabled: bool,
    pub reset_enabled: bool,
    /// Show a spinner in place of the send label.
    pub busy: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub speaker: &'static str,
    pub blocks: Vec<Block>,
}

pub fn render(session: &ChatSession) -> View {
    View {
        title: TITLE,
        transcript: session
            .messages
            .iter()
            .map(|m| match m.role {
                Role::User => Entry {
                    speaker: "You",
                    blocks: vec![Block::Paragraph(m.content.clone())],
                },
                Role::Assistant | Role::System => Entry {
                    speaker: "Assistant",
                    blocks: format_reply(&m.content),
                },
            })
            .collect(),
        input: session.input.clone(),
        input_enabled: !session.loading(),
        send_enabled: session.can_submit(),
        reset_enabled: !session.loading(),
        busy: session.loading(),
        error: session.error.clone(),
    }
}
