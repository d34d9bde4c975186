//! Per-request orchestration: embed the newest question, search the review
//! index, compose the prompt and ask the model.

use std::fmt;
use std::sync::Arc;

use crate::error::{EmbeddingError, PipelineError};
use crate::llm::completion::ChatCompleter;
use crate::llm::embeddings::{embed_single, Embedder};
use crate::models::{ChatMessage, Role};
use crate::prompt::{self, SYSTEM_PROMPT};
use crate::search::index::VectorIndex;

/// Number of reviews retrieved per question.
pub const TOP_K: usize = 3;

/// Where a request is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Embedding,
    Searching,
    Composing,
    Completing,
    Responded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Received => "received",
            Stage::Embedding => "embedding",
            Stage::Searching => "searching",
            Stage::Composing => "composing",
            Stage::Completing => "completing",
            Stage::Responded => "responded",
            Stage::Failed => "failed",
        })
    }
}

/// The retrieval-augmented chat pipeline. Holds no per-request state.
pub struct Pipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    completer: Arc<dyn ChatCompleter>,
}

impl Pipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        completer: Arc<dyn ChatCompleter>,
    ) -> Self {
        Self {
            embedder,
            index,
            completer,
        }
    }

    /// Answer the newest user turn of `history`.
    pub async fn run(&self, history: &[ChatMessage]) -> Result<String, PipelineError> {
        tracing::debug!(stage = %Stage::Received, turns = history.len());

        let result = self.run_stages(history).await;
        match &result {
            Ok(reply) => {
                tracing::info!(stage = %Stage::Responded, reply_len = reply.len());
            }
            Err(e) if e.is_upstream() => {
                tracing::error!(stage = %Stage::Failed, kind = e.kind(), "{e}");
            }
            Err(e) => {
                tracing::warn!(stage = %Stage::Failed, kind = e.kind(), "{e}");
            }
        }
        result
    }

    async fn run_stages(&self, history: &[ChatMessage]) -> Result<String, PipelineError> {
        let (latest, prior) = split_latest(history)?;

        // ── Step 1: Embed the question ───────────────────────
        tracing::debug!(stage = %Stage::Embedding, "{}", preview(&latest.content));
        let vector = embed_single(self.embedder.as_ref(), &latest.content).await?;
        if vector.is_empty() {
            return Err(EmbeddingError::Malformed("empty vector".into()).into());
        }
        tracing::info!(stage = %Stage::Embedding, dim = vector.len(), "Question embedded");

        // ── Step 2: Similarity search ────────────────────────
        let matches = self.index.query(&vector, TOP_K).await?;
        tracing::info!(stage = %Stage::Searching, matches = matches.len(), "Index queried");
        for m in &matches {
            tracing::debug!(id = %m.id, score = ?m.score, "match");
        }

        // ── Step 3: Build prompt ─────────────────────────────
        let messages = prompt::compose(SYSTEM_PROMPT, prior, latest, &matches);
        tracing::debug!(stage = %Stage::Composing, messages = messages.len());

        // ── Step 4: Ask the model ────────────────────────────
        let reply = self.completer.complete(&messages).await?;
        tracing::debug!(stage = %Stage::Completing, "{}", preview(&reply));

        Ok(reply)
    }
}

/// Split off the newest turn, which must come from the user.
fn split_latest(history: &[ChatMessage]) -> Result<(&ChatMessage, &[ChatMessage]), PipelineError> {
    let (latest, prior) = history
        .split_last()
        .ok_or_else(|| PipelineError::InvalidRequest("conversation is empty".into()))?;

    if latest.role != Role::User {
        return Err(PipelineError::InvalidRequest(format!(
            "last message must come from the user, got {}",
            latest.role
        )));
    }

    Ok((latest, prior))
}

fn preview(text: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    match text.char_indices().nth(MAX_PREVIEW) {
        Some((i, _)) => format!("{}…", &text[..i]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_latest() {
        let history = vec![
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
        ];
        let (latest, prior) = split_latest(&history).unwrap();
        assert_eq!(latest.content, "q2");
        assert_eq!(prior.len(), 2);
    }

    #[test]
    fn test_split_latest_empty() {
        let err = split_latest(&[]).unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
    }

    #[test]
    fn test_split_latest_requires_user() {
        let history = vec![ChatMessage::user("q"), ChatMessage::assistant("a")];
        let err = split_latest(&history).unwrap_err();
        assert!(err.to_string().contains("got assistant"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let p = preview(&long);
        assert_eq!(p.chars().count(), 121);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Searching.to_string(), "searching");
    }
}
