use anyhow::{Context, Result};

use super::{ChatSession, Submission, UiEvent};
use crate::models::{ChatReply, ChatRequest};

/// Talks to the chat endpoint on behalf of a [`ChatSession`].
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ChatClient {
    /// `base_url` is the server root, e.g. "http://127.0.0.1:3000".
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }

    /// Send the conversation and return the assistant's reply.
    pub async fn send(&self, req: &ChatRequest) -> Result<String> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(req)
            .send()
            .await
            .context("Failed to reach chat server")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Chat server returned {status}: {body}");
        }

        let reply: ChatReply = resp
            .json()
            .await
            .context("Failed to parse chat reply")?;
        Ok(reply.message)
    }

    /// Run one submission through `session`: submit, await the server, then
    /// apply the reply or the failure.
    pub async fn submit(&self, session: ChatSession) -> ChatSession {
        let (session, outbound) = session.update(UiEvent::Submit);
        let Some(Submission { token, request }) = outbound else {
            return session;
        };

        let event = match self.send(&request).await {
            Ok(text) => UiEvent::Reply { token, text },
            Err(e) => {
                tracing::warn!("Chat submission failed: {e:#}");
                UiEvent::Failed { token }
            }
        };
        session.update(event).0
    }
}
