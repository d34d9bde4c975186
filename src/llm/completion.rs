use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CompletionConfig;
use crate::error::CompletionError;
use crate::models::ChatMessage;

/// Generates a reply for a message sequence.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Return the primary completion choice's text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Non-streaming client for `POST {base}/v1/chat/completions`.
pub struct OpenAiCompleter {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompleter {
    pub fn new(client: reqwest::Client, config: &CompletionConfig) -> Self {
        Self {
            client,
            url: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl ChatCompleter for OpenAiCompleter {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let req = CompletionRequest {
            model: &self.model,
            messages,
        };

        let mut builder = self.client.post(&self.url).json(&req);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let resp = builder.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Upstream { status, body });
        }

        let body = resp.text().await?;
        parse_completion(&body)
    }
}

fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::NoChoices)?;

    choice
        .message
        .content
        .ok_or_else(|| CompletionError::Malformed("first choice has no content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{"choices":[
            {"message":{"role":"assistant","content":"first"}},
            {"message":{"role":"assistant","content":"second"}}
        ]}"#;
        assert_eq!(parse_completion(body).unwrap(), "first");
    }

    #[test]
    fn test_parse_empty_choices() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, CompletionError::NoChoices));
    }

    #[test]
    fn test_parse_error_envelope_has_no_choices() {
        // Some gateways answer 200 with only an error object.
        let body = r#"{"error":{"message":"Rate limit exceeded","code":429}}"#;
        assert!(matches!(
            parse_completion(body).unwrap_err(),
            CompletionError::NoChoices
        ));
    }

    #[test]
    fn test_parse_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(matches!(
            parse_completion(body).unwrap_err(),
            CompletionError::Malformed(_)
        ));
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(
            parse_completion("<html>bad gateway</html>").unwrap_err(),
            CompletionError::Malformed(_)
        ));
    }

    #[test]
    fn test_request_serializes_roles() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let req = CompletionRequest {
            model: "m",
            messages: &messages,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }
}
