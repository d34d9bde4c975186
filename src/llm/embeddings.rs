use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::EmbeddingConfig;
use crate::error::EmbeddingError;

/// Turns text into embedding vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed every input, returning one vector per input in the same order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Generate embedding for a single text.
pub async fn embed_single(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>, EmbeddingError> {
    let results = embedder.embed(&[text.to_string()]).await?;
    results
        .into_iter()
        .next()
        .ok_or_else(|| EmbeddingError::Malformed("no embedding returned".into()))
}

// ─── Hosted feature-extraction ───────────────────────────

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

/// Embedder backed by a hosted feature-extraction pipeline
/// (`POST {base}/pipeline/feature-extraction/{model}`).
pub struct FeatureExtractionEmbedder {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl FeatureExtractionEmbedder {
    pub fn new(client: reqwest::Client, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            url: format!(
                "{}/pipeline/feature-extraction/{}",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl Embedder for FeatureExtractionEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut req = self
            .client
            .post(&self.url)
            .json(&FeatureExtractionRequest { inputs: texts });
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::Upstream { status, body });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(format!("response is not JSON: {e}")))?;

        parse_embeddings(body, texts.len())
    }
}

/// Validate the feature-extraction payload: an array of `expected` numeric
/// vectors sharing one dimensionality.
fn parse_embeddings(body: Value, expected: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if !body.is_array() {
        return Err(EmbeddingError::Malformed(format!(
            "expected an array, got {}",
            json_kind(&body)
        )));
    }

    let vectors: Vec<Vec<f32>> = serde_json::from_value(body)
        .map_err(|e| EmbeddingError::Malformed(format!("expected an array of vectors: {e}")))?;

    if vectors.len() != expected {
        return Err(EmbeddingError::Malformed(format!(
            "expected {expected} vectors, got {}",
            vectors.len()
        )));
    }

    let dim = vectors.first().map(Vec::len).unwrap_or_default();
    if dim == 0 {
        return Err(EmbeddingError::Malformed("empty vector".into()));
    }
    if vectors.iter().any(|v| v.len() != dim) {
        return Err(EmbeddingError::Malformed(
            "vectors have differing lengths".into(),
        ));
    }

    Ok(vectors)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_batch() {
        let vectors = parse_embeddings(json!([[0.1, 0.2], [0.3, 0.4]]), 2).unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn test_parse_rejects_object() {
        let err = parse_embeddings(json!({"error": "Model is loading"}), 1).unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_parse_rejects_token_level_output() {
        // Per-token embeddings nest one level deeper than expected.
        let err = parse_embeddings(json!([[[0.1, 0.2], [0.3, 0.4]]]), 1).unwrap_err();
        assert!(matches!(err, EmbeddingError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_count_mismatch() {
        let err = parse_embeddings(json!([[0.1, 0.2]]), 2).unwrap_err();
        assert!(err.to_string().contains("expected 2 vectors"));
    }

    #[test]
    fn test_parse_rejects_ragged_vectors() {
        assert!(parse_embeddings(json!([[0.1, 0.2], [0.3]]), 2).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_vector() {
        assert!(parse_embeddings(json!([[]]), 1).is_err());
    }

    #[test]
    fn test_url_joins_model() {
        let config = EmbeddingConfig {
            base_url: "https://example.test/".into(),
            model: "org/model".into(),
            token: None,
        };
        let embedder = FeatureExtractionEmbedder::new(reqwest::Client::new(), &config);
        assert_eq!(
            embedder.url,
            "https://example.test/pipeline/feature-extraction/org/model"
        );
    }
}
