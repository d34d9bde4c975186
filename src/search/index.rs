use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::IndexConfig;
use crate::error::IndexQueryError;
use crate::models::RetrievalMatch;

/// Similarity search over the review index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches, most similar first, with metadata.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, IndexQueryError>;
}

const API_VERSION: &str = "2024-07";

// ─── Pinecone ────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RetrievalMatch>,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

/// Client for a Pinecone index's data plane (`POST https://{host}/query`).
pub struct PineconeIndex {
    client: reqwest::Client,
    query_url: String,
    api_key: Option<String>,
    namespace: Option<String>,
}

impl PineconeIndex {
    /// Build a client for a known data-plane host.
    pub fn with_host(client: reqwest::Client, config: &IndexConfig, host: &str) -> Self {
        Self {
            client,
            query_url: format!("{}/query", normalize_host(host)),
            api_key: config.api_key.clone(),
            namespace: config.namespace.clone(),
        }
    }

    /// Build a client, looking the host up on the control plane when the
    /// config does not name one.
    pub async fn connect(
        client: reqwest::Client,
        config: &IndexConfig,
    ) -> Result<Self, IndexQueryError> {
        let host = match config.host.as_deref() {
            Some(host) => host.to_string(),
            None => describe_index_host(&client, config).await?,
        };
        tracing::info!("Vector index '{}' at {}", config.name, host);
        Ok(Self::with_host(client, config, &host))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, IndexQueryError> {
        let req = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace: self.namespace.as_deref(),
        };

        let builder = self
            .client
            .post(&self.query_url)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&req);
        let resp = with_api_key(builder, self.api_key.as_deref())
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(IndexQueryError::Upstream { status, body });
        }

        let body: QueryResponse = resp
            .json()
            .await
            .map_err(|e| IndexQueryError::Malformed(e.to_string()))?;

        Ok(body.matches)
    }
}

/// `GET {controller}/indexes/{name}` and read its `host`.
async fn describe_index_host(
    client: &reqwest::Client,
    config: &IndexConfig,
) -> Result<String, IndexQueryError> {
    let url = format!(
        "{}/indexes/{}",
        config.controller_url.trim_end_matches('/'),
        config.name
    );

    let builder = client
        .get(&url)
        .header("X-Pinecone-API-Version", API_VERSION);
    let resp = with_api_key(builder, config.api_key.as_deref())
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!("Describe index '{}' returned {status}: {body}", config.name);
        return Err(IndexQueryError::HostResolution(config.name.clone()));
    }

    let body: DescribeIndexResponse = resp
        .json()
        .await
        .map_err(|_| IndexQueryError::HostResolution(config.name.clone()))?;

    Ok(body.host)
}

fn with_api_key(builder: reqwest::RequestBuilder, api_key: Option<&str>) -> reqwest::RequestBuilder {
    match api_key {
        Some(key) => builder.header("Api-Key", key),
        None => builder,
    }
}

/// Hosts from the control plane come without a scheme.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_host() {
        assert_eq!(
            normalize_host("quickstart-abc.svc.pinecone.io"),
            "https://quickstart-abc.svc.pinecone.io"
        );
    }

    #[test]
    fn test_normalize_keeps_scheme() {
        assert_eq!(normalize_host("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_query_request_shape() {
        let req = QueryRequest {
            vector: &[0.5, 0.25],
            top_k: 3,
            include_metadata: true,
            namespace: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["vector"][1], 0.25);
        assert!(json.get("namespace").is_none());
    }

    #[test]
    fn test_query_response_parses_matches() {
        let body = r#"{"matches":[
            {"id":"a","score":0.9,"metadata":{"professor":"Dr. A","subject":"Math","stars":5}},
            {"id":"b","score":0.8}
        ],"namespace":""}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].professor(), "Dr. A");
        assert!(parsed.matches[1].metadata.is_empty());
    }
}
