use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Feature-extraction service used to embed the user's query
    pub embedding: EmbeddingConfig,
    /// Vector index holding the professor reviews
    pub index: IndexConfig,
    /// OpenAI-compatible chat completion service
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL; requests go to `{base_url}/pipeline/feature-extraction/{model}`
    pub base_url: String,
    pub model: String,
    /// Bearer token
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name, used to look up the data-plane host when `host` is unset.
    pub name: String,
    /// Data-plane host, e.g. "quickstart-abc123.svc.aped-4627-b74a.pinecone.io".
    pub host: Option<String>,
    /// Control-plane URL for host lookup.
    pub controller_url: String,
    pub namespace: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL; requests go to `{base_url}/v1/chat/completions`
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            embedding: EmbeddingConfig::default(),
            index: IndexConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            token: None,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "quickstart".to_string(),
            host: None,
            controller_url: "https://api.pinecone.io".to_string(),
            namespace: None,
            api_key: None,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api".to_string(),
            model: "meta-llama/llama-3.1-8b-instruct:free".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("CHAT_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // Embedding service
        if let Some(token) = env_any(&["EMBEDDER_KEY", "embedder_key"]) {
            config.embedding.token = Some(token);
        }
        if let Ok(url) = std::env::var("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }

        // Vector index
        if let Some(key) = env_any(&["PINECONE_KEY", "pinecone_key"]) {
            config.index.api_key = Some(key);
        }
        if let Ok(name) = std::env::var("PINECONE_INDEX") {
            config.index.name = name;
        }
        if let Ok(host) = std::env::var("PINECONE_INDEX_HOST") {
            config.index.host = Some(host);
        }
        if let Ok(url) = std::env::var("PINECONE_CONTROLLER_URL") {
            config.index.controller_url = url;
        }
        if let Ok(ns) = std::env::var("PINECONE_NAMESPACE") {
            config.index.namespace = Some(ns);
        }

        // Completion service
        if let Some(key) = env_any(&["OPENAI_KEY", "openai_key"]) {
            config.completion.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("COMPLETION_BASE_URL") {
            config.completion.base_url = url;
        }
        if let Ok(model) = std::env::var("COMPLETION_MODEL") {
            config.completion.model = model;
        }

        config
    }

    /// Names of credentials that are not configured.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.embedding.token.is_none() {
            missing.push("EMBEDDER_KEY");
        }
        if self.index.api_key.is_none() {
            missing.push("PINECONE_KEY");
        }
        if self.completion.api_key.is_none() {
            missing.push("OPENAI_KEY");
        }
        missing
    }
}

/// First non-empty value among `names`.
fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.is_empty())
}
