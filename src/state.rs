use std::sync::Arc;

use crate::config::Config;
use crate::llm::completion::OpenAiCompleter;
use crate::llm::embeddings::FeatureExtractionEmbedder;
use crate::pipeline::Pipeline;
use crate::search::index::PineconeIndex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wire the hosted clients from `config`.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Timeouts are left at the client defaults.
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("professor-chat/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let embedder = FeatureExtractionEmbedder::new(http_client.clone(), &config.embedding);
        let index = PineconeIndex::connect(http_client.clone(), &config.index).await?;
        let completer = OpenAiCompleter::new(http_client, &config.completion);

        Ok(Self::with_pipeline(Pipeline::new(
            Arc::new(embedder),
            Arc::new(index),
            Arc::new(completer),
        )))
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
