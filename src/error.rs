//! Failure types for each upstream boundary and the pipeline that joins them.

use thiserror::Error;

/// Failure of the embedding service for the current request.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("embedding service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed embedding payload: {0}")]
    Malformed(String),
}

/// Failure of the vector index for the current request.
#[derive(Debug, Error)]
pub enum IndexQueryError {
    #[error("index request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("index service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed index response: {0}")]
    Malformed(String),

    #[error("could not resolve host for index '{0}'")]
    HostResolution(String),
}

/// Failure of the completion service for the current request.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion response contained no choices")]
    NoChoices,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid chat request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    IndexQuery(#[from] IndexQueryError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl PipelineError {
    /// Short tag naming the failing boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "invalid_request",
            PipelineError::Embedding(_) => "embedding_service",
            PipelineError::IndexQuery(_) => "index_query",
            PipelineError::Completion(_) => "completion_service",
        }
    }

    /// Whether the failure came from an upstream service rather than the caller.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, PipelineError::InvalidRequest(_))
    }
}
