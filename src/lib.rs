//! # professor-chat
//!
//! A retrieval-augmented chat service over professor reviews. A browser page
//! posts the conversation to `POST /chat`; the server answers the newest
//! question with help from three hosted services.
//!
//! ## Pipeline
//!
//! ```text
//!   conversation (newest turn = user question)
//!        │
//!        ▼
//!   ┌──────────────┐   question text    ┌──────────────────────┐
//!   │   Pipeline   │ ─────────────────▶ │ Embedder             │
//!   │              │ ◀───── vector ──── │ (feature extraction) │
//!   │              │                    └──────────────────────┘
//!   │              │   vector, top 3    ┌──────────────────────┐
//!   │              │ ─────────────────▶ │ VectorIndex          │
//!   │              │ ◀──── matches ──── │ (Pinecone)           │
//!   │              │                    └──────────────────────┘
//!   │              │   system + history + context
//!   │              │                    ┌──────────────────────┐
//!   │              │ ─────────────────▶ │ ChatCompleter        │
//!   │              │ ◀───── reply ───── │ (OpenAI-compatible)  │
//!   └──────┬───────┘                    └──────────────────────┘
//!          ▼
//!   200 {"message": reply}   or   500 {"error": "Internal Server Error"}
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and the three services
//! - [`models`] - Chat turns, request/response bodies and retrieval matches
//! - [`error`] - Per-service error types and the pipeline error sum
//! - [`llm::embeddings`] - Embedding client
//! - [`search::index`] - Vector index client
//! - [`prompt`] - System prompt and retrieval-context formatting
//! - [`llm::completion`] - Chat completion client
//! - [`pipeline`] - Per-request orchestration
//! - [`api`] - Axum router and the chat handler
//! - [`ui`] - Client-side chat state, view model and reply formatting
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod search;
pub mod state;
pub mod ui;
