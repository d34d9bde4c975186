use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::models::{ChatReply, ChatRequest, ErrorBody};
use crate::state::AppState;

/// Body returned for every failure. The specific cause is only logged.
pub const GENERIC_ERROR: &str = "Internal Server Error";

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// POST /chat — answer the newest user turn with retrieved review context.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!(kind = "invalid_request", "Rejected chat body: {rejection}");
        internal_error()
    })?;

    let span = tracing::info_span!("chat", request_id = %Uuid::new_v4());
    let result = state.pipeline.run(&req.data).instrument(span).await;

    match result {
        Ok(message) => Ok(Json(ChatReply { message })),
        // Already logged with its kind by the pipeline.
        Err(_) => Err(internal_error()),
    }
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: GENERIC_ERROR.to_string(),
        }),
    )
}
