use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::markdown::markdown_to_html;

const MESSAGE_REQUIRED: &str = "Message is required.";
const FAILURE_REPLY: &str = "Something went wrong.";

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// A bot reply: the raw model text plus its rendered HTML.
#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub html: String,
}

impl ChatReply {
    fn new(reply: String) -> Self {
        let html = markdown_to_html(&reply);
        Self { reply, html }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(ChatRequest { message: Some(m) })) if !m.trim().is_empty() => m,
        Ok(_) => return message_required(),
        Err(e) => {
            tracing::debug!("Rejected chat payload: {e}");
            return message_required();
        }
    };

    tracing::debug!(chars = message.chars().count(), "Chat request");

    match state.gemini.generate(&message).await {
        Ok(reply) => (StatusCode::OK, Json(ChatReply::new(reply))).into_response(),
        Err(e) => {
            tracing::error!("Gemini request failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply::new(FAILURE_REPLY.to_string())),
            )
                .into_response()
        }
    }
}

fn message_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: MESSAGE_REQUIRED.to_string(),
        }),
    )
        .into_response()
}
