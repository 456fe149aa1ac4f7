//! Axum Handler for the Skill Endpoint
//!
//! One POST endpoint receives every platform event. The handler verifies the
//! application id, hands the event to the dialog orchestrator, and maps the
//! turn result back into a response envelope.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    models::{ErrorResponse, Request, RequestEnvelope, ResponseEnvelope},
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Handle one voice-platform request envelope.
#[utoipa::path(
    post,
    path = "/skill",
    request_body = RequestEnvelope,
    responses(
        (status = 200, description = "Skill response envelope", body = ResponseEnvelope),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn handle_skill_request(
    State(state): State<Arc<AppState>>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    verify_application_id(&state, &envelope)?;

    let session_id = envelope.session.session_id.clone();
    if envelope.session.new {
        info!(%session_id, "session started");
    }

    let mut attributes = envelope.session.attributes.clone();
    let now = Local::now().naive_local();

    let response = match &envelope.request {
        Request::Launch { request_id } => {
            info!(%session_id, %request_id, "launch request");
            state.skill.handle_launch()
        }
        Request::Intent { request_id, intent } => {
            info!(%session_id, %request_id, intent = %intent.name, "intent request");
            let slots = intent.slot_values();
            state
                .skill
                .handle_intent(&intent.name, &slots, &mut attributes, now)
                .await
                .map_err(|err| ApiError::BadRequest(err.to_string()))?
        }
        Request::SessionEnded { reason } => {
            info!(
                %session_id,
                reason = reason.as_deref().unwrap_or("unknown"),
                "session ended"
            );
            return Ok(Json(ResponseEnvelope::empty()));
        }
    };

    Ok(Json(ResponseEnvelope::from_dialog(response, attributes)))
}

/// Rejects envelopes sent for a different skill deployment. A missing
/// configured id disables the check (local development).
fn verify_application_id(state: &AppState, envelope: &RequestEnvelope) -> Result<(), ApiError> {
    let Some(expected) = &state.config.skill_application_id else {
        return Ok(());
    };
    let supplied = envelope
        .session
        .application
        .as_ref()
        .map(|app| app.application_id.as_str());
    if supplied != Some(expected.as_str()) {
        warn!(?supplied, "request for an unexpected application id");
        return Err(ApiError::BadRequest("invalid application id".to_string()));
    }
    Ok(())
}
