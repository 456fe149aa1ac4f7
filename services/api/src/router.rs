//! Axum Router Configuration
//!
//! This module defines the HTTP routing for the application: the skill
//! endpoint and the OpenAPI documentation.

use crate::{
    handlers,
    models::{
        Application, Card, ErrorResponse, Intent, OutputSpeech, Reprompt, Request,
        RequestEnvelope, ResponseBody, ResponseEnvelope, SessionEnvelope, Slot,
    },
    state::AppState,
};

use axum::{Router, routing::post};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::handle_skill_request),
    components(
        schemas(
            RequestEnvelope,
            SessionEnvelope,
            Application,
            Request,
            Intent,
            Slot,
            ResponseEnvelope,
            ResponseBody,
            OutputSpeech,
            Card,
            Reprompt,
            ErrorResponse
        )
    ),
    tags(
        (name = "MenuTeller API", description = "Voice-platform endpoint for the cafeteria menu skill")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/skill", post(handlers::handle_skill_request))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
