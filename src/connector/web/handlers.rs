use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::{ChatError, Exchange, TranscriptOrder};

use super::page::PageRenderer;
use super::session_registry::SessionRegistry;

pub const SESSION_COOKIE: &str = "mumbai_local_session";

pub struct AppState {
    pub registry: SessionRegistry,
    pub renderer: PageRenderer,
}

#[derive(Deserialize)]
pub struct AskForm {
    #[serde(default)]
    question: String,
}

#[derive(Deserialize)]
pub struct TranscriptParams {
    order: Option<TranscriptOrder>,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    order: TranscriptOrder,
    exchanges: Vec<Exchange>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// `GET /` — the form plus the transcript, newest first.
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, shared, created) = state
        .registry
        .get_or_create(session_cookie(&headers).as_deref())
        .await;

    let exchanges = shared.transcript(TranscriptOrder::Reverse).await;
    let last_error = shared.take_error().await;

    let persona = state.registry.container().persona();
    let response = match state
        .renderer
        .render_index(persona, &exchanges, last_error.as_deref())
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    };

    with_session_cookie(response, &id, created)
}

/// `POST /ask` — submit the question, then redirect back to the page.
///
/// A blank question is silently ignored. Responder failures are kept on the
/// session and shown once on the next page view. Page views for the same
/// session are served from the last published transcript while this runs.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<AskForm>,
) -> Response {
    let (id, shared, created) = state
        .registry
        .get_or_create(session_cookie(&headers).as_deref())
        .await;

    match shared.submit(&form.question).await {
        Ok(_) | Err(ChatError::EmptyInput) => {}
        Err(e) => warn!("Question failed for session {}: {}", id, e),
    }

    with_session_cookie(Redirect::to("/").into_response(), &id, created)
}

/// `GET /api/transcript?order=reverse|chronological`
pub async fn transcript(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<TranscriptParams>,
) -> Response {
    let (id, shared, created) = state
        .registry
        .get_or_create(session_cookie(&headers).as_deref())
        .await;

    let order = params.order.unwrap_or_default();
    let exchanges = shared.transcript(order).await;

    with_session_cookie(
        Json(TranscriptResponse { order, exchanges }).into_response(),
        &id,
        created,
    )
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn with_session_cookie(mut response: Response, id: &str, created: bool) -> Response {
    if created {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}
