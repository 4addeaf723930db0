//! HTTP request handlers

use super::types::{ChatRequest, ErrorResponse};
use super::AppState;
use crate::session::SessionId;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{headers::Cookie, TypedHeader};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let existing = cookies
        .as_ref()
        .and_then(|TypedHeader(cookies)| cookies.get(&state.session_cookie))
        .filter(|value| !value.is_empty())
        .map(SessionId::from);
    let minted = existing.is_none();
    let id = existing.unwrap_or_else(SessionId::generate);

    let reply = state.dispatcher.handle(&id, request.text()).await;
    let mut response = Json(reply).into_response();

    if minted {
        tracing::debug!(session_id = %id, "Issued session cookie");
        let cookie = format!(
            "{}={id}; HttpOnly; SameSite=Lax; Path=/",
            state.session_cookie
        );
        let value =
            HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.to_string()))?;
        response.headers_mut().insert(header::SET_COOKIE, value);
    }

    Ok(response)
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("zana ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
