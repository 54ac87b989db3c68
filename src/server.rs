//!
//! GoIntern reference backend
//! --------------------------
//! An Axum HTTP API implementing the portal contract in memory, so the client, the resolver and
//! the gates can be exercised end to end.
//!
//! Responsibilities:
//! - Per-role signup/login/me/logout with one cookie per role (`access_token_{role}`).
//! - Role-protected resource endpoints for admins, supervisors, companies and students.
//! - Every answer is the `{success, data?, message?}` envelope; failures carry a user message.
//! - A seeded admin account taken from configuration.

use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::PortalConfig;
use crate::envelope::Envelope;
use crate::error::{AppError, AppResult};
use crate::identity::Role;

pub mod security;
pub mod sessions;
pub mod state;
mod accounts;
mod admin;
mod company;
mod student;
mod supervisor;

pub use state::{AppState, Store};

type ApiResult = Result<Response, AppError>;
type Body = Result<Json<Value>, JsonRejection>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(target: "server", error = %self, "request failed");
        }
        (status, Json(Envelope::<Value>::fail(self.message()))).into_response()
    }
}

fn ok<T: Serialize>(message: &str, data: T) -> Response {
    Json(Envelope::ok(message, data)).into_response()
}

fn done(message: &str) -> Response {
    Json(Envelope::<Value>::ok_empty(message)).into_response()
}

/// Decode a JSON body; anything unusable is the backend's "Missing required fields".
fn parse_body<T: DeserializeOwned>(body: Body) -> AppResult<T> {
    let missing = || AppError::application("missing_fields", "Missing required fields");
    let Json(value) = body.map_err(|_| missing())?;
    serde_json::from_value(value).map_err(|_| missing())
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some((k, v)) = p.split_once('=') {
            if k == name && !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    None
}

fn cookie_attrs(secure: bool) -> &'static str {
    // SameSite=None is only honoured on Secure cookies.
    if secure { "HttpOnly; Secure; SameSite=None; Path=/" } else { "HttpOnly; SameSite=Lax; Path=/" }
}

fn set_role_cookie(state: &AppState, role: Role, token: &str) -> AppResult<HeaderValue> {
    let v = format!(
        "{}={}; Max-Age={}; {}",
        role.cookie_name(),
        token,
        state.sessions.ttl().as_secs(),
        cookie_attrs(state.cookie_secure)
    );
    HeaderValue::from_str(&v).map_err(|e| AppError::internal("cookie", e.to_string()))
}

fn clear_role_cookie(state: &AppState, role: Role) -> AppResult<HeaderValue> {
    let v = format!("{}=; Max-Age=0; {}", role.cookie_name(), cookie_attrs(state.cookie_secure));
    HeaderValue::from_str(&v).map_err(|e| AppError::internal("cookie", e.to_string()))
}

/// Email of the caller's `role` session, or the 401 envelope.
fn require(state: &AppState, headers: &HeaderMap, role: Role) -> AppResult<String> {
    let token = parse_cookie(headers, &role.cookie_name())
        .ok_or_else(|| AppError::auth("not_logged_in", format!("{} is not logged in", role.title())))?;
    let email = state
        .sessions
        .validate(role, &token)
        .ok_or_else(|| AppError::auth("unauthorized", format!("Unauthorized {role}")))?;
    if !state.store.read().has_account(role, &email) {
        return Err(AppError::auth("unauthorized", format!("Unauthorized {role}")));
    }
    Ok(email)
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(|| async { "gointern ok" }))
        .route("/api", get(health).post(health));
    for role in Role::ALL {
        app = app.merge(accounts::routes(role));
    }
    app.merge(admin::routes())
        .merge(supervisor::routes())
        .merge(company::routes())
        .merge(student::routes())
        .with_state(state)
}

async fn health() -> Response {
    done("The API server is running!")
}

/// Serve on an already bound listener. Tests bind port 0 and read the address back.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    info!(target: "server", "Serving GoIntern API on http://{}/api", addr);
    axum::serve(listener, router(state)).await.context("HTTP server stopped")?;
    Ok(())
}

pub async fn run_with_port(config: &PortalConfig) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    info!(target: "startup", admin = %config.admin_email, secure_cookies = config.cookie_secure, "seeded admin account");
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(target: "startup", "Starting server on {}", addr);
    let listener = TcpListener::bind(addr).await.with_context(|| format!("While binding {addr}"))?;
    serve(listener, state).await
}

/// Convenience entry point using configuration from the environment.
pub async fn run() -> anyhow::Result<()> {
    run_with_port(&PortalConfig::load()).await
}
