//! signup / login / me / logout, the same four endpoints for every role.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::envelope::Envelope;
use crate::error::AppError;
use crate::identity::Role;

use super::security::{hash_secret_blocking, verify_secret_blocking};
use super::state::{AppState, CompanyRecord, Store, StudentRecord, SupervisorRecord};
use super::{clear_role_cookie, done, parse_body, parse_cookie, require, set_role_cookie, ApiResult, Body};

pub(super) fn routes(role: Role) -> Router<AppState> {
    let base = format!("/api/{}", role.collection());
    let mut r = Router::new()
        .route(
            &format!("{base}/login"),
            post(move |State(st): State<AppState>, body: Body| async move { login(&st, role, body).await }),
        )
        .route(
            &format!("{base}/me"),
            get(move |State(st): State<AppState>, headers: HeaderMap| async move { me(&st, role, &headers) })
                .post(move |State(st): State<AppState>, headers: HeaderMap| async move { me(&st, role, &headers) }),
        )
        .route(
            &format!("{base}/logout"),
            post(move |State(st): State<AppState>, headers: HeaderMap| async move { logout(&st, role, &headers) }),
        );
    if role.allows_signup() {
        r = r.route(
            &format!("{base}/signup"),
            post(move |State(st): State<AppState>, body: Body| async move { signup(&st, role, body).await }),
        );
    }
    r
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentSignup {
    student_id: String,
    full_name: String,
    email: String,
    ic_number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SupervisorSignup {
    full_name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanySignup {
    company_name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentLogin {
    email: String,
    ic_number: String,
}

#[derive(Deserialize)]
struct PasswordLogin {
    email: String,
    password: String,
}

enum NewAccount {
    Student(StudentRecord),
    Supervisor(SupervisorRecord),
    Company(CompanyRecord),
}

impl NewAccount {
    fn email(&self) -> &str {
        match self {
            NewAccount::Student(r) => &r.email,
            NewAccount::Supervisor(r) => &r.email,
            NewAccount::Company(r) => &r.email,
        }
    }

    fn insert_into(self, store: &mut Store) {
        match self {
            NewAccount::Student(r) => { store.students.insert(r.email.clone(), r); }
            NewAccount::Supervisor(r) => { store.supervisors.insert(r.email.clone(), r); }
            NewAccount::Company(r) => { store.companies.insert(r.email.clone(), r); }
        }
    }
}

/// Hashing happens on the blocking pool, before the store lock is taken.
async fn new_account(role: Role, body: Body) -> Result<NewAccount, AppError> {
    let now = Utc::now();
    Ok(match role {
        Role::Student => {
            let b: StudentSignup = parse_body(body)?;
            NewAccount::Student(StudentRecord {
                student_id: b.student_id.trim().to_string(),
                full_name: b.full_name.trim().to_string(),
                email: b.email.trim().to_string(),
                ic_hash: hash_secret_blocking(b.ic_number).await?,
                created_at: now,
                supervisor_email: None,
                internship: None,
                progress_report: None,
            })
        }
        Role::Supervisor => {
            let b: SupervisorSignup = parse_body(body)?;
            NewAccount::Supervisor(SupervisorRecord {
                email: b.email.trim().to_string(),
                full_name: b.full_name.trim().to_string(),
                password_hash: hash_secret_blocking(b.password).await?,
                is_approved: false,
                created_at: now,
            })
        }
        Role::Company => {
            let b: CompanySignup = parse_body(body)?;
            NewAccount::Company(CompanyRecord {
                email: b.email.trim().to_string(),
                company_name: b.company_name.trim().to_string(),
                password_hash: hash_secret_blocking(b.password).await?,
                is_approved: false,
                created_at: now,
            })
        }
        Role::Admin => return Err(AppError::not_found("no_signup", "Admin accounts cannot sign up")),
    })
}

async fn signup(st: &AppState, role: Role, body: Body) -> ApiResult {
    let account = new_account(role, body).await?;
    let email = account.email().to_string();
    if email.is_empty() {
        return Err(AppError::application("missing_fields", "Missing required fields"));
    }
    {
        let mut store = st.store.write();
        if store.has_account(role, &email) {
            return Err(AppError::application("exists", format!("{} already exists", role.title())));
        }
        account.insert_into(&mut store);
    }
    info!(target: "server", %role, %email, "account created");
    Ok(done(&format!("{} added successfully", role.title())))
}

async fn login(st: &AppState, role: Role, body: Body) -> ApiResult {
    let (email, secret) = match role {
        Role::Student => {
            let b: StudentLogin = parse_body(body)?;
            (b.email, b.ic_number)
        }
        _ => {
            let b: PasswordLogin = parse_body(body)?;
            (b.email, b.password)
        }
    };
    let email = email.trim().to_string();
    let hash = st.store.read().secret_hash(role, &email).map(str::to_string);
    let verified = match hash.clone() {
        Some(h) => verify_secret_blocking(h, secret).await,
        None => false,
    };
    if !verified {
        debug!(target: "server", %role, %email, found = hash.is_some(), "login refused");
        let message = match (role, hash.is_some()) {
            (Role::Admin, _) => "Invalid email or password".to_string(),
            (_, false) => format!("{} not found", role.title()),
            (Role::Student, true) => "Invalid IC Number".to_string(),
            (_, true) => "Wrong password".to_string(),
        };
        return Err(AppError::application("login_failed", message));
    }
    let payload = st
        .store
        .read()
        .identity_payload(role, &email)
        .ok_or_else(|| AppError::internal("identity", "account vanished during login"))?;
    let session = st.sessions.issue(role, &email).map_err(|e| {
        tracing::error!(target: "server", %role, error = %e, "session token generation failed");
        AppError::internal("session", "Could not start a session")
    })?;
    let cookie = set_role_cookie(st, role, &session.token)?;
    info!(target: "server", %role, %email, "logged in");
    let env = Envelope::ok(format!("{} logged in successfully", role.title()), payload);
    Ok(([(header::SET_COOKIE, cookie)], Json(env)).into_response())
}

fn me(st: &AppState, role: Role, headers: &HeaderMap) -> ApiResult {
    // No cookie is a normal logged-out visit, not an error status.
    if parse_cookie(headers, &role.cookie_name()).is_none() {
        return Ok(Json(Envelope::<serde_json::Value>::fail(format!("{} is not logged in", role.title()))).into_response());
    }
    let email = require(st, headers, role)?;
    let payload = st
        .store
        .read()
        .identity_payload(role, &email)
        .ok_or_else(|| AppError::auth("unauthorized", format!("Unauthorized {role}")))?;
    Ok(Json(Envelope::ok(format!("Authorized {role}"), payload)).into_response())
}

fn logout(st: &AppState, role: Role, headers: &HeaderMap) -> ApiResult {
    if let Some(token) = parse_cookie(headers, &role.cookie_name()) {
        st.sessions.logout(&token);
    }
    let cookie = clear_role_cookie(st, role)?;
    let env = Envelope::<serde_json::Value>::ok_empty(format!("{} logged out successfully", role.title()));
    Ok(([(header::SET_COOKIE, cookie)], Json(env)).into_response())
}
