use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::identity::{InternshipStatus, Role};
use crate::records::{InternshipForm, ProgressReport};
use crate::validate::Validate;

use super::state::{AppState, InternshipRecord};
use super::{done, ok, parse_body, require, ApiResult, Body};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/students/submit-internship", post(submit_internship))
        .route("/api/students/progress-report", get(progress_report))
}

/// Creates the internship, or resubmits it for review with the new details.
async fn submit_internship(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    let email = require(&st, &headers, Role::Student)?;
    let form: InternshipForm = parse_body(body)?;
    form.validate()?;
    let company_email = form.company_email.trim().to_string();
    let mut store = st.store.write();
    if !store.companies.contains_key(&company_email) {
        return Err(AppError::application("not_found", "Company not found"));
    }
    let student = store
        .students
        .get_mut(&email)
        .ok_or_else(|| AppError::auth("unauthorized", "Unauthorized student"))?;
    let (id, created_at) = match &student.internship {
        Some(prev) => (prev.id.clone(), prev.created_at),
        None => (Uuid::new_v4().to_string(), Utc::now()),
    };
    student.internship = Some(InternshipRecord {
        id: id.clone(),
        status: InternshipStatus::Submitted,
        company_email,
        start_date: form.start_date,
        end_date: form.end_date,
        allowance: form.allowance,
        created_at,
        com_supervisor_name: form.com_supervisor_name.trim().to_string(),
        com_supervisor_email: form.com_supervisor_email.trim().to_string(),
    });
    info!(target: "server", student = %email, internship = %id, "internship submitted");
    Ok(done("Internship submitted successfully"))
}

async fn progress_report(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    let email = require(&st, &headers, Role::Student)?;
    let store = st.store.read();
    let student = store
        .students
        .get(&email)
        .ok_or_else(|| AppError::auth("unauthorized", "Unauthorized student"))?;
    if student.internship.is_none() {
        return Err(AppError::application("no_internship", "Student has not submitted internship"));
    }
    Ok(match &student.progress_report {
        Some(report) => ok("Progress report fetched successfully", report.clone()),
        None => ok("Progress report not found", ProgressReport::default()),
    })
}
