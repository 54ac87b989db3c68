use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::identity::Role;
use crate::records::{Job, JobDraft, JobEdit, JobIdRef};

use super::state::AppState;
use super::{done, ok, parse_body, require, ApiResult, Body};

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/companies/jobs", get(list_jobs).post(add_job).put(edit_job).delete(delete_job))
}

/// Email and display name of an approved company caller.
fn require_approved_company(st: &AppState, headers: &HeaderMap) -> Result<(String, String), AppError> {
    let email = require(st, headers, Role::Company)?;
    let store = st.store.read();
    let company = store
        .companies
        .get(&email)
        .ok_or_else(|| AppError::auth("unauthorized", "Unauthorized company"))?;
    if !company.is_approved {
        return Err(AppError::application("not_approved", "Your account is not approved yet"));
    }
    let name = company.company_name.clone();
    Ok((email, name))
}

async fn list_jobs(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    let company = require(&st, &headers, Role::Company)?;
    let rows: Vec<Job> = st.store.read().jobs.iter().filter(|j| j.company_email == company).cloned().collect();
    Ok(ok("Jobs fetched successfully", rows))
}

async fn add_job(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    let (email, company) = require_approved_company(&st, &headers)?;
    let draft: JobDraft = parse_body(body)?;
    let job = Job {
        job_id: Uuid::new_v4().to_string(),
        title: draft.title,
        location: draft.location,
        salary: draft.salary,
        description: draft.description,
        posted_at: Utc::now(),
        company,
        company_email: email.clone(),
    };
    st.store.write().jobs.insert(0, job.clone());
    info!(target: "server", company = %email, job = %job.job_id, "job posted");
    Ok(ok("Job added successfully", job))
}

async fn edit_job(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    let (email, _) = require_approved_company(&st, &headers)?;
    let edit: JobEdit = parse_body(body)?;
    let mut store = st.store.write();
    let job = store
        .jobs
        .iter_mut()
        .find(|j| j.job_id == edit.job_id && j.company_email == email)
        .ok_or_else(|| AppError::application("not_found", "Job not found"))?;
    job.title = edit.title;
    job.location = edit.location;
    job.salary = edit.salary;
    job.description = edit.description;
    Ok(done("Job updated successfully"))
}

async fn delete_job(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    let (email, _) = require_approved_company(&st, &headers)?;
    let JobIdRef { job_id } = parse_body(body)?;
    let mut store = st.store.write();
    let before = store.jobs.len();
    store.jobs.retain(|j| !(j.job_id == job_id && j.company_email == email));
    if store.jobs.len() == before {
        return Err(AppError::application("not_found", "Job not found"));
    }
    Ok(done("Job deleted successfully"))
}
