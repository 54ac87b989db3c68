use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::identity::{InternshipStatus, Role};
use crate::records::{Announcement, AnnouncementDraft, AnnouncementEdit, EmailRef, IdRef, InternshipIdRef};

use super::state::AppState;
use super::{done, ok, parse_body, require, ApiResult, Body};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/supervisors", get(list_supervisors))
        .route("/api/supervisors/approve", post(approve_supervisor))
        .route("/api/companies", get(list_companies))
        .route("/api/companies/approve", post(approve_company))
        .route("/api/admins/students", get(list_submissions))
        .route("/api/admins/students/approve", post(approve_internship))
        .route("/api/admins/students/reject", post(reject_internship))
        .route(
            "/api/admins/announcements",
            get(list_announcements).post(add_announcement).put(edit_announcement).delete(delete_announcement),
        )
}

async fn list_supervisors(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let rows = st.store.read().supervisor_rows();
    Ok(ok("Supervisors fetched successfully", rows))
}

async fn approve_supervisor(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    let admin = require(&st, &headers, Role::Admin)?;
    let EmailRef { email } = parse_body(body)?;
    {
        let mut store = st.store.write();
        let sup = store
            .supervisors
            .get_mut(email.trim())
            .ok_or_else(|| AppError::application("not_found", "Supervisor not found"))?;
        sup.is_approved = true;
    }
    info!(target: "server", %admin, supervisor = %email, "supervisor approved");
    Ok(done("Supervisor approved successfully"))
}

/// Admins manage the list; students pick their internship company from it.
async fn list_companies(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    if require(&st, &headers, Role::Admin).is_err() {
        require(&st, &headers, Role::Student)?;
    }
    let rows = st.store.read().company_rows();
    Ok(ok("Companies fetched successfully", rows))
}

async fn approve_company(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    let admin = require(&st, &headers, Role::Admin)?;
    let EmailRef { email } = parse_body(body)?;
    {
        let mut store = st.store.write();
        let company = store
            .companies
            .get_mut(email.trim())
            .ok_or_else(|| AppError::application("not_found", "Company not found"))?;
        company.is_approved = true;
    }
    info!(target: "server", %admin, company = %email, "company approved");
    Ok(done("Company approved successfully"))
}

async fn list_submissions(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let store = st.store.read();
    let rows: Vec<_> = store
        .students
        .values()
        .filter(|s| s.internship.is_some())
        .map(|s| store.submission(s))
        .collect();
    Ok(ok("Students fetched successfully", rows))
}

fn set_internship_status(st: &AppState, body: Body, status: InternshipStatus) -> Result<String, AppError> {
    let InternshipIdRef { internship_id } = parse_body(body)?;
    let mut store = st.store.write();
    let internship = store
        .students
        .values_mut()
        .filter_map(|s| s.internship.as_mut())
        .find(|i| i.id == internship_id)
        .ok_or_else(|| AppError::application("not_found", "Internship not found"))?;
    internship.status = status;
    Ok(internship_id)
}

async fn approve_internship(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let id = set_internship_status(&st, body, InternshipStatus::Approved)?;
    info!(target: "server", internship = %id, "internship approved");
    Ok(done("Internship approved successfully"))
}

async fn reject_internship(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let id = set_internship_status(&st, body, InternshipStatus::Rejected)?;
    info!(target: "server", internship = %id, "internship rejected");
    Ok(done("Internship rejected successfully"))
}

async fn list_announcements(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let rows = st.store.read().announcements.clone();
    Ok(ok("Announcements fetched successfully", rows))
}

async fn add_announcement(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let draft: AnnouncementDraft = parse_body(body)?;
    let a = Announcement {
        id: Uuid::new_v4().to_string(),
        title: draft.title,
        content: draft.content,
        posted_at: Utc::now(),
    };
    st.store.write().announcements.insert(0, a.clone());
    Ok(ok("Announcement added successfully", a))
}

async fn edit_announcement(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let edit: AnnouncementEdit = parse_body(body)?;
    let mut store = st.store.write();
    let a = store
        .announcements
        .iter_mut()
        .find(|a| a.id == edit.id)
        .ok_or_else(|| AppError::application("not_found", "Announcement not found"))?;
    a.title = edit.title;
    a.content = edit.content;
    Ok(done("Announcement updated successfully"))
}

async fn delete_announcement(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    require(&st, &headers, Role::Admin)?;
    let IdRef { id } = parse_body(body)?;
    let mut store = st.store.write();
    let before = store.announcements.len();
    store.announcements.retain(|a| a.id != id);
    if store.announcements.len() == before {
        return Err(AppError::application("not_found", "Announcement not found"));
    }
    Ok(done("Announcement deleted successfully"))
}
