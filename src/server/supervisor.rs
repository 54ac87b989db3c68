use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::error::AppError;
use crate::identity::Role;
use crate::records::AssignStudent;

use super::state::AppState;
use super::{ok, parse_body, require, ApiResult, Body};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/students", get(list_students))
        .route("/api/supervisors/assign-student", post(assign_student))
        .route("/api/supervisors/my-students", get(my_students))
}

fn require_approved_supervisor(st: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    let email = require(st, headers, Role::Supervisor)?;
    let approved = st.store.read().supervisors.get(&email).is_some_and(|s| s.is_approved);
    if !approved {
        return Err(AppError::application("not_approved", "Your account is not approved yet"));
    }
    Ok(email)
}

async fn list_students(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    require(&st, &headers, Role::Supervisor)?;
    let rows = st.store.read().student_rows();
    Ok(ok("Students fetched successfully", rows))
}

async fn assign_student(State(st): State<AppState>, headers: HeaderMap, body: Body) -> ApiResult {
    let supervisor = require_approved_supervisor(&st, &headers)?;
    let AssignStudent { student_id } = parse_body(body)?;
    let mut store = st.store.write();
    let student = store
        .students
        .values_mut()
        .find(|s| s.student_id == student_id.trim())
        .ok_or_else(|| AppError::application("not_found", "Student not found"))?;
    if let Some(current) = &student.supervisor_email {
        let message = if *current == supervisor {
            "Student is already assigned to you"
        } else {
            "Student is already assigned to another supervisor"
        };
        return Err(AppError::application("assigned", message));
    }
    student.supervisor_email = Some(supervisor.clone());
    let student = student.clone();
    let row = store.submission(&student);
    info!(target: "server", %supervisor, student = %row.email, "student assigned");
    Ok(ok("Student assigned successfully", row))
}

async fn my_students(State(st): State<AppState>, headers: HeaderMap) -> ApiResult {
    let supervisor = require(&st, &headers, Role::Supervisor)?;
    let store = st.store.read();
    let rows: Vec<_> = store
        .students
        .values()
        .filter(|s| s.supervisor_email.as_deref() == Some(supervisor.as_str()))
        .map(|s| store.submission(s))
        .collect();
    Ok(ok("Students fetched successfully", rows))
}
