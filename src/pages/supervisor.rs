use serde::Serialize;

use crate::client::PortalClient;
use crate::error::{AppResult, Notification};
use crate::gate::{require_approved, Notice};
use crate::identity::SupervisorProfile;
use crate::records::{AssignStudent, StudentRow, StudentSubmission};
use crate::roster::Roster;
use crate::validate::Validate;

/// `/supervisor/my-students`: students assigned to the supervisor, plus the pool to assign from.
#[derive(Debug, Default)]
pub struct MyStudentsPage {
    pub assigned: Roster<StudentSubmission>,
    pub candidates: Roster<StudentRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MyStudentsContent {
    pub caption: String,
    pub assigned: Vec<StudentSubmission>,
    /// Students not yet in the table, offered by the assign dialog.
    pub candidates: Vec<StudentRow>,
}

impl MyStudentsPage {
    pub async fn load(client: &PortalClient) -> (Self, Vec<Notification>) {
        let (assigned, a) = Roster::load(client.my_students().await);
        let (candidates, c) = Roster::load(client.list_students().await);
        (Self { assigned, candidates }, a.into_iter().chain(c).collect())
    }

    /// An unapproved supervisor never gets the table.
    pub fn content(&self, profile: &SupervisorProfile) -> Result<MyStudentsContent, Notice> {
        require_approved(profile)?;
        let candidates = self
            .candidates
            .items()
            .iter()
            .filter(|s| self.assigned.items().iter().all(|a| a.student_id != s.student_id))
            .cloned()
            .collect();
        Ok(MyStudentsContent {
            caption: format!("You have {} students under your supervision", self.assigned.len()),
            assigned: self.assigned.items().to_vec(),
            candidates,
        })
    }

    /// Assign a student; the confirmed response carries the student row to append.
    pub async fn assign(&mut self, client: &PortalClient, form: &AssignStudent) -> AppResult<Notification> {
        form.validate()?;
        let reply = client.assign_student(form).await;
        self.assigned.confirm(reply, |roster, data| {
            if let Some(student) = data {
                roster.append(student);
            }
        })
    }
}

/// `/supervisor/progress-report`: one row per assigned student with their report link, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub download_url: Option<String>,
}

pub fn progress_reports(profile: &SupervisorProfile, assigned: &Roster<StudentSubmission>) -> Result<Vec<ReportRow>, Notice> {
    require_approved(profile)?;
    Ok(assigned
        .items()
        .iter()
        .map(|s| ReportRow {
            student_id: s.student_id.clone(),
            full_name: s.full_name.clone(),
            email: s.email.clone(),
            download_url: s.download_url.clone(),
        })
        .collect())
}
