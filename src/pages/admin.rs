//! Admin pages. Admins have no secondary gates: an authenticated admin sees every list.

use crate::client::PortalClient;
use crate::error::{AppResult, Notification};
use crate::identity::InternshipStatus;
use crate::records::{Announcement, AnnouncementDraft, AnnouncementEdit, CompanyRow, StudentSubmission, SupervisorRow};
use crate::roster::Roster;
use crate::validate::Validate;

/// `/admin/supervisor-list`.
#[derive(Debug, Default)]
pub struct SupervisorListPage {
    pub supervisors: Roster<SupervisorRow>,
}

impl SupervisorListPage {
    pub async fn load(client: &PortalClient) -> (Self, Option<Notification>) {
        let (supervisors, note) = Roster::load(client.list_supervisors().await);
        (Self { supervisors }, note)
    }

    pub async fn approve(&mut self, client: &PortalClient, email: &str) -> AppResult<Notification> {
        let reply = client.approve_supervisor(email).await;
        self.supervisors.confirm(reply, |rows, _| {
            rows.update(email, |s| s.is_approved = true);
        })
    }
}

/// `/admin/company-list`.
#[derive(Debug, Default)]
pub struct CompanyListPage {
    pub companies: Roster<CompanyRow>,
}

impl CompanyListPage {
    pub async fn load(client: &PortalClient) -> (Self, Option<Notification>) {
        let (companies, note) = Roster::load(client.list_companies().await);
        (Self { companies }, note)
    }

    /// Only the row with `email` changes, and only once the backend confirmed.
    pub async fn approve(&mut self, client: &PortalClient, email: &str) -> AppResult<Notification> {
        let reply = client.approve_company(email).await;
        self.companies.confirm(reply, |rows, _| {
            rows.update(email, |c| c.is_approved = true);
        })
    }
}

/// `/admin/internship-submission`: review queue of students' internships.
#[derive(Debug, Default)]
pub struct InternshipSubmissionPage {
    pub submissions: Roster<StudentSubmission>,
}

impl InternshipSubmissionPage {
    pub async fn load(client: &PortalClient) -> (Self, Option<Notification>) {
        let (submissions, note) = Roster::load(client.list_submissions().await);
        (Self { submissions }, note)
    }

    pub fn pending(&self) -> impl Iterator<Item = &StudentSubmission> {
        self.submissions
            .items()
            .iter()
            .filter(|s| s.internship.as_ref().is_some_and(|i| i.status == InternshipStatus::Submitted))
    }

    pub async fn approve(&mut self, client: &PortalClient, internship_id: &str) -> AppResult<Notification> {
        let reply = client.approve_internship(internship_id).await;
        self.submissions
            .confirm(reply, |rows, _| set_status(rows, internship_id, InternshipStatus::Approved))
    }

    pub async fn reject(&mut self, client: &PortalClient, internship_id: &str) -> AppResult<Notification> {
        let reply = client.reject_internship(internship_id).await;
        self.submissions
            .confirm(reply, |rows, _| set_status(rows, internship_id, InternshipStatus::Rejected))
    }
}

fn set_status(rows: &mut Roster<StudentSubmission>, internship_id: &str, status: InternshipStatus) {
    rows.update_where(
        |s| s.internship.as_ref().is_some_and(|i| i.id == internship_id),
        |s| {
            if let Some(i) = s.internship.as_mut() {
                i.status = status;
            }
        },
    );
}

/// `/admin/manage-announcement`.
#[derive(Debug, Default)]
pub struct ManageAnnouncementsPage {
    pub announcements: Roster<Announcement>,
}

impl ManageAnnouncementsPage {
    pub async fn load(client: &PortalClient) -> (Self, Option<Notification>) {
        let (announcements, note) = Roster::load(client.list_announcements().await);
        (Self { announcements }, note)
    }

    pub async fn add(&mut self, client: &PortalClient, draft: &AnnouncementDraft) -> AppResult<Notification> {
        draft.validate()?;
        let reply = client.add_announcement(draft).await;
        self.announcements.confirm(reply, |rows, data| {
            if let Some(a) = data {
                rows.prepend(a);
            }
        })
    }

    pub async fn edit(&mut self, client: &PortalClient, edit: &AnnouncementEdit) -> AppResult<Notification> {
        edit.validate()?;
        let reply = client.edit_announcement(edit).await;
        self.announcements.confirm(reply, |rows, _| {
            rows.update(&edit.id, |a| {
                a.title = edit.title.clone();
                a.content = edit.content.clone();
            });
        })
    }

    pub async fn delete(&mut self, client: &PortalClient, id: &str) -> AppResult<Notification> {
        let reply = client.delete_announcement(id).await;
        self.announcements.confirm(reply, |rows, _| {
            rows.remove(id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{CompanyRef, Internship};
    use chrono::Utc;

    fn submission(email: &str, internship_id: &str) -> StudentSubmission {
        StudentSubmission {
            student_id: email.into(),
            full_name: email.into(),
            email: email.into(),
            internship: Some(Internship {
                id: internship_id.into(),
                status: InternshipStatus::Submitted,
                company: CompanyRef { company_name: "Acme".into(), email: "hr@acme.io".into() },
                start_date: Utc::now(),
                end_date: Utc::now(),
                allowance: 0.0,
                created_at: None,
                com_supervisor_name: String::new(),
                com_supervisor_email: String::new(),
            }),
            download_url: None,
        }
    }

    #[test]
    fn status_change_targets_one_internship() {
        let mut rows = Roster::new(vec![submission("a@uni.edu", "i-1"), submission("b@uni.edu", "i-2")]);
        set_status(&mut rows, "i-2", InternshipStatus::Rejected);
        let page = InternshipSubmissionPage { submissions: rows };
        let pending: Vec<_> = page.pending().map(|s| s.email.as_str()).collect();
        assert_eq!(pending, vec!["a@uni.edu"]);
        let b = page.submissions.get("b@uni.edu").unwrap();
        assert_eq!(b.internship.as_ref().unwrap().status, InternshipStatus::Rejected);
    }
}
