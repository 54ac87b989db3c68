use serde::Serialize;

use crate::client::PortalClient;
use crate::error::{AppError, AppResult, Notification};
use crate::gate::{internship_stage, require_supervisor, Notice};
use crate::identity::{Internship, StudentProfile, SupervisorRef};
use crate::records::{CompanyRow, InternshipForm, ProgressReport};
use crate::roster::Roster;
use crate::validate::Validate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReportContent {
    pub supervisor: SupervisorRef,
    pub internship: Internship,
    pub report: ProgressReport,
}

/// The report metadata only shows once the student is assigned and the internship is approved,
/// whatever the report endpoint returned.
pub fn progress_report(profile: &StudentProfile, report: &ProgressReport) -> Result<ProgressReportContent, Notice> {
    let supervisor = require_supervisor(profile)?;
    let internship = internship_stage(profile)?;
    Ok(ProgressReportContent { supervisor: supervisor.clone(), internship: internship.clone(), report: report.clone() })
}

/// Fetch the report metadata. On failure the page shows "no report" and a notification.
pub async fn load_progress_report(client: &PortalClient) -> (ProgressReport, Option<Notification>) {
    match client.progress_report().await.map_err(AppError::from).and_then(|env| env.into_result()) {
        Ok(report) => (report.unwrap_or_default(), None),
        Err(e) => (ProgressReport::default(), Some(e.notification())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitInternshipContent {
    pub companies: Vec<CompanyRow>,
    /// The current submission, which the form starts from.
    pub current: Option<Internship>,
}

#[derive(Debug, Default)]
pub struct SubmitInternshipPage {
    pub companies: Roster<CompanyRow>,
}

impl SubmitInternshipPage {
    pub async fn load(client: &PortalClient) -> (Self, Option<Notification>) {
        let (companies, note) = Roster::load(client.list_companies().await);
        (Self { companies }, note)
    }

    pub fn content(&self, profile: &StudentProfile) -> Result<SubmitInternshipContent, Notice> {
        require_supervisor(profile)?;
        Ok(SubmitInternshipContent { companies: self.companies.items().to_vec(), current: profile.internship.clone() })
    }

    /// Create or resubmit the internship. A resubmission goes back to `SUBMITTED` server-side;
    /// the page picks that up on its next mount.
    pub async fn submit(&self, client: &PortalClient, form: &InternshipForm) -> AppResult<Notification> {
        form.validate()?;
        if !self.companies.is_empty() && self.companies.get(form.company_email.trim()).is_none() {
            return Err(AppError::validation("unknown_company", "Please select a company"));
        }
        let env = client.submit_internship(form).await?;
        env.into_result()?;
        Ok(Notification::success("Internship submitted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{CompanyRef, InternshipStatus};
    use chrono::Utc;

    fn profile(supervised: bool, status: Option<InternshipStatus>) -> StudentProfile {
        StudentProfile {
            email: "s@uni.edu".into(),
            student_id: "21WMR02965".into(),
            full_name: "Oh Boon".into(),
            created_at: None,
            supervisor: supervised.then(|| SupervisorRef { email: "t@uni.edu".into(), full_name: "Dr T".into() }),
            internship: status.map(|status| Internship {
                id: "i-1".into(),
                status,
                company: CompanyRef { company_name: "Acme".into(), email: "hr@acme.io".into() },
                start_date: Utc::now(),
                end_date: Utc::now(),
                allowance: 500.0,
                created_at: None,
                com_supervisor_name: "Jane".into(),
                com_supervisor_email: "jane@acme.io".into(),
            }),
        }
    }

    fn report() -> ProgressReport {
        ProgressReport { download_url: Some("https://files.example.com/r.pdf".into()), uploaded_at: Some(Utc::now()) }
    }

    #[test]
    fn report_hidden_without_internship() {
        assert_eq!(progress_report(&profile(true, None), &report()).unwrap_err(), Notice::InternshipNotSubmitted);
    }

    #[test]
    fn assignment_checked_first() {
        assert_eq!(progress_report(&profile(false, None), &report()).unwrap_err(), Notice::NotAssigned);
    }

    #[test]
    fn approved_internship_shows_report() {
        let c = progress_report(&profile(true, Some(InternshipStatus::Approved)), &report()).unwrap();
        assert!(c.report.download_url.is_some());
        assert_eq!(c.supervisor.full_name, "Dr T");
    }

    #[test]
    fn submission_form_needs_supervisor() {
        let page = SubmitInternshipPage::default();
        assert_eq!(page.content(&profile(false, None)).unwrap_err(), Notice::NotAssigned);
        let c = page.content(&profile(true, Some(InternshipStatus::Rejected))).unwrap();
        assert_eq!(c.current.map(|i| i.status), Some(InternshipStatus::Rejected));
    }
}
