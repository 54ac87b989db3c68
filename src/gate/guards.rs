//! Secondary gates applied to an authenticated identity before page content.

use serde::Serialize;

use crate::error::NotificationLevel;
use crate::identity::{Approvable, Internship, InternshipStatus, StudentProfile, SupervisorRef};

pub const STUDENT_PROFILE_PATH: &str = "/student/auth";
pub const SUBMIT_INTERNSHIP_PATH: &str = "/student/submit-internship";

/// A blocking notice shown in place of page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    NotAssigned,
    PendingApproval,
    InternshipNotSubmitted,
    InternshipProcessing,
    InternshipRejected,
}

impl Notice {
    pub fn title(self) -> &'static str {
        match self {
            Notice::NotAssigned => "You are not assigned to a supervisor yet",
            Notice::PendingApproval => "Your account is not approved yet",
            Notice::InternshipNotSubmitted => "You have not submitted your internship application",
            Notice::InternshipProcessing => "Your internship application is still being processed",
            Notice::InternshipRejected => "Your internship application is rejected",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Notice::NotAssigned => "Please contact the internship office to be assigned a supervisor.",
            Notice::PendingApproval => "An administrator has to approve your account before you can continue.",
            Notice::InternshipNotSubmitted => "Submit your internship details first.",
            Notice::InternshipProcessing => "You will be able to continue once it has been approved.",
            Notice::InternshipRejected => "Please review and resubmit your internship details.",
        }
    }

    /// Where the notice sends the user, if anywhere, with the link text.
    pub fn link(self) -> Option<(&'static str, &'static str)> {
        match self {
            Notice::PendingApproval => None,
            Notice::NotAssigned | Notice::InternshipNotSubmitted => Some((STUDENT_PROFILE_PATH, "View Profile")),
            Notice::InternshipProcessing | Notice::InternshipRejected => Some((SUBMIT_INTERNSHIP_PATH, "View Submission")),
        }
    }

    pub fn level(self) -> NotificationLevel {
        match self {
            Notice::InternshipRejected => NotificationLevel::Error,
            _ => NotificationLevel::Info,
        }
    }
}

pub fn require_supervisor(student: &StudentProfile) -> Result<&SupervisorRef, Notice> {
    student.supervisor.as_ref().ok_or(Notice::NotAssigned)
}

pub fn require_approved<P: Approvable>(profile: &P) -> Result<(), Notice> {
    if profile.is_approved() { Ok(()) } else { Err(Notice::PendingApproval) }
}

/// Only an approved internship lets internship-dependent content through.
pub fn internship_stage(student: &StudentProfile) -> Result<&Internship, Notice> {
    let internship = student.internship.as_ref().ok_or(Notice::InternshipNotSubmitted)?;
    match internship.status {
        InternshipStatus::Approved => Ok(internship),
        InternshipStatus::Submitted => Err(Notice::InternshipProcessing),
        InternshipStatus::Rejected => Err(Notice::InternshipRejected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{CompanyRef, SupervisorProfile};
    use chrono::Utc;

    fn student(status: Option<InternshipStatus>) -> StudentProfile {
        StudentProfile {
            email: "s@uni.edu".into(),
            student_id: "21WMR02965".into(),
            full_name: "Oh Boon".into(),
            created_at: None,
            supervisor: None,
            internship: status.map(|status| Internship {
                id: "i-1".into(),
                status,
                company: CompanyRef { company_name: "Acme".into(), email: "hr@acme.io".into() },
                start_date: Utc::now(),
                end_date: Utc::now(),
                allowance: 0.0,
                created_at: None,
                com_supervisor_name: String::new(),
                com_supervisor_email: String::new(),
            }),
        }
    }

    #[test]
    fn internship_stages() {
        assert_eq!(internship_stage(&student(None)).unwrap_err(), Notice::InternshipNotSubmitted);
        assert_eq!(internship_stage(&student(Some(InternshipStatus::Submitted))).unwrap_err(), Notice::InternshipProcessing);
        assert_eq!(internship_stage(&student(Some(InternshipStatus::Rejected))).unwrap_err(), Notice::InternshipRejected);
        assert!(internship_stage(&student(Some(InternshipStatus::Approved))).is_ok());
    }

    #[test]
    fn notices_link_to_submission() {
        assert_eq!(Notice::InternshipRejected.link().map(|l| l.0), Some(SUBMIT_INTERNSHIP_PATH));
        assert_eq!(Notice::InternshipNotSubmitted.link().map(|l| l.0), Some(STUDENT_PROFILE_PATH));
        assert_eq!(Notice::PendingApproval.link(), None);
    }

    #[test]
    fn approval_and_assignment() {
        let sup = SupervisorProfile { email: "t@uni.edu".into(), full_name: "Dr T".into(), is_approved: false };
        assert_eq!(require_approved(&sup), Err(Notice::PendingApproval));
        assert_eq!(require_supervisor(&student(None)).unwrap_err(), Notice::NotAssigned);
    }
}
