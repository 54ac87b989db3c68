//! Client-side form rules. A form that fails here is never sent.

use crate::error::{AppError, AppResult};
use crate::identity::{LoginRequest, Role, SignupRequest};
use crate::records::{AnnouncementDraft, AnnouncementEdit, AssignStudent, InternshipForm, JobDraft, JobEdit};

pub trait Validate {
    fn validate(&self) -> AppResult<()>;
}

fn required(value: &str, message: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation("required", message));
    }
    Ok(())
}

fn email(value: &str, message: &str) -> AppResult<()> {
    required(value, message)?;
    let v = value.trim();
    let well_formed = match v.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !well_formed || v.chars().any(char::is_whitespace) {
        return Err(AppError::validation("invalid_email", format!("'{v}' is not a valid email")));
    }
    Ok(())
}

impl Validate for LoginRequest {
    fn validate(&self) -> AppResult<()> {
        match self.role {
            Role::Student => {
                email(&self.email, "Please enter student email")?;
                required(&self.secret, "Please enter IC number")
            }
            Role::Supervisor | Role::Company | Role::Admin => {
                email(&self.email, "Please enter email")?;
                required(&self.secret, "Please enter password")
            }
        }
    }
}

impl Validate for SignupRequest {
    fn validate(&self) -> AppResult<()> {
        match self {
            SignupRequest::Student { student_id, full_name, email: e, ic_number } => {
                required(student_id, "Please enter student ID")?;
                email(e, "Please enter student email")?;
                required(full_name, "Please enter full name")?;
                required(ic_number, "Please enter IC number")
            }
            SignupRequest::Supervisor { full_name, email: e, password } => {
                required(full_name, "Please enter full name")?;
                email(e, "Please enter email")?;
                required(password, "Please enter password")
            }
            SignupRequest::Company { company_name, email: e, password } => {
                required(company_name, "Please enter company name")?;
                email(e, "Please enter email")?;
                required(password, "Please enter password")
            }
        }
    }
}

impl Validate for AnnouncementDraft {
    fn validate(&self) -> AppResult<()> {
        required(&self.title, "Please enter title")?;
        required(&self.content, "Please enter content")
    }
}

impl Validate for AnnouncementEdit {
    fn validate(&self) -> AppResult<()> {
        required(&self.id, "Announcement id is missing")?;
        required(&self.title, "Please enter title")?;
        required(&self.content, "Please enter content")
    }
}

impl Validate for JobDraft {
    fn validate(&self) -> AppResult<()> {
        required(&self.title, "Please enter job title")?;
        required(&self.location, "Please enter location")?;
        required(&self.salary, "Please enter salary")?;
        required(&self.description, "Please enter description")
    }
}

impl Validate for JobEdit {
    fn validate(&self) -> AppResult<()> {
        required(&self.job_id, "Job id is missing")?;
        JobDraft {
            title: self.title.clone(),
            location: self.location.clone(),
            salary: self.salary.clone(),
            description: self.description.clone(),
        }
        .validate()
    }
}

impl Validate for AssignStudent {
    fn validate(&self) -> AppResult<()> {
        required(&self.student_id, "Please select a student")
    }
}

impl Validate for InternshipForm {
    fn validate(&self) -> AppResult<()> {
        email(&self.company_email, "Please select a company")?;
        required(&self.com_supervisor_name, "Please enter company supervisor name")?;
        email(&self.com_supervisor_email, "Please enter company supervisor email")?;
        if self.end_date <= self.start_date {
            return Err(AppError::validation("date_order", "End date must be after start date"));
        }
        if !self.allowance.is_finite() || self.allowance < 0.0 {
            return Err(AppError::validation("allowance", "Allowance must be zero or more"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn internship() -> InternshipForm {
        InternshipForm {
            start_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap(),
            company_email: "hr@acme.io".into(),
            allowance: 800.0,
            com_supervisor_name: "Jane".into(),
            com_supervisor_email: "jane@acme.io".into(),
        }
    }

    #[test]
    fn login_messages_follow_role() {
        let err = LoginRequest::new(Role::Student, "s@uni.edu", " ").validate().unwrap_err();
        assert_eq!(err.message(), "Please enter IC number");
        let err = LoginRequest::new(Role::Admin, "", "pw").validate().unwrap_err();
        assert_eq!(err.message(), "Please enter email");
        assert!(LoginRequest::new(Role::Company, "hr@acme.io", "pw").validate().is_ok());
    }

    #[test]
    fn email_shape() {
        for bad in ["plain", "a@b", "@uni.edu", "a b@uni.edu", "a@.edu"] {
            assert!(email(bad, "x").is_err(), "{bad} should be rejected");
        }
        assert!(email("first.last@student.tarc.edu.my", "x").is_ok());
    }

    #[test]
    fn internship_dates_and_allowance() {
        assert!(internship().validate().is_ok());

        let mut f = internship();
        f.end_date = f.start_date;
        assert_eq!(f.validate().unwrap_err().code_str(), "date_order");

        let mut f = internship();
        f.allowance = -1.0;
        assert_eq!(f.validate().unwrap_err().code_str(), "allowance");
    }

    #[test]
    fn validation_errors_are_local() {
        let err = JobDraft { title: "".into(), location: "KL".into(), salary: "1k".into(), description: "d".into() }
            .validate()
            .unwrap_err();
        assert!(!err.reached_network());
    }
}
