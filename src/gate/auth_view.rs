//! The logged-out view of a role page: one description parameterized by role.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::identity::{LoginRequest, Role, SignupRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Secret,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FormField {
    FormField { name, label, kind }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthTab {
    Login,
    Signup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthView {
    pub role: Role,
    pub heading: String,
    pub tabs: Vec<AuthTab>,
    pub login_fields: Vec<FormField>,
    pub signup_fields: Vec<FormField>,
}

impl AuthView {
    pub fn for_role(role: Role) -> Self {
        let secret = match role {
            Role::Student => field("icNumber", "IC Number", FieldKind::Secret),
            Role::Supervisor | Role::Company | Role::Admin => field("password", "Password", FieldKind::Secret),
        };
        let login_fields = vec![field("email", "Email", FieldKind::Email), secret];
        let signup_fields = match role {
            Role::Student => vec![
                field("studentId", "Student ID", FieldKind::Text),
                field("fullName", "Full Name", FieldKind::Text),
                field("email", "Student Email", FieldKind::Email),
                field("icNumber", "IC Number", FieldKind::Secret),
            ],
            Role::Supervisor => vec![
                field("fullName", "Full Name", FieldKind::Text),
                field("email", "Email", FieldKind::Email),
                field("password", "Password", FieldKind::Secret),
            ],
            Role::Company => vec![
                field("companyName", "Company Name", FieldKind::Text),
                field("email", "Email", FieldKind::Email),
                field("password", "Password", FieldKind::Secret),
            ],
            Role::Admin => Vec::new(),
        };
        let tabs = if role.allows_signup() { vec![AuthTab::Login, AuthTab::Signup] } else { vec![AuthTab::Login] };
        Self { role, heading: format!("{} Portal", role.title()), tabs, login_fields, signup_fields }
    }

    pub fn has_signup(&self) -> bool {
        self.tabs.contains(&AuthTab::Signup)
    }

    /// Build the login request from the form's values, keyed by field name.
    pub fn login_request(&self, values: &BTreeMap<String, String>) -> LoginRequest {
        let get = |k: &str| values.get(k).cloned().unwrap_or_default();
        LoginRequest::new(self.role, get("email"), get(self.role.credential_field()))
    }

    pub fn signup_request(&self, values: &BTreeMap<String, String>) -> AppResult<SignupRequest> {
        let get = |k: &str| values.get(k).cloned().unwrap_or_default();
        match self.role {
            Role::Student => Ok(SignupRequest::Student {
                student_id: get("studentId"),
                full_name: get("fullName"),
                email: get("email"),
                ic_number: get("icNumber"),
            }),
            Role::Supervisor => Ok(SignupRequest::Supervisor {
                full_name: get("fullName"),
                email: get("email"),
                password: get("password"),
            }),
            Role::Company => Ok(SignupRequest::Company {
                company_name: get("companyName"),
                email: get("email"),
                password: get("password"),
            }),
            Role::Admin => Err(AppError::user("signup_unavailable", "Admin accounts cannot sign up")),
        }
    }
}
