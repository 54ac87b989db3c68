use serde_json::{json, Value};

use super::role::Role;

/// Email plus the role's secret (IC number for students, password otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub role: Role,
    pub email: String,
    pub secret: String,
}

impl LoginRequest {
    pub fn new(role: Role, email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { role, email: email.into(), secret: secret.into() }
    }

    /// Request body with the secret under the role's wire name.
    pub fn body(&self) -> Value {
        let mut body = json!({ "email": self.email.trim() });
        body[self.role.credential_field()] = Value::String(self.secret.clone());
        body
    }
}

/// Self-registration forms. Admins have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupRequest {
    Student { student_id: String, full_name: String, email: String, ic_number: String },
    Supervisor { full_name: String, email: String, password: String },
    Company { company_name: String, email: String, password: String },
}

impl SignupRequest {
    pub fn role(&self) -> Role {
        match self {
            SignupRequest::Student { .. } => Role::Student,
            SignupRequest::Supervisor { .. } => Role::Supervisor,
            SignupRequest::Company { .. } => Role::Company,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            SignupRequest::Student { email, .. }
            | SignupRequest::Supervisor { email, .. }
            | SignupRequest::Company { email, .. } => email,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            SignupRequest::Student { student_id, full_name, email, ic_number } => json!({
                "studentId": student_id.trim(),
                "fullName": full_name.trim(),
                "email": email.trim(),
                "icNumber": ic_number,
            }),
            SignupRequest::Supervisor { full_name, email, password } => json!({
                "fullName": full_name.trim(),
                "email": email.trim(),
                "password": password,
            }),
            SignupRequest::Company { company_name, email, password } => json!({
                "companyName": company_name.trim(),
                "email": email.trim(),
                "password": password,
            }),
        }
    }
}
