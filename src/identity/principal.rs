use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

use super::profile::{AdminProfile, CompanyProfile, RoleProfile, StudentProfile, SupervisorProfile};
use super::role::Role;

/// Keys that only another role's payload carries. Serde skips unknown fields, so without this a
/// student payload would still satisfy the smaller supervisor and admin shapes.
fn foreign_keys(role: Role) -> &'static [&'static str] {
    match role {
        Role::Student => &["companyName"],
        Role::Supervisor => &["studentId", "icNumber", "companyName"],
        Role::Company => &["studentId", "icNumber", "fullName"],
        Role::Admin => &["studentId", "icNumber", "fullName", "companyName"],
    }
}

/// The authenticated profile of one role. Built once, at the gate boundary, from the payload
/// of the identity endpoint (or a login response) for the page's declared role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum Identity {
    Student(StudentProfile),
    Supervisor(SupervisorProfile),
    Company(CompanyProfile),
    Admin(AdminProfile),
}

impl Identity {
    /// Decode a raw payload as the shape of `role`. A payload that does not fit the role's
    /// shape is rejected rather than coerced into another role.
    pub fn decode(role: Role, payload: Value) -> AppResult<Identity> {
        if payload.is_null() {
            return Err(AppError::auth("no_identity", "Response carried no identity"));
        }
        if let Some(key) = foreign_keys(role).iter().find(|k| payload.get(**k).is_some()) {
            return Err(AppError::auth(
                "identity_shape",
                format!("Identity payload is not a {role} profile: carries '{key}'"),
            ));
        }
        let decoded = match role {
            Role::Student => serde_json::from_value(payload).map(Identity::Student),
            Role::Supervisor => serde_json::from_value(payload).map(Identity::Supervisor),
            Role::Company => serde_json::from_value(payload).map(Identity::Company),
            Role::Admin => serde_json::from_value(payload).map(Identity::Admin),
        };
        decoded.map_err(|e| AppError::auth("identity_shape", format!("Identity payload is not a {role} profile: {e}")))
    }

    pub fn role(&self) -> Role {
        match self {
            Identity::Student(_) => Role::Student,
            Identity::Supervisor(_) => Role::Supervisor,
            Identity::Company(_) => Role::Company,
            Identity::Admin(_) => Role::Admin,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Identity::Student(p) => p.email(),
            Identity::Supervisor(p) => p.email(),
            Identity::Company(p) => p.email(),
            Identity::Admin(p) => p.email(),
        }
    }

    /// Typed view of the identity; `None` when it belongs to another role.
    pub fn profile<P: RoleProfile>(&self) -> Option<&P> {
        P::project(self)
    }

    pub fn display_name(&self) -> &str {
        match self {
            Identity::Student(p) => &p.full_name,
            Identity::Supervisor(p) => &p.full_name,
            Identity::Company(p) => &p.company_name,
            Identity::Admin(p) => &p.email,
        }
    }
}
