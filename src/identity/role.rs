use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four portals. Each has its own identity endpoint, cookie and authentication view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Supervisor,
    Company,
    Admin,
}

/// HTTP verb the backend expects on a role's identity endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMethod {
    Get,
    Post,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Supervisor, Role::Company, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Supervisor => "supervisor",
            Role::Company => "company",
            Role::Admin => "admin",
        }
    }

    /// Collection segment of the role's API routes (`/students/...`).
    pub fn collection(self) -> &'static str {
        match self {
            Role::Student => "students",
            Role::Supervisor => "supervisors",
            Role::Company => "companies",
            Role::Admin => "admins",
        }
    }

    /// Navigation key of the role's page group (`/student`).
    pub fn page_key(self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Supervisor => "/supervisor",
            Role::Company => "/company",
            Role::Admin => "/admin",
        }
    }

    pub fn from_page_key(key: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.page_key() == key)
    }

    pub fn cookie_name(self) -> String {
        format!("access_token_{}", self.as_str())
    }

    pub fn identity_method(self) -> IdentityMethod {
        match self {
            Role::Student | Role::Admin => IdentityMethod::Get,
            Role::Supervisor | Role::Company => IdentityMethod::Post,
        }
    }

    pub fn identity_path(self) -> String {
        format!("{}/me", self.collection())
    }

    pub fn login_path(self) -> String {
        format!("{}/login", self.collection())
    }

    pub fn logout_path(self) -> String {
        format!("{}/logout", self.collection())
    }

    pub fn signup_path(self) -> Option<String> {
        self.allows_signup().then(|| format!("{}/signup", self.collection()))
    }

    /// Admin accounts are provisioned, never self-registered.
    pub fn allows_signup(self) -> bool {
        !matches!(self, Role::Admin)
    }

    /// Wire name of the secret the login form sends next to the email.
    pub fn credential_field(self) -> &'static str {
        match self {
            Role::Student => "icNumber",
            Role::Supervisor | Role::Company | Role::Admin => "password",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Supervisor => "Supervisor",
            Role::Company => "Company",
            Role::Admin => "Admin",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('/').to_ascii_lowercase();
        let s = s.as_str();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s || r.collection() == s)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}
