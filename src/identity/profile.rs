//! Role-specific identity payloads as the backend emits them (camelCase on the wire).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::principal::Identity;
use super::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InternshipStatus {
    Submitted,
    Approved,
    Rejected,
}

impl InternshipStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InternshipStatus::Submitted => "SUBMITTED",
            InternshipStatus::Approved => "APPROVED",
            InternshipStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub company_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorRef {
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub id: String,
    pub status: InternshipStatus,
    pub company: CompanyRef,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub allowance: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub com_supervisor_name: String,
    #[serde(default)]
    pub com_supervisor_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub email: String,
    pub student_id: String,
    pub full_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub supervisor: Option<SupervisorRef>,
    #[serde(default)]
    pub internship: Option<Internship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorProfile {
    pub email: String,
    pub full_name: String,
    // Absent means not approved: the pending notice must win over missing data.
    #[serde(default)]
    pub is_approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub email: String,
    pub company_name: String,
    #[serde(default)]
    pub is_approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub email: String,
}

/// A profile shape bound to exactly one role. Page content is written against a concrete
/// profile type, so a renderer can only ever be handed the identity of its own role.
pub trait RoleProfile: Sized {
    const ROLE: Role;

    fn project(identity: &Identity) -> Option<&Self>;

    fn email(&self) -> &str;
}

/// Profiles whose accounts need an admin's approval before the portal opens up.
pub trait Approvable {
    fn is_approved(&self) -> bool;
}

impl RoleProfile for StudentProfile {
    const ROLE: Role = Role::Student;
    fn project(identity: &Identity) -> Option<&Self> {
        match identity { Identity::Student(p) => Some(p), _ => None }
    }
    fn email(&self) -> &str { &self.email }
}

impl RoleProfile for SupervisorProfile {
    const ROLE: Role = Role::Supervisor;
    fn project(identity: &Identity) -> Option<&Self> {
        match identity { Identity::Supervisor(p) => Some(p), _ => None }
    }
    fn email(&self) -> &str { &self.email }
}

impl RoleProfile for CompanyProfile {
    const ROLE: Role = Role::Company;
    fn project(identity: &Identity) -> Option<&Self> {
        match identity { Identity::Company(p) => Some(p), _ => None }
    }
    fn email(&self) -> &str { &self.email }
}

impl RoleProfile for AdminProfile {
    const ROLE: Role = Role::Admin;
    fn project(identity: &Identity) -> Option<&Self> {
        match identity { Identity::Admin(p) => Some(p), _ => None }
    }
    fn email(&self) -> &str { &self.email }
}

impl Approvable for SupervisorProfile {
    fn is_approved(&self) -> bool { self.is_approved }
}

impl Approvable for CompanyProfile {
    fn is_approved(&self) -> bool { self.is_approved }
}
