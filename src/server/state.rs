//! In-memory store behind the reference backend, and the shared handler state.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;

use crate::config::PortalConfig;
use crate::identity::{
    AdminProfile, CompanyProfile, CompanyRef, Internship, InternshipStatus, Role, StudentProfile, SupervisorProfile,
    SupervisorRef,
};
use crate::records::{Announcement, CompanyRow, Job, ProgressReport, StudentRow, StudentSubmission, SupervisorRow};

use super::security::hash_secret;
use super::sessions::SessionManager;

#[derive(Debug, Clone)]
pub struct InternshipRecord {
    pub id: String,
    pub status: InternshipStatus,
    pub company_email: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub allowance: f64,
    pub created_at: DateTime<Utc>,
    pub com_supervisor_name: String,
    pub com_supervisor_email: String,
}

#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub ic_hash: String,
    pub created_at: DateTime<Utc>,
    pub supervisor_email: Option<String>,
    pub internship: Option<InternshipRecord>,
    pub progress_report: Option<ProgressReport>,
}

#[derive(Debug, Clone)]
pub struct SupervisorRecord {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CompanyRecord {
    pub email: String,
    pub company_name: String,
    pub password_hash: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AdminRecord {
    pub email: String,
    pub password_hash: String,
}

/// Accounts are keyed by email. Announcements and jobs are kept newest first.
#[derive(Debug, Default)]
pub struct Store {
    pub students: BTreeMap<String, StudentRecord>,
    pub supervisors: BTreeMap<String, SupervisorRecord>,
    pub companies: BTreeMap<String, CompanyRecord>,
    pub admins: BTreeMap<String, AdminRecord>,
    pub announcements: Vec<Announcement>,
    pub jobs: Vec<Job>,
}

impl Store {
    pub fn has_account(&self, role: Role, email: &str) -> bool {
        match role {
            Role::Student => self.students.contains_key(email),
            Role::Supervisor => self.supervisors.contains_key(email),
            Role::Company => self.companies.contains_key(email),
            Role::Admin => self.admins.contains_key(email),
        }
    }

    /// Stored secret hash of an account.
    pub fn secret_hash(&self, role: Role, email: &str) -> Option<&str> {
        match role {
            Role::Student => self.students.get(email).map(|s| s.ic_hash.as_str()),
            Role::Supervisor => self.supervisors.get(email).map(|s| s.password_hash.as_str()),
            Role::Company => self.companies.get(email).map(|c| c.password_hash.as_str()),
            Role::Admin => self.admins.get(email).map(|a| a.password_hash.as_str()),
        }
    }

    /// The identity payload `/me` and login answer with.
    pub fn identity_payload(&self, role: Role, email: &str) -> Option<Value> {
        let value = match role {
            Role::Student => serde_json::to_value(self.student_profile(self.students.get(email)?)),
            Role::Supervisor => {
                let s = self.supervisors.get(email)?;
                serde_json::to_value(SupervisorProfile {
                    email: s.email.clone(),
                    full_name: s.full_name.clone(),
                    is_approved: s.is_approved,
                })
            }
            Role::Company => {
                let c = self.companies.get(email)?;
                serde_json::to_value(CompanyProfile {
                    email: c.email.clone(),
                    company_name: c.company_name.clone(),
                    is_approved: c.is_approved,
                })
            }
            Role::Admin => serde_json::to_value(AdminProfile { email: self.admins.get(email)?.email.clone() }),
        };
        value.ok()
    }

    pub fn student_profile(&self, s: &StudentRecord) -> StudentProfile {
        StudentProfile {
            email: s.email.clone(),
            student_id: s.student_id.clone(),
            full_name: s.full_name.clone(),
            created_at: Some(s.created_at),
            supervisor: s.supervisor_email.as_ref().and_then(|e| self.supervisors.get(e)).map(|sup| SupervisorRef {
                email: sup.email.clone(),
                full_name: sup.full_name.clone(),
            }),
            internship: s.internship.as_ref().map(|i| self.internship(i)),
        }
    }

    pub fn internship(&self, i: &InternshipRecord) -> Internship {
        let company_name = self.companies.get(&i.company_email).map(|c| c.company_name.clone()).unwrap_or_default();
        Internship {
            id: i.id.clone(),
            status: i.status,
            company: CompanyRef { company_name, email: i.company_email.clone() },
            start_date: i.start_date,
            end_date: i.end_date,
            allowance: i.allowance,
            created_at: Some(i.created_at),
            com_supervisor_name: i.com_supervisor_name.clone(),
            com_supervisor_email: i.com_supervisor_email.clone(),
        }
    }

    pub fn submission(&self, s: &StudentRecord) -> StudentSubmission {
        StudentSubmission {
            student_id: s.student_id.clone(),
            full_name: s.full_name.clone(),
            email: s.email.clone(),
            internship: s.internship.as_ref().map(|i| self.internship(i)),
            download_url: s.progress_report.as_ref().and_then(|r| r.download_url.clone()),
        }
    }

    pub fn student_rows(&self) -> Vec<StudentRow> {
        let mut rows: Vec<&StudentRecord> = self.students.values().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.into_iter()
            .map(|s| StudentRow {
                student_id: s.student_id.clone(),
                full_name: s.full_name.clone(),
                email: s.email.clone(),
                created_at: Some(s.created_at),
            })
            .collect()
    }

    pub fn supervisor_rows(&self) -> Vec<SupervisorRow> {
        let mut rows: Vec<&SupervisorRecord> = self.supervisors.values().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.into_iter()
            .map(|s| SupervisorRow {
                email: s.email.clone(),
                full_name: s.full_name.clone(),
                is_approved: s.is_approved,
                created_at: Some(s.created_at),
            })
            .collect()
    }

    pub fn company_rows(&self) -> Vec<CompanyRow> {
        let mut rows: Vec<&CompanyRecord> = self.companies.values().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.into_iter()
            .map(|c| CompanyRow {
                email: c.email.clone(),
                company_name: c.company_name.clone(),
                is_approved: c.is_approved,
                created_at: Some(c.created_at),
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub sessions: Arc<SessionManager>,
    pub cookie_secure: bool,
}

impl AppState {
    /// Empty store with the configured admin account.
    pub fn new(config: &PortalConfig) -> anyhow::Result<Self> {
        let mut store = Store::default();
        let password_hash = hash_secret(&config.admin_password).context("While hashing the seeded admin password")?;
        store.admins.insert(
            config.admin_email.clone(),
            AdminRecord { email: config.admin_email.clone(), password_hash },
        );
        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            sessions: Arc::new(SessionManager::new(config.session_ttl)),
            cookie_secure: config.cookie_secure,
        })
    }
}
