//! The portal's pages: where they live, which role gates them, and the content each one renders
//! once its gate lets the session through.
//!
//! Content functions take the typed profile of their role and return either the content value or
//! a blocking [`Notice`](crate::gate::Notice); they are meant to be passed to
//! [`ViewGate::render`](crate::gate::ViewGate::render). Page state (rosters, fetched metadata)
//! is loaded by the page itself and mutated only by that page's confirmed actions.

pub mod admin;
pub mod company;
pub mod student;
pub mod supervisor;

use serde::Serialize;
use tracing::info;

use crate::client::PortalClient;
use crate::error::{AppResult, Notification};
use crate::gate::{PageSpec, ViewGate};
use crate::identity::{AdminProfile, CompanyProfile, Identity, Role, StudentProfile, SupervisorProfile};
use crate::resolver::PageMount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry {
    pub path: &'static str,
    /// Navigation group; a role's page key for gated pages.
    pub key: &'static str,
    pub title: &'static str,
}

const fn page(path: &'static str, key: &'static str, title: &'static str) -> PageEntry {
    PageEntry { path, key, title }
}

pub const CATALOGUE: &[PageEntry] = &[
    page("/", "/", "Home"),
    page("/announcement", "/announcement", "Announcements"),
    page("/jobboard", "/jobboard", "Job Board"),
    page("/student/auth", "/student", "Student Profile"),
    page("/student/submit-internship", "/student", "Submit Internship"),
    page("/student/progress-report", "/student", "Progress Report"),
    page("/supervisor/auth", "/supervisor", "Supervisor Profile"),
    page("/supervisor/my-students", "/supervisor", "My Students"),
    page("/supervisor/progress-report", "/supervisor", "Progress Report"),
    page("/company/auth", "/company", "Company Profile"),
    page("/company/manage-jobs", "/company", "Manage Jobs"),
    page("/admin/auth", "/admin", "Admin Profile"),
    page("/admin/supervisor-list", "/admin", "Supervisor List"),
    page("/admin/company-list", "/admin", "Company List"),
    page("/admin/internship-submission", "/admin", "Internship Submission"),
    page("/admin/manage-announcement", "/admin", "Manage Announcement"),
];

pub fn lookup(path: &str) -> Option<&'static PageEntry> {
    let path = path.trim_end_matches('/');
    let path = if path.is_empty() { "/" } else { path };
    CATALOGUE.iter().find(|p| p.path == path)
}

impl PageEntry {
    pub fn role(&self) -> Option<Role> {
        Role::from_page_key(self.key)
    }

    /// Role pages supply a content renderer; the rest are plain bodies.
    pub fn spec(&self) -> PageSpec {
        match self.role() {
            Some(_) => PageSpec::content(self.key),
            None => PageSpec::body(self.key),
        }
    }

    pub fn gate(&self) -> AppResult<ViewGate> {
        ViewGate::new(self.spec())
    }
}

/// The authenticated view of a role's auth page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub greeting: String,
    pub rows: Vec<(&'static str, String)>,
    /// Approval badge for roles that need one.
    pub approved: Option<bool>,
}

impl From<&StudentProfile> for ProfileCard {
    fn from(p: &StudentProfile) -> Self {
        let mut rows = vec![
            ("Student ID", p.student_id.clone()),
            ("Email", p.email.clone()),
            ("Full Name", p.full_name.clone()),
        ];
        if let Some(sup) = &p.supervisor {
            rows.push(("Supervisor", format!("{} ({})", sup.full_name, sup.email)));
        }
        if let Some(i) = &p.internship {
            rows.push(("Internship", format!("{} at {}", i.status.as_str(), i.company.company_name)));
        }
        Self { greeting: format!("Welcome, {}", p.full_name), rows, approved: None }
    }
}

impl From<&SupervisorProfile> for ProfileCard {
    fn from(p: &SupervisorProfile) -> Self {
        Self {
            greeting: format!("Welcome, {}", p.full_name),
            rows: vec![("Email", p.email.clone()), ("Full Name", p.full_name.clone())],
            approved: Some(p.is_approved),
        }
    }
}

impl From<&CompanyProfile> for ProfileCard {
    fn from(p: &CompanyProfile) -> Self {
        Self {
            greeting: format!("Welcome, {}", p.company_name),
            rows: vec![("Email", p.email.clone()), ("Company Name", p.company_name.clone())],
            approved: Some(p.is_approved),
        }
    }
}

impl From<&AdminProfile> for ProfileCard {
    fn from(p: &AdminProfile) -> Self {
        Self { greeting: format!("Welcome, {}", p.email), rows: vec![("Email", p.email.clone())], approved: None }
    }
}

impl From<&Identity> for ProfileCard {
    fn from(identity: &Identity) -> Self {
        match identity {
            Identity::Student(p) => p.into(),
            Identity::Supervisor(p) => p.into(),
            Identity::Company(p) => p.into(),
            Identity::Admin(p) => p.into(),
        }
    }
}

/// Invalidate the role cookie and end the mount. The next mount of any page of that role
/// resolves to the login view.
pub async fn logout(client: &PortalClient, mount: &PageMount) -> AppResult<Notification> {
    let role = mount.role();
    let env = client.logout(role).await?;
    let note = env.notification();
    env.into_result()?;
    mount.unmount();
    info!(target: "session", %role, "logged out");
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_gates_role_pages_only() {
        for entry in CATALOGUE {
            let gate = entry.gate().unwrap();
            assert_eq!(gate.role(), entry.role(), "{}", entry.path);
            assert_eq!(gate.is_public(), entry.role().is_none());
        }
        assert_eq!(lookup("/jobboard/").unwrap().role(), None);
        assert_eq!(lookup("/admin/company-list").unwrap().role(), Some(Role::Admin));
        assert!(lookup("/nowhere").is_none());
    }

    #[test]
    fn profile_card_shows_approval() {
        let p = CompanyProfile { email: "hr@acme.io".into(), company_name: "Acme".into(), is_approved: false };
        let card = ProfileCard::from(&p);
        assert_eq!(card.greeting, "Welcome, Acme");
        assert_eq!(card.approved, Some(false));
    }
}
