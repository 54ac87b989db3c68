use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use gointern::client::{ClientError, IdentityBackend, PortalClient};
use gointern::config::PortalConfig;
use gointern::envelope::Envelope;
use gointern::gate::{Decision, Notice, View};
use gointern::identity::{InternshipStatus, LoginRequest, Role, SessionState, SignupRequest, StudentProfile, SupervisorProfile};
use gointern::pages::admin::{CompanyListPage, InternshipSubmissionPage, ManageAnnouncementsPage, SupervisorListPage};
use gointern::pages::company::ManageJobsPage;
use gointern::pages::{self, student, supervisor::MyStudentsPage};
use gointern::records::{AnnouncementDraft, AnnouncementEdit, AssignStudent, InternshipForm, JobDraft, JobEdit, ProgressReport};
use gointern::resolver::{PageMount, SessionResolver};
use gointern::server::{self, AppState};

const ADMIN_EMAIL: &str = "admin@gointern.test";
const ADMIN_PASSWORD: &str = "letmein";

async fn start_backend() -> Result<(String, AppState)> {
    let config = PortalConfig {
        cookie_secure: false,
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        ..PortalConfig::default()
    };
    let state = AppState::new(&config)?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(server::serve(listener, state.clone()));
    Ok((format!("http://{addr}/api"), state))
}

/// Counts identity checks so a test can tell whether login triggered a second one.
struct Counting {
    inner: PortalClient,
    fetches: AtomicUsize,
}

#[async_trait]
impl IdentityBackend for Counting {
    async fn fetch_identity(&self, role: Role) -> Result<Envelope<Value>, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_identity(role).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<Envelope<Value>, ClientError> {
        self.inner.login(req).await
    }
}

async fn signup_and_login(client: &PortalClient, signup: SignupRequest, secret: &str) -> Result<()> {
    let role = signup.role();
    let email = signup.email().to_string();
    client.signup(&signup).await?.into_result()?;
    client.login(&LoginRequest::new(role, email, secret)).await?.into_result()?;
    Ok(())
}

fn supervisor_signup(email: &str) -> SignupRequest {
    SignupRequest::Supervisor { full_name: "Dr Tan".into(), email: email.into(), password: "pw-sup".into() }
}

fn student_signup(id: &str, email: &str) -> SignupRequest {
    SignupRequest::Student { student_id: id.into(), full_name: "Lee Mei".into(), email: email.into(), ic_number: "990101-14-5678".into() }
}

#[tokio::test]
async fn logged_out_page_resolves_to_login_view() -> Result<()> {
    let (api, _state) = start_backend().await?;
    let resolver = SessionResolver::new(PortalClient::new(&api)?);
    let session = resolver.mount(Role::Supervisor).await;
    assert_eq!(session.state(), &SessionState::Anonymous);

    let gate = pages::lookup("/supervisor/my-students").expect("catalogued").gate()?;
    match gate.decide(Some(&session))? {
        Decision::Authenticate(view) => assert_eq!(view.role, Role::Supervisor),
        other => panic!("expected login view, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_does_not_stay_loading() -> Result<()> {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let resolver = Arc::new(SessionResolver::new(PortalClient::new(&format!("http://{addr}/api"))?));
    let mount = PageMount::new(Role::Company);
    let task = mount.spawn_resolution(resolver.clone()).expect("first resolution");
    assert!(task.await?);
    assert!(mount.spawn_resolution(resolver).is_none());
    assert_eq!(mount.snapshot().state(), &SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn login_adopts_identity_without_second_check() -> Result<()> {
    let (api, _state) = start_backend().await?;
    let backend = Counting { inner: PortalClient::new(&api)?, fetches: AtomicUsize::new(0) };
    let resolver = Arc::new(SessionResolver::new(backend));
    let mount = PageMount::new(Role::Admin);
    mount.spawn_resolution(resolver.clone()).expect("first resolution").await?;
    assert_eq!(mount.snapshot().state(), &SessionState::Anonymous);

    let wrong = mount.login(&*resolver, &LoginRequest::new(Role::Admin, ADMIN_EMAIL, "nope")).await;
    assert_eq!(wrong.unwrap_err().notification().message, "Invalid email or password");
    assert_eq!(mount.snapshot().state(), &SessionState::Anonymous);

    let note = mount.login(&*resolver, &LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?;
    assert_eq!(note.message, "Login successfully");
    let session = mount.snapshot();
    assert_eq!(session.identity().map(|i| i.email()), Some(ADMIN_EMAIL));
    assert_eq!(resolver.backend().fetches.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn pending_supervisor_is_blocked_from_my_students() -> Result<()> {
    let (api, _state) = start_backend().await?;
    let client = PortalClient::new(&api)?;
    signup_and_login(&client, supervisor_signup("tan@uni.test"), "pw-sup").await?;

    let session = SessionResolver::new(client.clone()).mount(Role::Supervisor).await;
    let gate = pages::lookup("/supervisor/my-students").expect("catalogued").gate()?;
    let (page, _notes) = MyStudentsPage::load(&client).await;
    let view = gate.render::<SupervisorProfile, _, _>(Some(&session), |p| page.content(p))?;
    assert_eq!(view, View::Blocked(Notice::PendingApproval));

    // The backend refuses the action too.
    let mut page = page;
    let refused = page.assign(&client, &AssignStudent { student_id: "S1".into() }).await;
    assert!(refused.is_err());
    assert!(page.assigned.is_empty());
    Ok(())
}

#[tokio::test]
async fn report_link_hidden_until_internship_exists() -> Result<()> {
    let (api, state) = start_backend().await?;
    let client = PortalClient::new(&api)?;
    signup_and_login(&client, student_signup("21WMR00001", "lee@uni.test"), "990101-14-5678").await?;
    {
        // An assigned student who never submitted an internship.
        let mut store = state.store.write();
        store.students.get_mut("lee@uni.test").expect("student").supervisor_email = Some("tan@uni.test".into());
        store.supervisors.insert(
            "tan@uni.test".into(),
            server::state::SupervisorRecord {
                email: "tan@uni.test".into(),
                full_name: "Dr Tan".into(),
                password_hash: String::new(),
                is_approved: true,
                created_at: Utc::now(),
            },
        );
    }

    let session = SessionResolver::new(client.clone()).mount(Role::Student).await;
    let gate = pages::lookup("/student/progress-report").expect("catalogued").gate()?;
    let (fetched, note) = student::load_progress_report(&client).await;
    assert_eq!(note.map(|n| n.message).as_deref(), Some("Student has not submitted internship"));
    assert_eq!(fetched, ProgressReport::default());

    let stale = ProgressReport { download_url: Some("https://files.test/report.pdf".into()), uploaded_at: None };
    let view = gate.render::<StudentProfile, _, _>(Some(&session), |p| student::progress_report(p, &stale))?;
    assert_eq!(view, View::Blocked(Notice::InternshipNotSubmitted));
    Ok(())
}

#[tokio::test]
async fn approving_company_changes_only_its_row() -> Result<()> {
    let (api, _state) = start_backend().await?;
    for (name, email) in [("Acme", "hr@acme.test"), ("Globex", "jobs@globex.test")] {
        let c = PortalClient::new(&api)?;
        let signup = SignupRequest::Company { company_name: name.into(), email: email.into(), password: "pw".into() };
        c.signup(&signup).await?.into_result()?;
    }
    let admin = PortalClient::new(&api)?;
    admin.login(&LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?.into_result()?;

    let (mut page, note) = CompanyListPage::load(&admin).await;
    assert!(note.is_none());
    assert_eq!(page.companies.len(), 2);
    page.approve(&admin, "hr@acme.test").await?;
    assert_eq!(page.companies.get("hr@acme.test").map(|c| c.is_approved), Some(true));
    assert_eq!(page.companies.get("jobs@globex.test").map(|c| c.is_approved), Some(false));

    // A refused approval leaves the roster untouched.
    let before = page.companies.clone();
    assert!(page.approve(&admin, "nobody@nowhere.test").await.is_err());
    assert_eq!(page.companies, before);
    Ok(())
}

#[tokio::test]
async fn student_cookie_does_not_open_admin_pages() -> Result<()> {
    let (api, _state) = start_backend().await?;
    let client = PortalClient::new(&api)?;
    signup_and_login(&client, student_signup("21WMR00002", "kim@uni.test"), "990101-14-5678").await?;

    let resolver = SessionResolver::new(client.clone());
    assert!(matches!(resolver.mount(Role::Student).await.state(), SessionState::Authenticated(_)));
    assert_eq!(resolver.mount(Role::Admin).await.state(), &SessionState::Anonymous);
    assert!(client.list_supervisors().await?.into_result().is_err());
    Ok(())
}

#[tokio::test]
async fn logout_leaves_next_mount_anonymous() -> Result<()> {
    let (api, _state) = start_backend().await?;
    let client = PortalClient::new(&api)?;
    client.login(&LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?.into_result()?;

    let resolver = Arc::new(SessionResolver::new(client.clone()));
    let mount = PageMount::new(Role::Admin);
    mount.spawn_resolution(resolver.clone()).expect("first resolution").await?;
    assert!(mount.snapshot().identity().is_some());

    let note = pages::logout(&client, &mount).await?;
    assert_eq!(note.message, "Admin logged out successfully");
    assert!(!mount.is_mounted());

    let next = resolver.mount(Role::Admin).await;
    assert_eq!(next.state(), &SessionState::Anonymous);
    Ok(())
}

#[tokio::test]
async fn approved_company_manages_its_jobs() -> Result<()> {
    let (api, _state) = start_backend().await?;
    let company = PortalClient::new(&api)?;
    let signup = SignupRequest::Company { company_name: "Acme".into(), email: "hr@acme.test".into(), password: "pw".into() };
    signup_and_login(&company, signup, "pw").await?;

    let draft = JobDraft {
        title: "Backend Intern".into(),
        location: "Kuala Lumpur".into(),
        salary: "RM1200".into(),
        description: "Rust services".into(),
    };
    let (mut page, _) = ManageJobsPage::load(&company).await;
    assert!(page.add(&company, &draft).await.is_err(), "pending company cannot post");
    assert!(page.jobs.is_empty());

    let admin = PortalClient::new(&api)?;
    admin.login(&LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?.into_result()?;
    admin.approve_company("hr@acme.test").await?.into_result()?;

    page.add(&company, &draft).await?;
    page.add(&company, &JobDraft { title: "QA Intern".into(), ..draft.clone() }).await?;
    assert_eq!(page.jobs.items()[0].title, "QA Intern");
    let job_id = page.jobs.items()[1].job_id.clone();

    let edit = JobEdit {
        job_id: job_id.clone(),
        title: "Platform Intern".into(),
        location: "Penang".into(),
        salary: "RM1500".into(),
        description: "Rust services".into(),
    };
    page.edit(&company, &edit).await?;
    assert_eq!(page.jobs.get(&job_id).map(|j| j.location.as_str()), Some("Penang"));

    page.delete(&company, &job_id).await?;
    assert_eq!(page.jobs.len(), 1);
    let (reloaded, _) = ManageJobsPage::load(&company).await;
    assert_eq!(reloaded.jobs, page.jobs);
    Ok(())
}

#[tokio::test]
async fn approved_internship_unlocks_progress_report() -> Result<()> {
    let (api, state) = start_backend().await?;
    let company = PortalClient::new(&api)?;
    let signup = SignupRequest::Company { company_name: "Acme".into(), email: "hr@acme.test".into(), password: "pw".into() };
    company.signup(&signup).await?.into_result()?;

    let sup = PortalClient::new(&api)?;
    signup_and_login(&sup, supervisor_signup("tan@uni.test"), "pw-sup").await?;
    let admin = PortalClient::new(&api)?;
    admin.login(&LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?.into_result()?;
    admin.approve_supervisor("tan@uni.test").await?.into_result()?;

    let stu = PortalClient::new(&api)?;
    signup_and_login(&stu, student_signup("21WMR00003", "ong@uni.test"), "990101-14-5678").await?;

    let (mut roster, _) = MyStudentsPage::load(&sup).await;
    roster.assign(&sup, &AssignStudent { student_id: "21WMR00003".into() }).await?;
    assert_eq!(roster.assigned.len(), 1);

    let (submit_page, _) = student::SubmitInternshipPage::load(&stu).await;
    let start = Utc::now();
    let form = InternshipForm {
        start_date: start,
        end_date: start + Duration::days(90),
        company_email: "hr@acme.test".into(),
        allowance: 800.0,
        com_supervisor_name: "Ms Wong".into(),
        com_supervisor_email: "wong@acme.test".into(),
    };
    submit_page.submit(&stu, &form).await?;

    let (mut review, _) = InternshipSubmissionPage::load(&admin).await;
    let internship_id = review.pending().next().and_then(|s| s.internship.as_ref()).map(|i| i.id.clone()).expect("pending");
    review.approve(&admin, &internship_id).await?;
    assert_eq!(review.pending().count(), 0);

    state.store.write().students.get_mut("ong@uni.test").expect("student").progress_report =
        Some(ProgressReport { download_url: Some("https://files.test/ong.pdf".into()), uploaded_at: Some(Utc::now()) });

    let session = SessionResolver::new(stu.clone()).mount(Role::Student).await;
    let gate = pages::lookup("/student/progress-report").expect("catalogued").gate()?;
    let (report, note) = student::load_progress_report(&stu).await;
    assert!(note.is_none());
    match gate.render::<StudentProfile, _, _>(Some(&session), |p| student::progress_report(p, &report))? {
        View::Content(c) => {
            assert_eq!(c.supervisor.email, "tan@uni.test");
            assert_eq!(c.report.download_url.as_deref(), Some("https://files.test/ong.pdf"));
        }
        other => panic!("expected report content, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn announcements_follow_confirmed_actions() -> Result<()> {
    let (api, _state) = start_backend().await?;
    let admin = PortalClient::new(&api)?;
    admin.login(&LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?.into_result()?;

    let (mut page, note) = ManageAnnouncementsPage::load(&admin).await;
    assert!(note.is_none());
    assert!(page.announcements.is_empty());

    let first = AnnouncementDraft { title: "Briefing".into(), content: "Hall A, 9am".into() };
    let second = AnnouncementDraft { title: "Deadline".into(), content: "Submit by Friday".into() };
    page.add(&admin, &first).await?;
    page.add(&admin, &second).await?;
    assert_eq!(page.announcements.items()[0].title, "Deadline");
    let id = page.announcements.items()[1].id.clone();

    let edit = AnnouncementEdit { id: id.clone(), title: "Briefing (moved)".into(), content: "Hall B, 10am".into() };
    page.edit(&admin, &edit).await?;
    assert_eq!(page.announcements.get(&id).map(|a| a.content.as_str()), Some("Hall B, 10am"));
    assert_eq!(page.announcements.items()[0].title, "Deadline");

    let before = page.announcements.clone();
    assert!(page.delete(&admin, "no-such-id").await.is_err());
    assert_eq!(page.announcements, before);

    // Without the admin cookie nothing is accepted, and nothing changes locally.
    let stranger = PortalClient::new(&api)?;
    assert!(page.add(&stranger, &first).await.is_err());
    assert_eq!(page.announcements, before);

    page.delete(&admin, &id).await?;
    assert_eq!(page.announcements.len(), 1);
    let (reloaded, _) = ManageAnnouncementsPage::load(&admin).await;
    assert_eq!(reloaded.announcements, page.announcements);
    Ok(())
}

#[tokio::test]
async fn approving_supervisor_changes_only_its_row() -> Result<()> {
    let (api, _state) = start_backend().await?;
    for email in ["tan@uni.test", "lim@uni.test"] {
        PortalClient::new(&api)?.signup(&supervisor_signup(email)).await?.into_result()?;
    }
    let admin = PortalClient::new(&api)?;
    admin.login(&LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?.into_result()?;

    let (mut page, _) = SupervisorListPage::load(&admin).await;
    assert_eq!(page.supervisors.len(), 2);
    page.approve(&admin, "lim@uni.test").await?;
    assert_eq!(page.supervisors.get("lim@uni.test").map(|s| s.is_approved), Some(true));
    assert_eq!(page.supervisors.get("tan@uni.test").map(|s| s.is_approved), Some(false));

    let before = page.supervisors.clone();
    assert!(page.approve(&admin, "ghost@uni.test").await.is_err());
    assert_eq!(page.supervisors, before);
    Ok(())
}

#[tokio::test]
async fn rejected_internship_blocks_progress_report() -> Result<()> {
    let (api, state) = start_backend().await?;
    PortalClient::new(&api)?
        .signup(&SignupRequest::Company { company_name: "Acme".into(), email: "hr@acme.test".into(), password: "pw".into() })
        .await?
        .into_result()?;
    let stu = PortalClient::new(&api)?;
    signup_and_login(&stu, student_signup("21WMR00004", "ng@uni.test"), "990101-14-5678").await?;
    {
        let mut store = state.store.write();
        store.students.get_mut("ng@uni.test").expect("student").supervisor_email = Some("tan@uni.test".into());
        store.supervisors.insert(
            "tan@uni.test".into(),
            server::state::SupervisorRecord {
                email: "tan@uni.test".into(),
                full_name: "Dr Tan".into(),
                password_hash: String::new(),
                is_approved: true,
                created_at: Utc::now(),
            },
        );
    }
    let start = Utc::now();
    let form = InternshipForm {
        start_date: start,
        end_date: start + Duration::days(60),
        company_email: "hr@acme.test".into(),
        allowance: 0.0,
        com_supervisor_name: "Ms Wong".into(),
        com_supervisor_email: "wong@acme.test".into(),
    };
    stu.submit_internship(&form).await?.into_result()?;

    let admin = PortalClient::new(&api)?;
    admin.login(&LoginRequest::new(Role::Admin, ADMIN_EMAIL, ADMIN_PASSWORD)).await?.into_result()?;
    let (mut review, _) = InternshipSubmissionPage::load(&admin).await;
    let row = review.pending().next().cloned().expect("pending submission");
    let internship_id = row.internship.as_ref().map(|i| i.id.clone()).expect("internship");

    let before = review.submissions.clone();
    assert!(review.reject(&admin, "no-such-internship").await.is_err());
    assert_eq!(review.submissions, before);

    review.reject(&admin, &internship_id).await?;
    let status = review.submissions.get(&row.email).and_then(|s| s.internship.as_ref()).map(|i| i.status);
    assert_eq!(status, Some(InternshipStatus::Rejected));
    assert_eq!(review.pending().count(), 0);

    let session = SessionResolver::new(stu.clone()).mount(Role::Student).await;
    let gate = pages::lookup("/student/progress-report").expect("catalogued").gate()?;
    let view = gate.render::<StudentProfile, _, _>(Some(&session), |p| student::progress_report(p, &ProgressReport::default()))?;
    assert_eq!(view, View::Blocked(Notice::InternshipRejected));
    Ok(())
}

/// Answers every identity check with one fixed payload.
struct FixedIdentity {
    payload: Value,
    fetches: AtomicUsize,
}

#[async_trait]
impl IdentityBackend for FixedIdentity {
    async fn fetch_identity(&self, _role: Role) -> Result<Envelope<Value>, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Envelope::ok("Authorized", self.payload.clone()))
    }

    async fn login(&self, _req: &LoginRequest) -> Result<Envelope<Value>, ClientError> {
        Ok(Envelope::ok("Logged in", self.payload.clone()))
    }
}

fn payload_of(role: Role) -> Value {
    match role {
        Role::Student => json!({
            "email": "s@uni.test", "studentId": "21WMR00005", "fullName": "Oh Boon",
            "supervisor": null, "internship": null
        }),
        Role::Supervisor => json!({"email": "t@uni.test", "fullName": "Dr Tan", "isApproved": true}),
        Role::Company => json!({"email": "hr@acme.test", "companyName": "Acme", "isApproved": true}),
        Role::Admin => json!({"email": ADMIN_EMAIL}),
    }
}

#[tokio::test]
async fn mounts_only_accept_their_own_role() -> Result<()> {
    for served in Role::ALL {
        for page_role in Role::ALL {
            let resolver = SessionResolver::new(FixedIdentity { payload: payload_of(served), fetches: AtomicUsize::new(0) });
            let session = resolver.mount(page_role).await;
            assert_eq!(resolver.backend().fetches.load(Ordering::SeqCst), 1);
            match session.state() {
                SessionState::Authenticated(identity) => {
                    assert_eq!(served, page_role, "{served} payload authenticated a {page_role} page");
                    assert_eq!(identity.role(), page_role);
                }
                SessionState::Anonymous => assert_ne!(served, page_role, "{served} payload refused on its own page"),
                SessionState::Loading => panic!("{page_role} mount left loading"),
            }
        }
    }
    Ok(())
}
