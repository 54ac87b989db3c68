//! Per-role resource calls. Each returns the raw envelope; deciding what a failure means for the
//! page (notification, no local mutation) happens at the call site.

use serde_json::Value;

use crate::envelope::Envelope;
use crate::records::{
    Announcement, AnnouncementDraft, AnnouncementEdit, AssignStudent, CompanyRow, EmailRef, IdRef,
    InternshipForm, InternshipIdRef, Job, JobDraft, JobEdit, JobIdRef, ProgressReport, StudentRow, StudentSubmission,
    SupervisorRow,
};

use super::{ClientError, PortalClient};

type Reply<T> = Result<Envelope<T>, ClientError>;

// ---- admin ----
impl PortalClient {
    pub async fn list_supervisors(&self) -> Reply<Vec<SupervisorRow>> {
        self.get("supervisors").await
    }

    pub async fn approve_supervisor(&self, email: &str) -> Reply<Value> {
        self.post("supervisors/approve", &EmailRef { email: email.to_string() }).await
    }

    pub async fn list_companies(&self) -> Reply<Vec<CompanyRow>> {
        self.get("companies").await
    }

    pub async fn approve_company(&self, email: &str) -> Reply<Value> {
        self.post("companies/approve", &EmailRef { email: email.to_string() }).await
    }

    pub async fn list_submissions(&self) -> Reply<Vec<StudentSubmission>> {
        self.get("admins/students").await
    }

    pub async fn approve_internship(&self, internship_id: &str) -> Reply<Value> {
        self.post("admins/students/approve", &InternshipIdRef { internship_id: internship_id.to_string() }).await
    }

    pub async fn reject_internship(&self, internship_id: &str) -> Reply<Value> {
        self.post("admins/students/reject", &InternshipIdRef { internship_id: internship_id.to_string() }).await
    }

    pub async fn list_announcements(&self) -> Reply<Vec<Announcement>> {
        self.get("admins/announcements").await
    }

    pub async fn add_announcement(&self, draft: &AnnouncementDraft) -> Reply<Announcement> {
        self.post("admins/announcements", draft).await
    }

    pub async fn edit_announcement(&self, edit: &AnnouncementEdit) -> Reply<Value> {
        self.put("admins/announcements", edit).await
    }

    pub async fn delete_announcement(&self, id: &str) -> Reply<Value> {
        self.delete("admins/announcements", &IdRef { id: id.to_string() }).await
    }
}

// ---- supervisor ----
impl PortalClient {
    pub async fn list_students(&self) -> Reply<Vec<StudentRow>> {
        self.get("students").await
    }

    pub async fn assign_student(&self, assign: &AssignStudent) -> Reply<StudentSubmission> {
        self.post("supervisors/assign-student", assign).await
    }

    pub async fn my_students(&self) -> Reply<Vec<StudentSubmission>> {
        self.get("supervisors/my-students").await
    }
}

// ---- company ----
impl PortalClient {
    pub async fn list_jobs(&self) -> Reply<Vec<Job>> {
        self.get("companies/jobs").await
    }

    pub async fn add_job(&self, draft: &JobDraft) -> Reply<Job> {
        self.post("companies/jobs", draft).await
    }

    pub async fn edit_job(&self, edit: &JobEdit) -> Reply<Value> {
        self.put("companies/jobs", edit).await
    }

    pub async fn delete_job(&self, job_id: &str) -> Reply<Value> {
        self.delete("companies/jobs", &JobIdRef { job_id: job_id.to_string() }).await
    }
}

// ---- student ----
impl PortalClient {
    pub async fn submit_internship(&self, form: &InternshipForm) -> Reply<Value> {
        self.post("students/submit-internship", form).await
    }

    pub async fn progress_report(&self) -> Reply<ProgressReport> {
        self.get("students/progress-report").await
    }
}
