use crate::client::PortalClient;
use crate::error::{AppResult, Notification};
use crate::gate::{require_approved, Notice};
use crate::identity::CompanyProfile;
use crate::records::{Job, JobDraft, JobEdit};
use crate::roster::Roster;
use crate::validate::Validate;

/// `/company/manage-jobs`.
#[derive(Debug, Default)]
pub struct ManageJobsPage {
    pub jobs: Roster<Job>,
}

impl ManageJobsPage {
    pub async fn load(client: &PortalClient) -> (Self, Option<Notification>) {
        let (jobs, note) = Roster::load(client.list_jobs().await);
        (Self { jobs }, note)
    }

    pub fn content(&self, profile: &CompanyProfile) -> Result<&[Job], Notice> {
        require_approved(profile)?;
        Ok(self.jobs.items())
    }

    /// New postings go to the top of the list.
    pub async fn add(&mut self, client: &PortalClient, draft: &JobDraft) -> AppResult<Notification> {
        draft.validate()?;
        let reply = client.add_job(draft).await;
        self.jobs.confirm(reply, |jobs, data| {
            if let Some(job) = data {
                jobs.prepend(job);
            }
        })
    }

    pub async fn edit(&mut self, client: &PortalClient, edit: &JobEdit) -> AppResult<Notification> {
        edit.validate()?;
        let reply = client.edit_job(edit).await;
        self.jobs.confirm(reply, |jobs, _| {
            jobs.update(&edit.job_id, |job| {
                job.title = edit.title.clone();
                job.location = edit.location.clone();
                job.salary = edit.salary.clone();
                job.description = edit.description.clone();
            });
        })
    }

    pub async fn delete(&mut self, client: &PortalClient, job_id: &str) -> AppResult<Notification> {
        let reply = client.delete_job(job_id).await;
        self.jobs.confirm(reply, |jobs, _| {
            jobs.remove(job_id);
        })
    }
}
