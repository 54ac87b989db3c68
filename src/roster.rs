//! Page-local keyed lists.
//!
//! A roster is loaded once per page mount and afterwards changes only through [`Roster::confirm`]:
//! the mutation runs if and only if the backend answered `success: true`. Anything else yields an
//! error notification and leaves the list exactly as it was. Nothing here re-fetches.

use tracing::{debug, warn};

use crate::client::ClientError;
use crate::envelope::Envelope;
use crate::error::{AppError, AppResult, Notification};
use crate::records::{Announcement, CompanyRow, Job, StudentRow, StudentSubmission, SupervisorRow};

pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for SupervisorRow {
    fn key(&self) -> &str { &self.email }
}

impl Keyed for CompanyRow {
    fn key(&self) -> &str { &self.email }
}

impl Keyed for StudentRow {
    fn key(&self) -> &str { &self.student_id }
}

impl Keyed for StudentSubmission {
    fn key(&self) -> &str { &self.email }
}

impl Keyed for Announcement {
    fn key(&self) -> &str { &self.id }
}

impl Keyed for Job {
    fn key(&self) -> &str { &self.job_id }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Roster<T> {
    items: Vec<T>,
}

impl<T> Default for Roster<T> {
    fn default() -> Self { Self { items: Vec::new() } }
}

impl<T: Keyed> Roster<T> {
    pub fn new(items: Vec<T>) -> Self { Self { items } }

    /// Initial page load. A failed load leaves an empty roster and reports why.
    pub fn load(reply: Result<Envelope<Vec<T>>, ClientError>) -> (Self, Option<Notification>) {
        match settle(reply).and_then(|env| env.into_result()) {
            Ok(items) => (Self::new(items.unwrap_or_default()), None),
            Err(e) => (Self::default(), Some(e.notification())),
        }
    }

    pub fn items(&self) -> &[T] { &self.items }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|it| it.key() == key)
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    pub fn update(&mut self, key: &str, f: impl FnOnce(&mut T)) -> bool {
        self.update_where(|it| it.key() == key, f)
    }

    /// Like [`Roster::update`] for rows addressed by something other than their key.
    pub fn update_where(&mut self, pred: impl Fn(&T) -> bool, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|it| pred(it)) {
            Some(slot) => {
                f(slot);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let pos = self.items.iter().position(|it| it.key() == key)?;
        Some(self.items.remove(pos))
    }

    /// Apply `mutate` only if the backend confirmed the action. The payload of the response, if
    /// any, is handed to the mutation.
    pub fn confirm<R>(
        &mut self,
        reply: Result<Envelope<R>, ClientError>,
        mutate: impl FnOnce(&mut Self, Option<R>),
    ) -> AppResult<Notification> {
        let env = settle(reply)?;
        let note = env.notification();
        let data = env.into_result()?;
        mutate(self, data);
        debug!(target: "api", len = self.len(), "roster updated from confirmed response");
        Ok(note)
    }
}

fn settle<R>(reply: Result<Envelope<R>, ClientError>) -> AppResult<Envelope<R>> {
    reply.map_err(|e| {
        warn!(target: "api", error = %e, "request failed");
        AppError::from(e)
    })
}
