//! Session resolution for role-scoped pages.
//!
//! A page mount asks the backend once "who am I, as role R?" and settles its [`Session`] on the
//! answer. Every failure (transport, malformed body, `success: false`, a payload that is not the
//! role's shape) resolves to `Anonymous`: the page falls back to its login view and the cause only
//! goes to the log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::IdentityBackend;
use crate::envelope::Envelope;
use crate::error::{AppError, AppResult, Notification};
use crate::identity::{Identity, LoginRequest, Resolution, Role, Session};
use crate::validate::Validate;

pub struct SessionResolver<B> {
    backend: B,
}

impl<B: IdentityBackend> SessionResolver<B> {
    pub fn new(backend: B) -> Self { Self { backend } }

    pub fn backend(&self) -> &B { &self.backend }

    /// One identity round trip for `role`. Never fails; never retries.
    pub async fn resolve(&self, role: Role) -> Resolution {
        match self.backend.fetch_identity(role).await {
            Ok(env) => resolution_from_envelope(role, env),
            Err(e) => {
                warn!(target: "session", %role, error = %e, "identity check failed, treating page as logged out");
                Resolution::Anonymous
            }
        }
    }

    /// Create the mount's session and settle it from a single identity check.
    pub async fn mount(&self, role: Role) -> Session {
        let mut session = Session::new(role);
        let resolution = self.resolve(role).await;
        if let Err(e) = session.settle(resolution) {
            warn!(target: "session", %role, error = %e, "identity discarded");
        }
        session
    }

    /// Submit the login form from the anonymous view. On success the session adopts the identity
    /// carried by the login response directly.
    pub async fn login(&self, session: &mut Session, req: &LoginRequest) -> AppResult<Notification> {
        req.validate()?;
        if req.role != session.role() {
            return Err(AppError::user("role_mismatch", format!("{} login submitted on a {} page", req.role, session.role())));
        }
        if session.identity().is_some() || session.is_loading() {
            return Err(AppError::conflict("not_anonymous", "Login is only possible from the logged-out view"));
        }
        let env = self.backend.login(req).await.map_err(|e| {
            warn!(target: "session", role = %req.role, error = %e, "login request failed");
            AppError::from(e)
        })?;
        let payload = env.into_data()?;
        let identity = Identity::decode(req.role, payload)?;
        session.login_succeeded(identity)?;
        info!(target: "session", role = %req.role, email = %req.email.trim(), "logged in");
        Ok(Notification::success("Login successfully"))
    }
}

fn resolution_from_envelope(role: Role, env: Envelope<Value>) -> Resolution {
    if !env.success {
        debug!(target: "session", %role, message = env.display_message(), "no session");
        return Resolution::Anonymous;
    }
    let Some(payload) = env.data else {
        debug!(target: "session", %role, "identity check succeeded without a payload");
        return Resolution::Anonymous;
    };
    match Identity::decode(role, payload) {
        Ok(identity) => Resolution::Authenticated(identity),
        Err(e) => {
            warn!(target: "session", %role, error = %e, "identity payload rejected");
            Resolution::Anonymous
        }
    }
}

/// The session slot of one mounted page, shared with the task resolving it.
///
/// A resolution landing after [`PageMount::unmount`] is dropped, and the identity check is issued at
/// most once per mount.
#[derive(Clone)]
pub struct PageMount {
    session: Arc<Mutex<Session>>,
    mounted: Arc<AtomicBool>,
    started: Arc<AtomicBool>,
}

impl PageMount {
    pub fn new(role: Role) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(role))),
            mounted: Arc::new(AtomicBool::new(true)),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn role(&self) -> Role { self.session.lock().role() }

    pub fn snapshot(&self) -> Session { self.session.lock().clone() }

    pub fn is_mounted(&self) -> bool { self.mounted.load(Ordering::Acquire) }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Apply a resolution if the page is still mounted. Returns whether it was applied.
    pub fn deliver(&self, resolution: Resolution) -> bool {
        let mut session = self.session.lock();
        // Checked under the lock so an unmount cannot interleave with the write.
        if !self.is_mounted() {
            debug!(target: "session", role = %session.role(), "resolution arrived after unmount, dropped");
            return false;
        }
        match session.settle(resolution) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "session", role = %session.role(), error = %e, "resolution not applied");
                false
            }
        }
    }

    /// Run the page's identity check in the background. `None` when it was already started.
    pub fn spawn_resolution<B>(&self, resolver: Arc<SessionResolver<B>>) -> Option<JoinHandle<bool>>
    where
        B: IdentityBackend + 'static,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            return None;
        }
        let mount = self.clone();
        let role = self.role();
        Some(tokio::spawn(async move {
            let resolution = resolver.resolve(role).await;
            mount.deliver(resolution)
        }))
    }

    /// Login from the mounted page. The session lock is not held across the request.
    pub async fn login<B: IdentityBackend>(&self, resolver: &SessionResolver<B>, req: &LoginRequest) -> AppResult<Notification> {
        let mut working = self.snapshot();
        let note = resolver.login(&mut working, req).await?;
        let mut session = self.session.lock();
        if !self.is_mounted() {
            return Err(AppError::conflict("unmounted", "Page was left before the login completed"));
        }
        if let Some(identity) = working.identity() {
            session.login_succeeded(identity.clone())?;
        }
        Ok(note)
    }
}
