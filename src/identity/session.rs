use tracing::debug;

use crate::error::{AppError, AppResult};

use super::principal::Identity;
use super::role::Role;

/// Where a page mount's session stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated(Identity),
}

/// What the identity check settled on. `Loading` is not a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Anonymous,
    Authenticated(Identity),
}

/// Client-held session for one page mount, scoped to exactly one role.
///
/// Transitions:
/// - `Loading -> Anonymous | Authenticated` once, via [`Session::settle`];
/// - `Anonymous -> Authenticated` only via [`Session::login_succeeded`].
///
/// Nothing moves a session backwards; logout ends the mount and the next mount starts fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    role: Role,
    state: SessionState,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self { role, state: SessionState::Loading }
    }

    pub fn role(&self) -> Role { self.role }

    pub fn state(&self) -> &SessionState { &self.state }

    pub fn is_loading(&self) -> bool { matches!(self.state, SessionState::Loading) }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(id) => Some(id),
            _ => None,
        }
    }

    /// Leave `Loading`. A second settle on the same mount is refused and leaves the state as is.
    /// An identity of another role still settles the mount, as `Anonymous`.
    pub fn settle(&mut self, resolution: Resolution) -> AppResult<()> {
        if !self.is_loading() {
            return Err(AppError::conflict("session_settled", "Session already resolved for this page"));
        }
        self.state = match resolution {
            Resolution::Anonymous => SessionState::Anonymous,
            Resolution::Authenticated(identity) => {
                if let Err(e) = self.check_role(&identity) {
                    self.state = SessionState::Anonymous;
                    return Err(e);
                }
                SessionState::Authenticated(identity)
            }
        };
        debug!(target: "session", role = %self.role, authenticated = self.identity().is_some(), "session settled");
        Ok(())
    }

    /// Adopt the identity returned by a successful login, without another identity check.
    pub fn login_succeeded(&mut self, identity: Identity) -> AppResult<()> {
        if !matches!(self.state, SessionState::Anonymous) {
            return Err(AppError::conflict("not_anonymous", "Login is only possible from the logged-out view"));
        }
        self.check_role(&identity)?;
        debug!(target: "session", role = %self.role, email = identity.email(), "login adopted");
        self.state = SessionState::Authenticated(identity);
        Ok(())
    }

    fn check_role(&self, identity: &Identity) -> AppResult<()> {
        if identity.role() != self.role {
            return Err(AppError::auth(
                "role_mismatch",
                format!("{} identity offered to a {} page", identity.role(), self.role),
            ));
        }
        Ok(())
    }
}
