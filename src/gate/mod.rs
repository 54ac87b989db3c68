//! View authorization for pages.
//!
//! A page is described by its navigation key plus what it supplies: a generic body, a role
//! content renderer, or both. A key that names a role (`/student`, `/admin`, ...) gates the page
//! on that role's session:
//!
//! - `Loading` renders a neutral placeholder,
//! - `Anonymous` renders the role's [`AuthView`],
//! - `Authenticated` hands the typed profile to the content renderer, which may still answer with
//!   a blocking [`Notice`] from [`guards`].
//!
//! A key that names no role is public: the body renders and no session is involved. A page that
//! supplies both a body and a renderer under a non-role key is therefore public too.

pub mod auth_view;
pub mod guards;

pub use auth_view::{AuthTab, AuthView, FieldKind, FormField};
pub use guards::{internship_stage, require_approved, require_supervisor, Notice};

use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::identity::{Identity, Role, RoleProfile, Session, SessionState};

/// What a page supplies to the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    pub key: String,
    pub has_body: bool,
    pub has_content: bool,
}

impl PageSpec {
    pub fn body(key: impl Into<String>) -> Self {
        Self { key: key.into(), has_body: true, has_content: false }
    }

    pub fn content(key: impl Into<String>) -> Self {
        Self { key: key.into(), has_body: false, has_content: true }
    }

    pub fn with_body(mut self) -> Self {
        self.has_body = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Gated(Role),
}

/// The gate's verdict for the current session state.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Body,
    Loading,
    Authenticate(AuthView),
    Deliver(Identity),
}

/// What a page shows once its renderer has been consulted.
#[derive(Debug, Clone, PartialEq)]
pub enum View<C> {
    Body,
    Placeholder,
    Authenticate(AuthView),
    Blocked(Notice),
    Content(C),
}

#[derive(Debug, Clone)]
pub struct ViewGate {
    key: String,
    access: Access,
    has_content: bool,
}

impl ViewGate {
    pub fn new(spec: PageSpec) -> AppResult<Self> {
        let access = match (Role::from_page_key(&spec.key), spec.has_body) {
            (Some(role), _) => Access::Gated(role),
            (None, true) => Access::Public,
            (None, false) => {
                return Err(AppError::user(
                    "unroutable_page",
                    format!("page '{}' has no body and its key names no role", spec.key),
                ))
            }
        };
        if let Access::Gated(_) = access {
            if !spec.has_body && !spec.has_content {
                return Err(AppError::user("empty_page", format!("page '{}' supplies nothing to render", spec.key)));
            }
        }
        Ok(Self { key: spec.key, access, has_content: spec.has_content })
    }

    pub fn key(&self) -> &str { &self.key }

    pub fn role(&self) -> Option<Role> {
        match self.access {
            Access::Gated(role) => Some(role),
            Access::Public => None,
        }
    }

    pub fn is_public(&self) -> bool { self.access == Access::Public }

    /// A fresh `Loading` session for a gated page. Public pages have none.
    pub fn mount(&self) -> Option<Session> {
        self.role().map(Session::new)
    }

    pub fn decide(&self, session: Option<&Session>) -> AppResult<Decision> {
        let role = match self.access {
            Access::Public => return Ok(Decision::Body),
            Access::Gated(role) => role,
        };
        let Some(session) = session else {
            return Ok(Decision::Loading);
        };
        if session.role() != role {
            return Err(AppError::conflict(
                "session_role",
                format!("{} session handed to {} page '{}'", session.role(), role, self.key),
            ));
        }
        let decision = match session.state() {
            SessionState::Loading => Decision::Loading,
            SessionState::Anonymous => Decision::Authenticate(AuthView::for_role(role)),
            SessionState::Authenticated(identity) if identity.role() == role => Decision::Deliver(identity.clone()),
            SessionState::Authenticated(identity) => {
                warn!(target: "gate", page = %self.key, offered = %identity.role(), "identity of another role ignored");
                Decision::Authenticate(AuthView::for_role(role))
            }
        };
        debug!(target: "gate", page = %self.key, ?decision, "gate decision");
        Ok(decision)
    }

    /// Decide, then run `content` against the page role's profile. The renderer only ever sees a
    /// profile of type `P`, and `P` must be the profile of the page's role.
    pub fn render<P, C, F>(&self, session: Option<&Session>, content: F) -> AppResult<View<C>>
    where
        P: RoleProfile,
        F: FnOnce(&P) -> Result<C, Notice>,
    {
        if let Some(role) = self.role() {
            if P::ROLE != role {
                return Err(AppError::internal(
                    "renderer_role",
                    format!("{} renderer registered on {} page '{}'", P::ROLE, role, self.key),
                ));
            }
        }
        Ok(match self.decide(session)? {
            Decision::Body => View::Body,
            Decision::Loading => View::Placeholder,
            Decision::Authenticate(view) => View::Authenticate(view),
            Decision::Deliver(_) if !self.has_content => View::Body,
            Decision::Deliver(identity) => match identity.profile::<P>() {
                Some(profile) => match content(profile) {
                    Ok(c) => View::Content(c),
                    Err(notice) => View::Blocked(notice),
                },
                None => View::Authenticate(AuthView::for_role(P::ROLE)),
            },
        })
    }
}
