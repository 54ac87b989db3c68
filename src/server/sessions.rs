use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use base64::Engine;
use parking_lot::RwLock;

use crate::identity::Role;
use crate::tprintln;

pub type SessionToken = String;

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub role: Role,
    pub email: String,
    pub expires_at: Instant,
}

/// Opaque cookie tokens, one namespace per role. A student token presented as the admin cookie
/// does not validate. Logout removes the token; expired tokens are swept whenever a new one is issued.
pub struct SessionManager {
    ttl: Duration,
    sessions: RwLock<HashMap<SessionToken, IssuedSession>>,
}

fn gen_token() -> Result<SessionToken> {
    // 256-bit random token, base64url without padding
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|e| anyhow!(e.to_string()))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf))
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    pub fn issue(&self, role: Role, email: &str) -> Result<IssuedSession> {
        let now = Instant::now();
        let sess = IssuedSession {
            token: gen_token()?,
            role,
            email: email.to_string(),
            expires_at: now + self.ttl,
        };
        let mut map = self.sessions.write();
        map.retain(|_, s| s.expires_at > now);
        map.insert(sess.token.clone(), sess.clone());
        tprintln!("session.issue role={} email={} ttl_secs={} live={}", role, email, self.ttl.as_secs(), map.len());
        Ok(sess)
    }

    /// Email behind `token` if it is a live session of `role`.
    pub fn validate(&self, role: Role, token: &str) -> Option<String> {
        let now = Instant::now();
        let mut expired = false;
        let out = {
            let map = self.sessions.read();
            match map.get(token) {
                Some(s) if s.role != role => None,
                Some(s) if s.expires_at > now => Some(s.email.clone()),
                Some(_) => {
                    expired = true;
                    None
                }
                None => None,
            }
        };
        if expired {
            self.sessions.write().remove(token);
        }
        out
    }

    pub fn logout(&self, token: &str) -> bool {
        let Some(sess) = self.sessions.write().remove(token) else { return false };
        tprintln!("session.logout role={} email={}", sess.role, sess.email);
        true
    }
}
