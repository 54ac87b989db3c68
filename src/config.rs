//! Environment-driven configuration shared by the client binary and the reference backend.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const DEV_API_URL: &str = "http://localhost:4000/api";
pub const PROD_API_URL: &str = "https://api.example.com/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

impl Environment {
    pub fn default_api_url(self) -> &'static str {
        match self {
            Environment::Development => DEV_API_URL,
            Environment::Production => PROD_API_URL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub environment: Environment,
    pub api_url: String,
    pub http_port: u16,
    /// Mark session cookies `Secure`. Plain-http test servers turn this off.
    pub cookie_secure: bool,
    pub session_ttl: Duration,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            api_url: DEV_API_URL.to_string(),
            http_port: 4000,
            cookie_secure: true,
            session_ttl: Duration::from_secs(60 * 60 * 24 * 7),
            admin_email: "admin@gointern.local".to_string(),
            admin_password: "admin".to_string(),
        }
    }
}

impl PortalConfig {
    pub fn load() -> Self {
        let defaults = Self::default();
        let environment: Environment = try_load("GOINTERN_ENV", "development", Environment::Development);
        let api_url = env::var("GOINTERN_API_URL").unwrap_or_else(|_| {
            info!(target: "startup", "GOINTERN_API_URL not set, using {} default", environment.default_api_url());
            environment.default_api_url().to_string()
        });
        let ttl_secs: u64 = try_load("GOINTERN_SESSION_TTL_SECS", "604800", defaults.session_ttl.as_secs());
        Self {
            environment,
            api_url,
            http_port: try_load("GOINTERN_HTTP_PORT", "4000", defaults.http_port),
            cookie_secure: try_load("GOINTERN_COOKIE_SECURE", "true", defaults.cookie_secure),
            session_ttl: Duration::from_secs(ttl_secs),
            admin_email: env::var("GOINTERN_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: env::var("GOINTERN_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }
}

/// Read `key`, falling back to `default` when unset and to `fallback` when the value does not parse.
fn try_load<T: FromStr>(key: &str, default: &str, fallback: T) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!(target: "startup", "{key} not set, using default: {default}");
        default.to_string()
    });
    match raw.parse() {
        Ok(v) => v,
        Err(e) => {
            warn!(target: "startup", "Invalid {key} value '{raw}': {e}");
            fallback
        }
    }
}
