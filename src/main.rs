use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use gointern::config::PortalConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let config = PortalConfig::load();
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "gointern",
        "GoIntern backend starting: RUST_LOG='{}', env={:?}, http_port={}, secure_cookies={}",
        rust_log, config.environment, config.http_port, config.cookie_secure
    );

    gointern::server::run_with_port(&config).await
}
