//!
//! GoIntern CLI
//! ------------
//! Mounts one portal page against a running backend, resolves its session once and prints what
//! the page would show. Optionally logs in from the anonymous view and logs out again.

use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use gointern::client::PortalClient;
use gointern::config::PortalConfig;
use gointern::gate::Decision;
use gointern::identity::{LoginRequest, Role};
use gointern::pages::{self, ProfileCard};
use gointern::resolver::{PageMount, SessionResolver};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --role <role> [--api <url>] [--login <email> <secret>] [--logout]\n  {program} --page <path> [--api <url>] [--login <email> <secret>] [--logout]\n\nFlags:\n  --role <role>            Mount the role's profile page (student, supervisor, company, admin)\n  --page <path>            Portal page to mount, e.g. /student/progress-report or /admin/company-list\n  --api <url>              API base URL (default: GOINTERN_API_URL or the environment default)\n  --login <email> <secret> Log in from the anonymous view; the secret is the IC number for students\n  --logout                 Log the page's role out afterwards and remount\n  -h, --help               Show this help\n\nExamples:\n  {program} --page /supervisor/my-students\n  {program} --api http://127.0.0.1:4000/api --role admin --login admin@gointern.local admin --logout"
    );
}

struct Args {
    api: String,
    page: String,
    login: Option<(String, String)>,
    logout: bool,
}

fn parse_args(program: &str, mut it: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut api = None;
    let mut page = None;
    let mut login = None;
    let mut logout = false;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(program);
                return Ok(None);
            }
            "--api" => api = Some(it.next().context("--api needs a URL")?),
            "--page" => page = Some(it.next().context("--page needs a path")?),
            "--role" => {
                let role: Role = it.next().context("--role needs a role")?.parse().map_err(|e: String| anyhow!(e))?;
                page = Some(format!("{}/auth", role.page_key()));
            }
            "--login" => {
                let email = it.next().context("--login needs an email")?;
                let secret = it.next().context("--login needs a secret")?;
                login = Some((email, secret));
            }
            "--logout" => logout = true,
            other => return Err(anyhow!("unknown argument '{other}'")),
        }
    }
    let page = page.ok_or_else(|| anyhow!("--role or --page is required"))?;
    let api = api.unwrap_or_else(|| PortalConfig::load().api_url);
    Ok(Some(Args { api, page, login, logout }))
}

fn describe(decision: &Decision) -> String {
    match decision {
        Decision::Body => "page body (no session needed)".to_string(),
        Decision::Loading => "loading placeholder".to_string(),
        Decision::Authenticate(view) => {
            let tabs: Vec<String> = view.tabs.iter().map(|t| format!("{t:?}")).collect();
            format!("{} [{}]", view.heading, tabs.join(", "))
        }
        Decision::Deliver(identity) => format!("content for {} ({})", identity.display_name(), identity.email()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "gointern_cli".to_string());
    let Some(args) = parse_args(&program, argv)? else {
        return Ok(());
    };

    let entry = pages::lookup(&args.page).ok_or_else(|| anyhow!("no portal page at '{}'", args.page))?;
    let gate = entry.gate()?;
    println!("{} ({})", entry.title, entry.path);
    let Some(role) = gate.role() else {
        println!("  {}", describe(&gate.decide(None)?));
        return Ok(());
    };

    let client = PortalClient::new(&args.api).with_context(|| format!("While building a client for {}", args.api))?;
    let resolver = Arc::new(SessionResolver::new(client.clone()));
    let mount = PageMount::new(role);
    if let Some(task) = mount.spawn_resolution(resolver.clone()) {
        task.await.context("identity check task failed")?;
    }
    println!("  {}", describe(&gate.decide(Some(&mount.snapshot()))?));

    if let Some((email, secret)) = args.login {
        let req = LoginRequest::new(role, email, secret);
        match mount.login(&*resolver, &req).await {
            Ok(note) => println!("  {}", note.message),
            Err(e) => println!("  {}", e.notification().message),
        }
        let session = mount.snapshot();
        println!("  {}", describe(&gate.decide(Some(&session))?));
        if let Some(identity) = session.identity() {
            let card = ProfileCard::from(identity);
            println!("  {}", card.greeting);
            for (label, value) in &card.rows {
                println!("    {label}: {value}");
            }
        }
    }

    if args.logout {
        let note = pages::logout(&client, &mount).await?;
        println!("  {}", note.message);
        let fresh = resolver.mount(role).await;
        println!("  {}", describe(&gate.decide(Some(&fresh))?));
    }
    Ok(())
}
