//! `nsot-console`: terminal admin console for an NSoT server.
//!
//! Screens are driven by the `nsot-core` store: every key press turns
//! into a controller call, the controller dispatches request/success/
//! failure actions, and the app re-renders from the newest snapshot.
//!
//! Logs go to a file (default `/tmp/nsot-console.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod state_bridge;
mod theme;
mod tui;
mod views;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use nsot_core::{AuthCredentials, ClientConfig, Controller, EntityId, Route};

use crate::app::App;

/// Browse and edit devices, networks and attributes in NSoT.
#[derive(Parser, Debug)]
#[command(name = "nsot-console", version, about)]
struct Cli {
    /// NSoT server URL (e.g., http://localhost:8990)
    #[arg(short = 'u', long, env = "NSOT_URL")]
    url: Option<String>,

    /// Email asserted to the server
    #[arg(short = 'e', long, env = "NSOT_EMAIL")]
    email: Option<String>,

    /// Secret key, exchanged for an auth token on connect
    #[arg(long, env = "NSOT_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Site id to scope every request to
    #[arg(short = 's', long, env = "NSOT_SITE")]
    site: Option<u64>,

    /// Config profile to use (defaults to `default_profile`)
    #[arg(short = 'p', long, env = "NSOT_PROFILE")]
    profile: Option<String>,

    /// Path to open first (e.g. /networks/4)
    #[arg(long, default_value = "/")]
    path: String,

    /// Log file path
    #[arg(long, default_value = "/tmp/nsot-console.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The returned guard must outlive the app so the
/// non-blocking writer flushes.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "nsot_console={log_level},nsot_tui={log_level},nsot_core={log_level},nsot_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("nsot-console.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the connection: a profile from the config file (if any), with
/// command-line flags layered on top. `--url` alone is enough to connect.
fn build_client_config(cli: &Cli) -> Result<ClientConfig> {
    let cfg = nsot_config::load_config().wrap_err("failed to load config file")?;

    let mut config = match cfg.profile(cli.profile.as_deref()) {
        Ok((name, profile)) => nsot_config::profile_to_client_config(profile, name, &cfg.defaults)
            .wrap_err_with(|| format!("profile '{name}' is invalid"))?,
        Err(e) if cli.profile.is_some() => return Err(e.into()),
        Err(_) => {
            let url = cli
                .url
                .as_deref()
                .ok_or_else(|| eyre!("no --url given and no config profile found"))?;
            let mut config = ClientConfig::new(parse_url(url)?, AuthCredentials::Anonymous);
            config.page_size = cfg.defaults.page_size;
            config
        }
    };

    if let Some(url) = cli.url.as_deref() {
        config.url = parse_url(url)?;
    }
    if let Some(site) = cli.site {
        config.site_id = Some(EntityId::new(site));
    }
    if let Some(email) = cli.email.clone() {
        config.auth = match cli.secret_key.clone() {
            Some(key) => AuthCredentials::SecretKey {
                email,
                secret_key: SecretString::from(key),
            },
            None => AuthCredentials::AuthHeader { email },
        };
    }

    Ok(config)
}

fn parse_url(raw: &str) -> Result<url::Url> {
    raw.parse()
        .wrap_err_with(|| format!("invalid server URL: {raw}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first, so a panic during terminal setup still restores it.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_client_config(&cli)?;
    let start = Route::parse(&cli.path);
    info!(
        url = %config.url,
        site = ?config.site_id,
        start = %start,
        "starting nsot-console"
    );

    let mut app = App::new(Controller::new(config), start);
    app.run().await?;

    Ok(())
}
