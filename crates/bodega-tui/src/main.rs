//! `bodega-tui`: terminal dashboard for the bodega e-commerce back-office.
//!
//! Built on [ratatui](https://ratatui.rs) over the `bodega-core` action
//! layer. Tabs follow the signed-in role: Home, Mi Perfil, Usuarios,
//! Productos, Categorías, Ventas, and Inventario.
//!
//! Logs go to a file (default `/tmp/bodega-tui.log`) so they never land on
//! the terminal the UI is drawing on. The session is shared with the
//! `bodega` CLI through the profile's session file.

mod action;
mod app;
mod component;
mod event;
mod forms;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bodega_config::{FileSessionStore, load_config_or_default, resolve_email, session_path};
use bodega_core::Actions;
use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal dashboard for managing the bodega store.
#[derive(Parser, Debug)]
#[command(name = "bodega-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "BODEGA_PROFILE")]
    profile: Option<String>,

    /// API base URL (overrides the profile)
    #[arg(short = 'u', long, env = "BODEGA_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides the profile)
    #[arg(long, env = "BODEGA_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path (defaults to /tmp/bodega-tui.log)
    #[arg(long, default_value = "/tmp/bodega-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Anything on stdout or stderr would tear the UI.
/// The returned guard flushes the log when dropped.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("bodega_tui={log_level},bodega_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("bodega-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// The action layer for the chosen profile, plus the login prefill.
fn build_actions(cli: &Cli) -> Result<(Actions, String, Option<String>)> {
    let cfg = load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());
    if cli.profile.is_some()
        && !cfg.profiles.is_empty()
        && !cfg.profiles.contains_key(&profile_name)
    {
        bail!(
            "profile '{profile_name}' not found (available: {})",
            cfg.profile_names().join(", ")
        );
    }
    let profile = cfg.profile_or_default(&profile_name);

    let timeout = cli
        .timeout
        .map_or_else(|| profile.timeout(&cfg.defaults), Duration::from_secs);
    let api = profile.client(cli.api_url.as_deref(), timeout)?;
    let session = FileSessionStore::open(session_path(&profile_name))?;
    let email = resolve_email(&profile);

    info!(profile = %profile_name, api = %api.base_url(), "action layer ready");
    Ok((Actions::new(api, Arc::new(session)), profile_name, email))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);
    tui::install_hooks()?;

    let (actions, profile_name, email) = build_actions(&cli)?;
    let mut app = App::new(actions, profile_name, email);
    app.run().await
}
