// Forbid accidental stdout/stderr writes in the *library* portion of the TUI.
// The raw terminal belongs to ratatui; diagnostics go to the log file.
#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use color_eyre::eyre::Result;
use color_eyre::eyre::WrapErr;
use color_eyre::eyre::eyre;
use martin_core::MartinConfig;
use martin_core::config::CONFIG_FILENAME;
use martin_core::config::martin_home;
use martin_people_client::PeopleClient;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod app_event;
mod cli;
mod edit_modal;
mod key_hint;
mod notice;
mod panes;
mod table;
mod terminal;

pub use cli::Cli;

const LOG_FILENAME: &str = "martin-tui.log";

pub async fn run_main(cli: Cli) -> Result<()> {
    let home = martin_home()?;
    let config_path = config_path(&cli, &home);
    let config = MartinConfig::load(Some(&config_path))?;

    let filter = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let _log_guard = init_logging(&home.join("log"), filter)?;
    tracing::info!("martin v{} starting", env!("CARGO_PKG_VERSION"));
    if config_path.exists() {
        tracing::info!(path = %config_path.display(), "config loaded");
    } else {
        tracing::info!(path = %config_path.display(), "config not found, using defaults");
    }

    let client = PeopleClient::from_config(&config.directory)?;
    tracing::debug!(base_url = client.base_url(), "directory client ready");

    let mut app = app::App::new(Box::new(client), config.ui.birthday_note.clone());
    let mut guard = terminal::TerminalGuard::enter().wrap_err("failed to set up the terminal")?;
    let result = app.run(&mut guard.terminal).await;
    drop(guard);

    if let Err(err) = &result {
        tracing::error!("martin exited with an error: {err:#}");
    }
    result
}

/// `--config`, or `config.toml` under the Martin home directory.
fn config_path(cli: &Cli, home: &Path) -> PathBuf {
    cli.config.clone().unwrap_or_else(|| home.join(CONFIG_FILENAME))
}

/// Log to `<dir>/martin-tui.log` through a background writer. The
/// returned guard flushes on drop and must outlive the app.
fn init_logging(dir: &Path, filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("failed to create log directory {}", dir.display()))?;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let path = dir.join(LOG_FILENAME);
    let file = options
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => EnvFilter::try_new(filter)
            .wrap_err_with(|| format!("invalid log filter {filter:?}"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| eyre!("failed to initialise logging: {err}"))?;
    Ok(guard)
}
