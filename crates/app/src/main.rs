//! Postbox API Client - Main Entry Point
//!
//! Loads settings, sets up logging, wires the adapters into the workspace
//! and runs the terminal shell until the user quits.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use postbox_application::{FireRequest, Workspace};
use postbox_domain::UserSettings;
use postbox_infrastructure::{
    JsonWorkspaceStore, ReqwestHttpClient, SettingsError, SettingsRepository, TokioFileSystem,
};
use postbox_ui::App;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG_VAR: &str = "POSTBOX_CONFIG";
const DATA_DIR_VAR: &str = "POSTBOX_DATA_DIR";
const LOG_STDERR_VAR: &str = "POSTBOX_LOG_STDERR";
const LOG_FILE: &str = "postbox.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let repository = settings_repository();
    let (stored, settings_error) = match repository.load().await {
        Ok(settings) => (settings, None),
        Err(e) => (UserSettings::default(), Some(e)),
    };
    let settings = apply_env_overrides(stored.clone());

    init_logging(&settings);
    if let Some(e) = settings_error {
        warn!(error = %e, "could not read settings, using defaults");
    } else {
        match seed_settings_file(&repository, &stored).await {
            Ok(true) => info!(path = ?repository.path(), "wrote default settings"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "could not write default settings"),
        }
    }
    info!(
        data_dir = %settings.data_dir.display(),
        timeout_ms = settings.request_timeout().as_millis(),
        "starting postbox"
    );

    let store = JsonWorkspaceStore::from_settings(TokioFileSystem::new(), &settings);
    let workspace = Workspace::load(store).await;

    let client = ReqwestHttpClient::new().context("failed to create HTTP client")?;
    let fire_request = FireRequest::new(Arc::new(client), settings.request_timeout());

    let (app, updates) = App::new(workspace, fire_request);
    postbox_ui::run(app, updates).await.context("terminal UI failed")?;

    info!("postbox stopped");
    Ok(())
}

/// `POSTBOX_CONFIG` names a settings file in place of the platform one.
fn settings_repository() -> SettingsRepository {
    match std::env::var_os(CONFIG_VAR) {
        Some(path) if !path.is_empty() => SettingsRepository::at(PathBuf::from(path)),
        _ => SettingsRepository::new(),
    }
}

fn apply_env_overrides(settings: UserSettings) -> UserSettings {
    match std::env::var_os(DATA_DIR_VAR) {
        Some(dir) if !dir.is_empty() => settings.with_data_dir(PathBuf::from(dir)),
        _ => settings,
    }
}

/// Writes `settings` when no settings file exists yet, so there is one to
/// edit. Returns whether a file was written.
async fn seed_settings_file(
    repository: &SettingsRepository,
    settings: &UserSettings,
) -> Result<bool, SettingsError> {
    match repository.path() {
        Some(path) if !path.exists() => {
            repository.save(settings).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// The shell owns the terminal, so logs go to `postbox.log` in the data
/// directory. `POSTBOX_LOG_STDERR=1` sends them to stderr instead.
fn init_logging(settings: &UserSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let to_stderr = std::env::var(LOG_STDERR_VAR).is_ok_and(|v| v == "1");
    let (writer, unavailable) = if to_stderr {
        (BoxMakeWriter::new(io::stderr), None)
    } else {
        log_writer(settings)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(to_stderr)
                .with_writer(writer),
        )
        .init();

    if let Some(e) = unavailable {
        eprintln!("postbox: logging disabled: {e:#}");
    }
}

/// Opens the log file, or discards log output when it cannot be opened.
/// The second value says why logging is off.
fn log_writer(settings: &UserSettings) -> (BoxMakeWriter, Option<anyhow::Error>) {
    match open_log_file(settings) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), None),
        Err(e) => (BoxMakeWriter::new(io::sink), Some(e)),
    }
}

fn open_log_file(settings: &UserSettings) -> anyhow::Result<File> {
    fs::create_dir_all(&settings.data_dir)
        .with_context(|| format!("cannot create {}", settings.data_dir.display()))?;
    let path = settings.data_dir.join(LOG_FILE);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open {}", path.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[test]
    fn log_writer_appends_to_log_file() {
        let dir = tempdir().unwrap();
        let settings = UserSettings::default().with_data_dir(dir.path().join("db"));

        let (writer, unavailable) = log_writer(&settings);
        writer.make_writer().write_all(b"hello\n").unwrap();

        assert!(unavailable.is_none());
        let text = fs::read_to_string(dir.path().join("db").join(LOG_FILE)).unwrap();
        assert_eq!(text, "hello\n");
    }

    #[test]
    fn log_writer_falls_back_when_data_dir_cannot_be_created() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let settings = UserSettings::default().with_data_dir(blocker.join("db"));

        let (writer, unavailable) = log_writer(&settings);

        assert!(unavailable.unwrap().to_string().starts_with("cannot create "));
        writer.make_writer().write_all(b"dropped\n").unwrap();
    }

    #[tokio::test]
    async fn missing_settings_file_is_seeded_once() {
        let dir = tempdir().unwrap();
        let repository = SettingsRepository::at(dir.path().join("postbox").join("settings.json"));
        let settings = UserSettings {
            request_timeout_ms: 1500,
            ..UserSettings::default()
        };

        assert!(seed_settings_file(&repository, &settings).await.unwrap());
        assert!(!seed_settings_file(&repository, &UserSettings::default()).await.unwrap());
        assert_eq!(repository.load().await.unwrap(), settings);
    }
}
