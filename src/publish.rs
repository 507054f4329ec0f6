//! Copies the bundled config template and SQL migrations into a host project.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta};
use tracing::{info, warn};

use crate::config::{CONFIG_FILE, CONFIG_TEMPLATE};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Migrations shipped with the crate, as `(name, sql)`; names carry no version prefix.
const MIGRATIONS: [(&str, &str); 5] = [
    (
        "create_semaphore_messages_table.sql",
        include_str!("../migrations/20240101000001_create_semaphore_messages_table.sql"),
    ),
    (
        "create_semaphore_accounts_table.sql",
        include_str!("../migrations/20240101000002_create_semaphore_accounts_table.sql"),
    ),
    (
        "create_semaphore_transactions_table.sql",
        include_str!("../migrations/20240101000003_create_semaphore_transactions_table.sql"),
    ),
    (
        "create_semaphore_sender_names_table.sql",
        include_str!("../migrations/20240101000004_create_semaphore_sender_names_table.sql"),
    ),
    (
        "create_semaphore_users_table.sql",
        include_str!("../migrations/20240101000005_create_semaphore_users_table.sql"),
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub config: bool,
    pub migration: bool,
    /// Replace an existing config file.
    pub force: bool,
    pub config_dir: PathBuf,
    pub migrations_dir: PathBuf,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            config: false,
            migration: false,
            force: false,
            config_dir: PathBuf::from("."),
            migrations_dir: PathBuf::from("migrations"),
        }
    }
}

impl PublishOptions {
    /// No selector means config only.
    fn publishes_config(&self) -> bool {
        self.config || !self.migration
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishEvent {
    /// An existing config was removed because of `force`.
    ConfigReset(PathBuf),
    ConfigPublished(PathBuf),
    /// The config already exists and was left untouched.
    ConfigExists(PathBuf),
    MigrationPublished(PathBuf),
}

impl PublishEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ConfigExists(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn publish(options: &PublishOptions) -> Result<Vec<PublishEvent>, PublishError> {
    publish_at(options, Local::now())
}

/// Publish with an explicit clock; migration versions count up from `now`.
pub fn publish_at(
    options: &PublishOptions,
    now: DateTime<Local>,
) -> Result<Vec<PublishEvent>, PublishError> {
    let mut events = Vec::new();
    if options.publishes_config() {
        publish_config(options, &mut events)?;
    }
    if options.migration {
        publish_migrations(&options.migrations_dir, now, &mut events)?;
    }
    Ok(events)
}

fn publish_config(
    options: &PublishOptions,
    events: &mut Vec<PublishEvent>,
) -> Result<(), PublishError> {
    let path = options.config_dir.join(CONFIG_FILE);

    if path.exists() {
        if !options.force {
            warn!(path = %path.display(), "config already published");
            events.push(PublishEvent::ConfigExists(path));
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| io_error(&path, source))?;
        info!(path = %path.display(), "force publishing config");
        events.push(PublishEvent::ConfigReset(path.clone()));
    }

    write_file(&path, CONFIG_TEMPLATE)?;
    info!(path = %path.display(), "config published");
    events.push(PublishEvent::ConfigPublished(path));
    Ok(())
}

fn publish_migrations(
    dir: &Path,
    now: DateTime<Local>,
    events: &mut Vec<PublishEvent>,
) -> Result<(), PublishError> {
    let mut version = now;
    for (name, sql) in MIGRATIONS {
        let path = dir.join(format!("{}_{name}", version.format(TIMESTAMP_FORMAT)));
        write_file(&path, sql)?;
        info!(path = %path.display(), "migration published");
        events.push(PublishEvent::MigrationPublished(path));
        version += TimeDelta::seconds(1);
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), PublishError> {
    if let Some(parent) = path.parent().filter(|it| !it.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    fs::write(path, contents).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.to_path_buf(),
        source,
    }
}
