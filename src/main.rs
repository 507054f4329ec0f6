//! `semaphore` command line: publishes the config template and SQL migrations.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use semaphore_sms::publish::{PublishEvent, PublishOptions, publish};

#[derive(Parser, Debug)]
#[command(name = "semaphore", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish the Semaphore config and migrations.
    Publish(PublishArgs),
}

#[derive(Args, Debug)]
struct PublishArgs {
    /// Publishes the config only.
    #[arg(short, long)]
    config: bool,

    /// Publishes migrations only.
    #[arg(short, long)]
    migration: bool,

    /// Overwrite an existing config.
    #[arg(short, long)]
    force: bool,

    /// Directory receiving `semaphore.toml`.
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Directory receiving the migration files.
    #[arg(long, default_value = "migrations")]
    migrations_dir: PathBuf,
}

impl From<PublishArgs> for PublishOptions {
    fn from(args: PublishArgs) -> Self {
        Self {
            config: args.config,
            migration: args.migration,
            force: args.force,
            config_dir: args.config_dir,
            migrations_dir: args.migrations_dir,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    match Cli::parse().command {
        Commands::Publish(args) => run_publish(args.into()),
    }
}

fn run_publish(options: PublishOptions) -> ExitCode {
    let events = match publish(&options) {
        Ok(events) => events,
        Err(err) => {
            eprintln!("semaphore: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    for event in &events {
        match event {
            PublishEvent::ConfigReset(path) => {
                println!("Force publishing Semaphore config ({})", path.display());
            }
            PublishEvent::ConfigPublished(path) => {
                println!("Semaphore config published to {}", path.display());
            }
            PublishEvent::ConfigExists(path) => {
                eprintln!(
                    "Failed to publish Semaphore config: {} already exists (use --force)",
                    path.display()
                );
                status = ExitCode::FAILURE;
            }
            PublishEvent::MigrationPublished(path) => {
                println!("Migration {} created", path.display());
            }
        }
    }
    status
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("semaphore_sms=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
