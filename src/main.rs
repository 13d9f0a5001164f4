use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chat_backup::cli::{
    handle_config_command, handle_list_command, handle_run_command, RunArgs, RunOutcome,
};
use chat_backup::config::paths::{resolve_config_dir, BackupPaths};
use chat_backup::config::Settings;

#[derive(Parser)]
#[command(
    name = "chat-backup",
    author = "Kaylee Beyene",
    version,
    about = "Back up the clipboard as text, HTML and JSON",
    long_about = "chat-backup captures the current clipboard once and writes it into a \
                  timestamped backup directory as plain text, a self-contained HTML page \
                  and a JSON document, with a summary of every file and a .tar.gz archive \
                  of the whole session."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// Directory under which backups are written
    #[arg(short, long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture the clipboard and write a backup (default)
    Run(RunArgs),

    /// List existing backups
    #[command(alias = "ls")]
    List,

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let config_dir = resolve_config_dir()?;
    let settings = Settings::load_or_default(&config_dir)?;
    let paths = BackupPaths::resolve(config_dir, &settings, cli.output)?;

    match cli.command {
        Some(Commands::List) => {
            handle_list_command(&paths)?;
        }
        Some(Commands::Config) => {
            handle_config_command(&paths, &settings);
        }
        Some(Commands::Run(args)) => run(&paths, &settings, args.merge(cli.run))?,
        None => run(&paths, &settings, cli.run)?,
    }

    Ok(())
}

fn run(paths: &BackupPaths, settings: &Settings, args: RunArgs) -> Result<()> {
    let outcome = handle_run_command(paths, settings, args)?;

    if outcome == RunOutcome::Partial {
        eprintln!("Backup is incomplete: some files could not be written.");
        std::process::exit(outcome.exit_code());
    }

    Ok(())
}
