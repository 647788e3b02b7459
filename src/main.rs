use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::mpsc;

use draobpilc::app::{self, App};
use draobpilc::clipboard::{self, watch};
use draobpilc::desktop::{DesktopEntry, DesktopFile};
use draobpilc::logging::{init_cli_logger, init_tui_logger, level_for};
use draobpilc::models::ClipKind;
use draobpilc::signals::restore_default_sigint;
use draobpilc::storage::{HistoryStorage, Paths, ensure_directories};
use draobpilc::store::{self, StoreOutcome};

#[derive(Parser)]
#[command(name = "draobpilc")]
#[command(version, about = "Clipboard history manager", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Install a .desktop launcher into ~/.local/share/applications and exit
    #[arg(long, conflicts_with = "uninstall_desktop_file")]
    install_desktop_file: bool,

    /// Remove the .desktop launcher and exit
    #[arg(long)]
    uninstall_desktop_file: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start clipboard watchers (daemon mode)
    Listen,

    /// Store text from stdin (called by text watcher)
    StoreText,

    /// Store image from stdin (called by image watcher)
    StoreImage,

    /// Store a text/uri-list from stdin (called by file watcher)
    StoreFiles,

    /// Show clipboard history statistics
    Stats,

    /// Show clipboard history entries
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Remove every unpinned entry
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Logging may not be initialised yet
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    if cli.install_desktop_file || cli.uninstall_desktop_file {
        init_cli_logger(level_for(cli.debug, false));
        let desktop_file = DesktopFile::default_location()?;
        if cli.install_desktop_file {
            desktop_file.install(&DesktopEntry::default())?;
        } else {
            desktop_file.uninstall()?;
        }
        // Refusals are reported on stdout and still exit cleanly
        return Ok(());
    }

    let paths = ensure_directories()?;
    let (config_storage, config) = paths.load_config()?;
    let level = level_for(cli.debug, config.general.debug_logging);

    restore_default_sigint()?;

    let Some(command) = cli.command else {
        let (flash_tx, flash_rx) = mpsc::channel();
        init_tui_logger(&paths.log_file(), Some(flash_tx), level, LevelFilter::Warn)?;
        log::info!("Starting {} {}", draobpilc::APP_NAME, draobpilc::APP_VERSION);

        let history_storage = paths.history_storage(&config);
        let history = history_storage.load()?;
        let backend = clipboard::create_backend()?;

        let app = App::new(
            history,
            config,
            app::Storage {
                history: Box::new(history_storage),
                config: Box::new(config_storage),
            },
            backend,
            Some(flash_rx),
        );
        return app::run(app);
    };

    init_cli_logger(level);
    match command {
        Commands::Listen => cmd_listen(),
        Commands::StoreText => cmd_store(&paths, watch::WatchKind::Text),
        Commands::StoreImage => cmd_store(&paths, watch::WatchKind::Image),
        Commands::StoreFiles => cmd_store(&paths, watch::WatchKind::Files),
        Commands::Stats => cmd_stats(&paths),
        Commands::History { limit } => cmd_history(&paths, limit),
        Commands::Clear => cmd_clear(&paths),
    }
}

/// Start clipboard watchers in background
fn cmd_listen() -> Result<()> {
    log::info!("Starting clipboard watchers");
    watch::start_all().context("Failed to start clipboard watchers")?;

    println!("Clipboard watchers started successfully.");
    println!("Use 'pkill -f \"wl-paste.*draobpilc\"' to stop watchers.");
    Ok(())
}

/// Store clipboard content from stdin
fn cmd_store(paths: &Paths, kind: watch::WatchKind) -> Result<()> {
    // Config is re-read on every clip so tracking toggles apply immediately
    let (_, config) = paths.load_config()?;

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let storage = paths.history_storage(&config);
    match store::store_clip(kind, buffer, &config, &storage)? {
        StoreOutcome::Stored(id) => log::debug!("Clip {} saved to {:?}", id, storage.path()),
        StoreOutcome::TrackingDisabled | StoreOutcome::Rejected(_) => {}
    }
    Ok(())
}

/// Show clipboard statistics
fn cmd_stats(paths: &Paths) -> Result<()> {
    let (_, config) = paths.load_config()?;
    let history = paths.history_storage(&config).load()?;

    let count = |kind: ClipKind| history.entries().iter().filter(|e| e.kind() == kind).count();
    let pinned_count = history.entries().iter().filter(|e| e.pinned).count();
    let total_bytes: usize = history.entries().iter().map(|e| e.content.size()).sum();

    println!("Clipboard History Statistics");
    println!("============================");
    println!("Total entries: {}", history.len());
    println!("  Text: {}", count(ClipKind::Text));
    println!("  Images: {}", count(ClipKind::Image));
    println!("  Files: {}", count(ClipKind::Files));
    println!("Pinned entries: {}", pinned_count);
    println!("Stored bytes: {}", total_bytes);
    println!("Max history: {}", config.general.max_history);
    println!(
        "Tracking: {}",
        if config.general.track_changes { "on" } else { "off" }
    );

    Ok(())
}

/// Show clipboard history entries
fn cmd_history(paths: &Paths, limit: usize) -> Result<()> {
    let (_, config) = paths.load_config()?;
    let history = paths.history_storage(&config).load()?;

    if history.is_empty() {
        println!("(empty - no clipboard history yet)");
        return Ok(());
    }

    println!("Recent Clipboard Entries (showing up to {}):", limit);
    println!("{}", "=".repeat(60));

    for (i, entry) in history.entries().iter().take(limit).enumerate() {
        let pinned_mark = if entry.pinned { " *" } else { "" };
        println!(
            "{:3}. [{}]{} {}",
            i + 1,
            entry.kind().label(),
            pinned_mark,
            entry.preview(50)
        );
    }

    Ok(())
}

/// Drop every unpinned entry from history
fn cmd_clear(paths: &Paths) -> Result<()> {
    let (_, config) = paths.load_config()?;
    let storage = paths.history_storage(&config);
    let _lock = storage.lock()?;
    let mut history = storage.load()?;

    let removed = history.clear_unpinned();
    storage.save(&history)?;

    println!(
        "Removed {} clips, kept {} pinned.",
        removed,
        history.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from(["draobpilc", "-d"]).unwrap();
        assert!(cli.debug);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["draobpilc", "--install-desktop-file"]).unwrap();
        assert!(cli.install_desktop_file);
        assert!(!cli.uninstall_desktop_file);

        let cli = Cli::try_parse_from(["draobpilc", "--debug", "--uninstall-desktop-file"]).unwrap();
        assert!(cli.debug);
        assert!(cli.uninstall_desktop_file);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["draobpilc", "--version"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_install_and_uninstall_conflict() {
        let err = Cli::try_parse_from([
            "draobpilc",
            "--install-desktop-file",
            "--uninstall-desktop-file",
        ])
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["draobpilc", "history", "--limit", "3"]).unwrap();
        assert_eq!(cli.command, Some(Commands::History { limit: 3 }));

        let cli = Cli::try_parse_from(["draobpilc", "store-files"]).unwrap();
        assert_eq!(cli.command, Some(Commands::StoreFiles));
    }
}
