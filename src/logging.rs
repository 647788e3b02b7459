use anyhow::{Context, Result};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Timestamp format at the start of every log line
const TIME_FORMAT: &str = "%H:%M:%S";

/// Flash message for TUI display
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
    pub timestamp: Instant,
}

/// Verbosity for a run: `--debug` or `debug_logging` enable debug output,
/// otherwise only warnings and errors are logged
pub fn level_for(debug_flag: bool, config_debug: bool) -> LevelFilter {
    if debug_flag || config_debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Write one record as `HH:MM:SS LEVEL\tfile:line \tmessage`
pub fn write_record(out: &mut dyn Write, record: &Record) -> std::io::Result<()> {
    let file = record
        .file()
        .and_then(|f| Path::new(f).file_name())
        .and_then(|f| f.to_str())
        .unwrap_or("?");
    writeln!(
        out,
        "{} {}\t{}:{} \t{}",
        chrono::Local::now().format(TIME_FORMAT),
        record.level(),
        file,
        record.line().unwrap_or(0),
        record.args()
    )
}

/// Logger used while the TUI owns the terminal: writes to a rolling file
/// and forwards important records to the status bar
struct TuiLogger {
    file_writer: Arc<Mutex<RollingFileAppender>>,
    flash_tx: Option<Arc<Mutex<Sender<FlashMessage>>>>,
    file_level: LevelFilter,
    flash_level: LevelFilter,
}

impl Log for TuiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.file_level || metadata.level() <= self.flash_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();

        if level <= self.file_level
            && let Ok(mut writer) = self.file_writer.lock()
        {
            let _ = write_record(&mut *writer, record);
        }

        if level <= self.flash_level
            && let Some(tx) = &self.flash_tx
            && let Ok(tx) = tx.lock()
        {
            let _ = tx.send(FlashMessage {
                level,
                message: record.args().to_string(),
                timestamp: Instant::now(),
            });
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.file_writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Initialize file + flash logging for the interactive UI
pub fn init_tui_logger(
    log_file_path: &Path,
    flash_tx: Option<Sender<FlashMessage>>,
    file_level: LevelFilter,
    flash_level: LevelFilter,
) -> Result<()> {
    let log_dir = log_file_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file path"))?;
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // tracing-appender only rotates by time, keep three days
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(
            log_file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(crate::APP_ID),
        )
        .filename_suffix(
            log_file_path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("log"),
        )
        .build(log_dir)
        .context("Failed to create rotating file appender")?;

    let logger = TuiLogger {
        file_writer: Arc::new(Mutex::new(file_appender)),
        flash_tx: flash_tx.map(|tx| Arc::new(Mutex::new(tx))),
        file_level,
        flash_level,
    };

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(file_level.max(flash_level));

    Ok(())
}

/// Initialize stderr logging for command-line subcommands
pub fn init_cli_logger(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| write_record(buf, record))
        .try_init();
}
