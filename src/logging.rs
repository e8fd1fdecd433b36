// Logger setup: stdout plus a log file, with `[date][time][target][level]` prefixes

use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable that overrides the log level (e.g. `FINDERCLIP_LOG=trace`)
pub const LOG_LEVEL_ENV: &str = "FINDERCLIP_LOG";

const LOG_FILE_NAME: &str = "finderclip.log";

/// Level from an override string, falling back to Debug in debug builds and Info otherwise
pub fn resolve_level(override_value: Option<&str>) -> LevelFilter {
    override_value
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

/// `~/Library/Logs/com.finderclip.app/finderclip.log` on macOS, the local data dir elsewhere
pub fn log_file_path() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| {
            home.join("Library")
                .join("Logs")
                .join("com.finderclip.app")
                .join(LOG_FILE_NAME)
        })
    } else {
        dirs::data_local_dir().map(|dir| dir.join("finderclip").join("logs").join(LOG_FILE_NAME))
    }
}

/// Install the global logger. Call once, before anything logs.
pub fn init() -> Result<(), fern::InitError> {
    let level = resolve_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d][%H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(path) = log_file_path() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        dispatch = dispatch.chain(fern::log_file(&path)?);
    }

    dispatch.apply()?;
    Ok(())
}
