//! Client-side console log.
//!
//! The dashboard reports failures it does not show to the user (and the
//! details behind the ones it does) to a console. [`ConsoleLog`] is that seam;
//! [`FileConsole`] appends timestamped lines to `~/.ecorvm/client.log`.
//!
//! Log file: `~/.ecorvm/client.log` (configurable via `[logging]`)

use std::fmt;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

use crate::config::expand_home;
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse a level name. Unknown names fall back to `Info`.
    pub fn parse(val: &str) -> Self {
        match val.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Console seam
// ---------------------------------------------------------------------------

/// Destination for diagnostic messages. Logging never fails.
pub trait ConsoleLog {
    fn log(&mut self, level: Level, message: &str);

    fn info(&mut self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Log an error with its full context chain.
    fn error(&mut self, context: &str, error: &anyhow::Error) {
        self.log(Level::Error, &format!("{context}: {error:#}"));
    }
}

/// Appends `<rfc3339> <LEVEL> <message>` lines to a file.
///
/// Best-effort: if the file cannot be opened or written, the line is dropped.
#[derive(Debug, Clone)]
pub struct FileConsole {
    path: Option<PathBuf>,
    min_level: Level,
    echo_stderr: bool,
}

impl FileConsole {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            path: config
                .enabled
                .then(|| expand_home(&config.path))
                .flatten(),
            min_level: Level::parse(&config.level),
            echo_stderr: false,
        }
    }

    /// Also print `Warn` and `Error` lines to stderr.
    pub fn echo_to_stderr(mut self, echo: bool) -> Self {
        self.echo_stderr = echo;
        self
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    fn append(&self, line: &str) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent()
            && create_dir_all(parent).is_err()
        {
            return;
        }

        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
            return;
        };

        let _ = writeln!(file, "{line}");
    }
}

impl ConsoleLog for FileConsole {
    fn log(&mut self, level: Level, message: &str) {
        if level < self.min_level {
            return;
        }

        let message = message.replace(['\r', '\n'], " ");
        self.append(&format!("{} {level} {message}", Utc::now().to_rfc3339()));

        if self.echo_stderr && level >= Level::Warn {
            eprintln!("{level}: {message}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
