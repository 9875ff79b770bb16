//! User-facing notifications.
//!
//! A toast is a transient, auto-dismissing message. The [`Notifier`] trait is
//! the seam the API actions report through; the page model implements it with
//! a full toast lifecycle (see [`toast`]) and the CLI implements it with
//! [`ConsoleNotifier`], which prints a colored line per toast.

pub mod toast;

use std::fmt;
use std::io::Write;

use colored::Colorize;
use serde::{Deserialize, Serialize};

pub use toast::{Toast, ToastId, ToastPhase, ToastStack};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Style variant of a toast. Rendered as the `bg-<variant>` class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Primary,
    Secondary,
    #[default]
    Success,
    Danger,
    Warning,
    Info,
    Light,
    Dark,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Background class applied to the toast element.
    pub fn background_class(self) -> String {
        format!("bg-{}", self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Notifier seam
// ---------------------------------------------------------------------------

/// Something that can show a toast to the user.
///
/// There is no return value and no error path: a notifier that cannot show a
/// message drops it.
pub trait Notifier {
    fn show_toast(&mut self, message: &str, severity: Severity);
}

// ---------------------------------------------------------------------------
// Terminal notifier
// ---------------------------------------------------------------------------

/// Prints each toast as a single colored line.
pub struct ConsoleNotifier<W: Write> {
    out: W,
}

impl ConsoleNotifier<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn show_toast(&mut self, message: &str, severity: Severity) {
        let marker = match severity {
            Severity::Success => "✓".green().bold(),
            Severity::Danger => "✗".red().bold(),
            Severity::Warning => "!".yellow().bold(),
            Severity::Info | Severity::Primary => "i".blue().bold(),
            Severity::Secondary | Severity::Light | Severity::Dark => "·".dimmed(),
        };
        let _ = writeln!(self.out, "  {marker} {message}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
