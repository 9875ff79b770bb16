/// Configuration schema and defaults for the ecorvm dashboard client.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[api]`, `[ui]`, and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level ecorvm configuration.
///
/// Maps directly to the `~/.ecorvm/config.toml` and `.ecorvm.toml` file
/// schemas. All sections and fields are optional; missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcoConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Where the Eco-RVM backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing `/api`.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [ui]
// ---------------------------------------------------------------------------

/// Presentation timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Counter animation length.
    pub animation_duration_ms: u64,
    /// Delay between a successful redemption and the page reload.
    pub reload_delay_ms: u64,
    /// Fade-in delay added per card, by document position.
    pub card_stagger_ms: u64,
    /// How long a toast stays up. `0` keeps toasts until dismissed.
    pub toast_autohide_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: 1000,
            reload_delay_ms: 2000,
            card_stagger_ms: 100,
            toast_autohide_ms: 5000,
        }
    }
}

impl UiConfig {
    /// Toast autohide delay as the page model expects it.
    pub fn toast_autohide(&self) -> Option<f64> {
        (self.toast_autohide_ms > 0).then_some(self.toast_autohide_ms as f64)
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Client log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether the client log is written at all.
    pub enabled: bool,
    /// Path to the log file. `~` is expanded to the home directory.
    pub path: String,
    /// Minimum level written: `"debug"`, `"info"`, `"warn"`, `"error"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.ecorvm/client.log".to_string(),
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl EcoConfig {
    /// Annotated default configuration, written by `ecorvm config init`.
    pub fn default_toml() -> String {
        r#"# ecorvm Configuration
# Eco-RVM recycling rewards dashboard client
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (ECORVM_*)
#   2. Project config (.ecorvm.toml in current directory)
#   3. User global config (~/.ecorvm/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:5000"
timeout_ms = 30000

[ui]
animation_duration_ms = 1000
reload_delay_ms = 2000     # wait after a successful redemption before reloading
card_stagger_ms = 100
toast_autohide_ms = 5000   # 0 = keep toasts until dismissed

[logging]
enabled = true
path = "~/.ecorvm/client.log"
level = "info"             # debug | info | warn | error
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
