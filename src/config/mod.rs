/// Configuration system for ecorvm.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::EcoConfig::default()`]
/// 2. **User global config**: `~/.ecorvm/config.toml`
/// 3. **Project local config**: `.ecorvm.toml` in the current working directory
/// 4. **Environment variables**: `ECORVM_*` overrides (highest precedence)
///
/// Later layers replace earlier ones. Missing sections in a TOML file fall
/// back to the built-in defaults.
///
/// # Usage
///
/// ```rust,ignore
/// use ecorvm::config;
///
/// let cfg = config::load();
/// let client = ecorvm::api::ApiClient::from_config(&cfg.api);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::EcoConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> EcoConfig {
    let mut config = EcoConfig::default();

    // Layer 2: user global config (~/.ecorvm/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Layer 3: project local config (.ecorvm.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A broken config file must not stop the dashboard
/// from loading, so malformed files are ignored.
fn load_toml_file(path: Option<PathBuf>) -> Option<EcoConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// The ecorvm home directory: `~/.ecorvm`.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ecorvm"))
}

/// Path to the user global config: `~/.ecorvm/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    home_dir().map(|dir| dir.join("config.toml"))
}

/// Path to the project local config: `.ecorvm.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".ecorvm.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> Option<PathBuf> {
    if path == "~" {
        return dirs::home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `ECORVM_API_URL`: backend base URL
/// - `ECORVM_API_TIMEOUT_MS`: per-request timeout
/// - `ECORVM_ANIMATION_MS`: counter animation length
/// - `ECORVM_LOG`: client log on/off (`1`/`true`/`yes`/`on`)
/// - `ECORVM_LOG_LEVEL`: minimum log level
fn apply_env_overrides(config: &mut EcoConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("ECORVM_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = var("ECORVM_API_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Some(val) = var("ECORVM_ANIMATION_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.ui.animation_duration_ms = ms;
    }
    if let Some(val) = var("ECORVM_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Some(val) = var("ECORVM_LOG_LEVEL")
        && !val.is_empty()
    {
        config.logging.level = val.to_ascii_lowercase();
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.ecorvm/config.toml`.
///
/// Creates the `~/.ecorvm/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.ecorvm/ directory")?;
    }

    fs::write(&path, EcoConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or the defaults when there is none),
/// updates the specified key, and writes the result back. Supports dotted
/// keys like `api.base_url`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let current = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&EcoConfig::default())
            .context("failed to serialize default config")?
    };

    let updated = update_toml_text(&current, key, value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, updated).context("failed to write config file")?;

    Ok(())
}

/// Apply a dotted-key update to TOML text and return the new text.
fn update_toml_text(current: &str, key: &str, value: &str) -> Result<String> {
    let mut root: toml::Value =
        toml::from_str(current).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // The result must still be a valid config.
    let text = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<EcoConfig>(&text)
        .with_context(|| format!("'{value}' is not a valid value for '{key}'"))?;
    Ok(text)
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value takes the type of the value it replaces.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if key.is_empty() || parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' cannot be set from the command line"),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = EcoConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("ECORVM_API_URL", "http://rvm:9000"),
                ("ECORVM_API_TIMEOUT_MS", "1500"),
                ("ECORVM_ANIMATION_MS", "250"),
                ("ECORVM_LOG", "0"),
                ("ECORVM_LOG_LEVEL", "DEBUG"),
            ]),
        );
        assert_eq!(config.api.base_url, "http://rvm:9000");
        assert_eq!(config.api.timeout_ms, 1500);
        assert_eq!(config.ui.animation_duration_ms, 250);
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = EcoConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("ECORVM_API_URL", ""),
                ("ECORVM_API_TIMEOUT_MS", "soon"),
                ("ECORVM_ANIMATION_MS", "-1"),
            ]),
        );
        assert_eq!(config, EcoConfig::default());
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[api]\nbase_url = \"http://a\"\n").unwrap();
        set_toml_value(&mut root, "api.base_url", "http://b").unwrap();
        assert_eq!(root["api"]["base_url"].as_str(), Some("http://b"));
    }

    #[test]
    fn set_toml_value_updates_bool() {
        let mut root: toml::Value = toml::from_str("[logging]\nenabled = true\n").unwrap();
        set_toml_value(&mut root, "logging.enabled", "off").unwrap();
        assert_eq!(root["logging"]["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_updates_integer() {
        let mut root: toml::Value = toml::from_str("[ui]\nreload_delay_ms = 2000\n").unwrap();
        set_toml_value(&mut root, "ui.reload_delay_ms", "500").unwrap();
        assert_eq!(root["ui"]["reload_delay_ms"].as_integer(), Some(500));
    }

    #[test]
    fn set_toml_value_rejects_bad_integer() {
        let mut root: toml::Value = toml::from_str("[ui]\nreload_delay_ms = 2000\n").unwrap();
        assert!(set_toml_value(&mut root, "ui.reload_delay_ms", "later").is_err());
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[api]\nbase_url = \"x\"\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "api.port", "80").is_err());
        assert!(set_toml_value(&mut root, "", "x").is_err());
    }

    #[test]
    fn update_toml_text_rejects_values_the_schema_refuses() {
        let current = toml::to_string_pretty(&EcoConfig::default()).unwrap();
        // Negative integers parse as TOML but not as u64.
        assert!(update_toml_text(&current, "api.timeout_ms", "-5").is_err());

        let updated = update_toml_text(&current, "api.timeout_ms", "5000").unwrap();
        let config: EcoConfig = toml::from_str(&updated).unwrap();
        assert_eq!(config.api.timeout_ms, 5000);
    }

    #[test]
    fn expand_home_handles_tilde() {
        let home = dirs::home_dir();
        assert_eq!(expand_home("~"), home);
        assert_eq!(
            expand_home("~/.ecorvm/client.log"),
            home.map(|h| h.join(".ecorvm/client.log"))
        );
        assert_eq!(expand_home("/tmp/x.log"), Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: EcoConfig = toml::from_str(&toml_str).unwrap();
    }
}
