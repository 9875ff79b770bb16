//! CLI command implementations for the ecorvm dashboard client.
//!
//! Provides subcommand handlers for:
//! - `ecorvm dashboard`: load and render dashboard statistics
//! - `ecorvm redeem --user N --reward M`: redeem a reward
//! - `ecorvm format <value>...`: apply the thousands-separator formatter
//! - `ecorvm chart-config <weekly.json>`: print the weekly chart config
//! - `ecorvm health`: check config, backend and log file
//! - `ecorvm config show|init|set|reset`: configuration management

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use indexmap::IndexMap;

use crate::actions::{self, LoadedDashboard, PendingReload, RedeemOutcome};
use crate::animate::{Clock, SystemClock};
use crate::api::{ApiClient, DashboardStats};
use crate::charts::{ChartConfig, recycling_chart_config};
use crate::config::{self, EcoConfig};
use crate::format::{format_fixed, format_number};
use crate::logging::{ConsoleLog, FileConsole};
use crate::notify::ConsoleNotifier;
use crate::page::{Page, ids};

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Interval between animation frames in the terminal.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Width of the longest bar in the weekly chart.
const BAR_WIDTH: usize = 30;

/// The client log. Errors are echoed to stderr only in an interactive session.
fn console_for(cfg: &EcoConfig, interactive: bool) -> FileConsole {
    FileConsole::from_config(&cfg.logging).echo_to_stderr(interactive)
}

fn interactive() -> bool {
    std::io::stderr().is_terminal()
}

/// Where to look after a failed dashboard load. The failure itself only goes
/// to the log.
fn load_failure_hint(console: &FileConsole) -> Option<String> {
    console
        .path()
        .map(|path| format!("  {} {}", "Log:".dimmed(), path.display()))
}

// ---------------------------------------------------------------------------
// ecorvm dashboard
// ---------------------------------------------------------------------------

/// Load dashboard statistics and render them.
pub fn run_dashboard(animate: bool, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let client = ApiClient::from_config(&cfg.api);

    if format == OutputFormat::Json {
        let stats = client.dashboard_stats()?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let mut console = console_for(&cfg, interactive());
    let mut page = Page::dashboard_with(&cfg.ui);
    let clock = SystemClock::new();
    let duration = if animate {
        cfg.ui.animation_duration_ms as f64
    } else {
        0.0
    };

    let Some(loaded) =
        actions::load_dashboard_stats(&client, &mut page, &mut console, duration, clock.now_ms())
    else {
        if let Some(hint) = load_failure_hint(&console) {
            println!("{hint}");
        }
        return Ok(());
    };
    console.info(&format!("dashboard loaded from {}", client.base_url()));

    println!("{}", "Eco-RVM Dashboard".bold().cyan());
    println!("{}", "=".repeat(50));

    if loaded.stats.estadisticas.is_some() {
        run_counters(&mut page, &clock, animate)?;
    }

    print_dashboard_table(&page, &loaded);
    Ok(())
}

/// Drive the counter animations to completion, redrawing one line per frame.
fn run_counters(page: &mut Page, clock: &dyn Clock, animate: bool) -> Result<()> {
    let mut out = std::io::stdout();
    loop {
        page.advance_frame(clock.now_ms());
        if animate {
            write!(out, "\r{}", counter_line(page))?;
            out.flush().context("failed to flush stdout")?;
        }
        if page.running_animations() == 0 {
            break;
        }
        thread::sleep(FRAME_INTERVAL);
    }
    if animate {
        writeln!(out)?;
    }
    Ok(())
}

fn counter_line(page: &Page) -> String {
    let text = |id| page.text_of(id).unwrap_or("0");
    format!(
        "  {} {:>10}   {} {:>10}   {} {:>12}",
        "Usuarios".bold(),
        text(ids::TOTAL_USUARIOS),
        "Transacciones".bold(),
        text(ids::TOTAL_TRANSACCIONES),
        "Puntos".bold(),
        text(ids::TOTAL_PUNTOS),
    )
}

fn print_dashboard_table(page: &Page, loaded: &LoadedDashboard) {
    let stats = &loaded.stats;
    let text = |id| page.text_of(id).unwrap_or("-");

    if let Some(general) = &stats.estadisticas {
        println!();
        println!("{}", "Estadísticas".bold());
        println!("  {} {}", "Usuarios:        ".bold(), text(ids::TOTAL_USUARIOS));
        println!("  {} {}", "Transacciones:   ".bold(), text(ids::TOTAL_TRANSACCIONES));
        println!("  {} {}", "Puntos totales:  ".bold(), text(ids::TOTAL_PUNTOS));
        if let Some(avg) = general.promedio_puntos_usuario {
            println!("  {} {}", "Promedio/usuario:".bold(), format_fixed(avg, 1));
        }
    }

    if let Some(impact) = &stats.impacto_ambiental {
        println!();
        println!("{}", "Impacto ambiental".bold().green());
        println!("  {} {} kg", "CO₂ evitado:     ".bold(), text(ids::CO2_EVITADO));
        println!("  {} {} kg", "Peso reciclado:  ".bold(), text(ids::PESO_RECICLADO));
        if let Some(total) = impact.total_reciclajes {
            println!("  {} {}", "Reciclajes:      ".bold(), format_number(total));
        }
        if let Some(eq) = &impact.equivalencias {
            println!(
                "  {} {} árboles · {} L agua · {} kWh",
                "Equivale a:      ".bold(),
                format_fixed(eq.arboles_plantados, 1),
                format_number(eq.litros_agua_ahorrados.round() as i64),
                format_fixed(eq.kwh_energia_ahorrada, 1),
            );
        }
    }

    if let Some(chart) = page.by_id(ids::CHART_RECICLAJES).and_then(|e| e.chart.as_ref()) {
        println!();
        println!("{}", "Reciclajes de la semana".bold());
        print_weekly_bars(chart);
    }

    print_top_recyclers(stats);
}

fn print_weekly_bars(chart: &ChartConfig) {
    let Some(dataset) = chart.data.datasets.first() else {
        return;
    };
    let max = dataset.data.iter().copied().fold(0.0_f64, f64::max);

    for (label, value) in chart.data.labels.iter().zip(&dataset.data) {
        let len = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        println!(
            "  {:<8} {} {}",
            label,
            "█".repeat(len).green(),
            format_number(*value as i64).dimmed()
        );
    }
}

fn print_top_recyclers(stats: &DashboardStats) {
    let Some(top) = stats.top_recicladores.as_ref().filter(|t| !t.is_empty()) else {
        return;
    };

    println!();
    println!("{}", "Top recicladores del mes".bold());
    println!(
        "  {:<4} {:<24} {:>10} {:>10}",
        "#".dimmed(),
        "Usuario".dimmed(),
        "Reciclajes".dimmed(),
        "Puntos".dimmed()
    );
    for entry in top {
        println!(
            "  {:<4} {:<24} {:>10} {:>10}",
            entry.posicion,
            truncate(&entry.usuario.display_name(), 24),
            format_number(entry.reciclajes_mes),
            format_number(entry.puntos_mes),
        );
    }
}

// ---------------------------------------------------------------------------
// ecorvm redeem
// ---------------------------------------------------------------------------

/// Redeem a reward and, on success, reload the dashboard after the
/// configured delay.
pub fn run_redeem(user_id: u64, reward_id: u64) -> Result<()> {
    let cfg = config::load();
    let client = ApiClient::from_config(&cfg.api);
    let mut notifier = ConsoleNotifier::stdout();
    let mut navigator = PendingReload::new();
    let mut console = console_for(&cfg, interactive());

    let outcome = actions::redeem_reward(
        &client,
        &mut notifier,
        &mut navigator,
        &mut console,
        user_id,
        reward_id,
        Duration::from_millis(cfg.ui.reload_delay_ms),
    );

    if let RedeemOutcome::Redeemed(response) = &outcome {
        console.info(&format!(
            "reward {reward_id} redeemed for user {user_id}: {}",
            response.codigo_canje.as_deref().unwrap_or("-")
        ));
        if let Some(mensaje) = &response.mensaje {
            println!("  {}", mensaje.dimmed());
        }
        if let Some(points) = response.puntos_restantes {
            println!("  {} {}", "Puntos restantes:".bold(), format_number(points));
        }
    }

    if let Some(delay) = navigator.take() {
        println!(
            "  {}",
            format!("Recargando en {}s…", format_fixed(delay.as_secs_f64(), 1)).dimmed()
        );
        thread::sleep(delay);
        println!();
        return run_dashboard(false, OutputFormat::Table);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// ecorvm format / chart-config
// ---------------------------------------------------------------------------

/// Print each value with thousands separators.
pub fn run_format(values: &[String]) {
    for value in values {
        println!("{}", format_number(value));
    }
}

/// Read a weekly mapping (`{"<date>": <count>, ...}`) and build its chart
/// configuration.
pub fn weekly_chart_config(path: &Path) -> Result<ChartConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let week: IndexMap<String, u64> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse weekly counts in {}", path.display()))?;
    Ok(recycling_chart_config(&week))
}

/// Print the Chart.js configuration for a weekly mapping file.
pub fn run_chart_config(path: &Path) -> Result<()> {
    let chart = weekly_chart_config(path)?;
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// ecorvm health
// ---------------------------------------------------------------------------

/// Check config files, backend reachability and the client log.
pub fn run_health() -> Result<()> {
    println!("{}", "ecorvm Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.ecorvm/config.toml found"
        } else {
            "not found (run `ecorvm config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".ecorvm.toml found"
        } else {
            "none (optional)"
        },
    );

    let client = ApiClient::from_config(&cfg.api);
    let api_ok = client.is_reachable();
    let api_detail = if api_ok {
        format!("reachable at {}", client.base_url())
    } else {
        format!("not reachable at {}", client.base_url())
    };
    print_health_item("Backend API", api_ok, &api_detail);

    let console = FileConsole::from_config(&cfg.logging);
    match console.path() {
        Some(path) => {
            let exists = path.exists();
            print_health_item(
                "Client log",
                exists,
                &if exists {
                    path.display().to_string()
                } else {
                    format!("{} (not written yet)", path.display())
                },
            );
        }
        None => print_health_item("Client log", false, "disabled"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// ecorvm config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective ecorvm Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.ecorvm/config.toml", global_exists);
    print_source(".ecorvm.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "ECORVM_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.ecorvm/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("Ñandú Pérez", 4), "Ñan…");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn counter_line_shows_settled_values() {
        colored::control::set_override(false);
        let mut page = Page::dashboard();
        actions::animate_number(&mut page, ids::TOTAL_PUNTOS, 12_000, Some(0.0), 0.0);
        page.advance_frame(0.0);
        let line = counter_line(&page);
        assert!(line.contains("12,000"));
        assert!(line.contains("Usuarios"));
    }

    fn logging_to(path: &Path) -> EcoConfig {
        let mut cfg = EcoConfig::default();
        cfg.logging.path = path.display().to_string();
        cfg
    }

    #[test]
    fn console_echoes_only_when_interactive() {
        let cfg = logging_to(&std::env::temp_dir().join("ecorvm-echo.log"));
        let quiet = format!("{:?}", console_for(&cfg, false));
        let loud = format!("{:?}", console_for(&cfg, true));
        assert!(quiet.contains("echo_stderr: false"));
        assert!(loud.contains("echo_stderr: true"));
    }

    #[test]
    fn load_failure_hint_points_at_log_only() {
        colored::control::set_override(false);
        let path = std::env::temp_dir().join("ecorvm-hint.log");
        let console = console_for(&logging_to(&path), false);

        let hint = load_failure_hint(&console).unwrap();
        assert!(hint.contains(&path.display().to_string()));
        assert!(!hint.contains(actions::DASHBOARD_LOAD_ERROR));

        let mut disabled = EcoConfig::default();
        disabled.logging.enabled = false;
        assert_eq!(load_failure_hint(&console_for(&disabled, false)), None);
    }

    #[test]
    fn weekly_chart_config_from_file() {
        let path = std::env::temp_dir().join(format!("ecorvm-week-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"2026-01-30": 15, "2026-01-31": 22}"#).unwrap();

        let chart = weekly_chart_config(&path).unwrap();
        assert_eq!(chart.data.labels, vec!["vie 30", "sáb 31"]);
        assert_eq!(chart.data.datasets[0].data, vec![15.0, 22.0]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn weekly_chart_config_reports_bad_json() {
        let path = std::env::temp_dir().join(format!("ecorvm-bad-{}.json", std::process::id()));
        std::fs::write(&path, "[1, 2").unwrap();

        let err = weekly_chart_config(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse weekly counts"));

        let _ = std::fs::remove_file(&path);
    }
}
