//! User-facing dashboard actions.
//!
//! These functions tie the API client to the page: they make the request,
//! then report the result through the injected seams ([`Notifier`],
//! [`ChartSurface`](crate::charts::ChartSurface) via [`Page`], [`ConsoleLog`], [`Navigator`]).
//!
//! The two flows report failures differently. A failed redemption always
//! shows a toast, while a failed dashboard load is logged and nothing more.

use std::time::Duration;

use crate::animate::DEFAULT_DURATION_MS;
use crate::api::{ApiClient, DashboardStats, RedeemResponse};
use crate::charts::create_recycling_chart;
use crate::format::format_fixed;
use crate::logging::ConsoleLog;
use crate::notify::{Notifier, Severity};
use crate::page::{Page, ids};

pub const REDEEM_FALLBACK_ERROR: &str = "Error al canjear";
pub const CONNECTION_ERROR: &str = "Error de conexión";
pub const DASHBOARD_LOAD_ERROR: &str = "Error cargando estadísticas";

// ---------------------------------------------------------------------------
// Navigation seam
// ---------------------------------------------------------------------------

/// Reloads the current view.
pub trait Navigator {
    /// Ask for a full reload once `delay` has elapsed.
    fn schedule_reload(&mut self, delay: Duration);
}

/// Records the requested reload instead of acting on it. Drivers poll
/// [`PendingReload::take`] and perform the reload themselves.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PendingReload {
    delay: Option<Duration>,
}

impl PendingReload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Option<Duration> {
        self.delay.take()
    }

    pub fn is_pending(&self) -> bool {
        self.delay.is_some()
    }
}

impl Navigator for PendingReload {
    fn schedule_reload(&mut self, delay: Duration) {
        self.delay = Some(delay);
    }
}

// ---------------------------------------------------------------------------
// Redeem
// ---------------------------------------------------------------------------

/// Which branch a redemption took.
#[derive(Debug, Clone, PartialEq)]
pub enum RedeemOutcome {
    /// The server accepted the redemption.
    Redeemed(RedeemResponse),
    /// The server answered but refused. Holds the message shown to the user.
    Rejected(String),
    /// No usable answer: the request failed or the body was not JSON.
    ConnectionFailed,
}

impl RedeemOutcome {
    pub fn is_redeemed(&self) -> bool {
        matches!(self, Self::Redeemed(_))
    }
}

/// The success toast for a redemption code.
pub fn redeem_success_message(code: &str) -> String {
    format!("¡Canje exitoso! Código: {code}")
}

/// Redeem `reward_id` for `user_id`.
///
/// On success a success toast with the redemption code is shown and a reload
/// is scheduled after `reload_delay`. A refusal shows the server's error
/// message (or a generic one) as a danger toast. A connection failure shows
/// a generic danger toast and logs the cause. Only success schedules a
/// reload.
pub fn redeem_reward(
    client: &ApiClient,
    notifier: &mut dyn Notifier,
    navigator: &mut dyn Navigator,
    console: &mut dyn ConsoleLog,
    user_id: u64,
    reward_id: u64,
    reload_delay: Duration,
) -> RedeemOutcome {
    let response = match client.redeem(user_id, reward_id) {
        Ok(response) => response,
        Err(err) => {
            console.error("Error", &err);
            notifier.show_toast(CONNECTION_ERROR, Severity::Danger);
            return RedeemOutcome::ConnectionFailed;
        }
    };

    if response.succeeded() {
        let code = response.codigo_canje.as_deref().unwrap_or_default();
        notifier.show_toast(&redeem_success_message(code), Severity::Success);
        navigator.schedule_reload(reload_delay);
        return RedeemOutcome::Redeemed(response);
    }

    let message = response
        .error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| REDEEM_FALLBACK_ERROR.to_string());
    notifier.show_toast(&message, Severity::Danger);
    RedeemOutcome::Rejected(message)
}

// ---------------------------------------------------------------------------
// Stat elements
// ---------------------------------------------------------------------------

/// A value destined for a stat element.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    /// Counted up from zero with the number animation.
    Number(i64),
    /// Written as-is.
    Text(String),
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for StatValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Animate the element `element_id` from 0 to `target`.
///
/// Returns `false` (and does nothing) if the element does not exist.
pub fn animate_number(
    page: &mut Page,
    element_id: &str,
    target: i64,
    duration_ms: Option<f64>,
    now_ms: f64,
) -> bool {
    let Some(node) = page.element_by_id(element_id) else {
        return false;
    };
    page.animate_number(node, target, duration_ms.unwrap_or(DEFAULT_DURATION_MS), now_ms);
    true
}

/// Update one stat element. Missing elements are skipped.
pub fn update_stat_element(
    page: &mut Page,
    element_id: &str,
    value: StatValue,
    duration_ms: f64,
    now_ms: f64,
) -> bool {
    match value {
        StatValue::Number(n) => animate_number(page, element_id, n, Some(duration_ms), now_ms),
        StatValue::Text(text) => match page.by_id_mut(element_id) {
            Some(element) => {
                element.text = text;
                true
            }
            None => false,
        },
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// What [`apply_dashboard_stats`] changed on the page.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DashboardUpdate {
    /// Stat elements that were animated or rewritten.
    pub updated: Vec<&'static str>,
    pub chart_drawn: bool,
}

/// A dashboard payload and what applying it did.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDashboard {
    pub stats: DashboardStats,
    pub update: DashboardUpdate,
}

/// Fetch `/api/stats/dashboard` and apply it to `page`.
///
/// Failures are logged to `console` and otherwise ignored; the page is left
/// as it was.
pub fn load_dashboard_stats(
    client: &ApiClient,
    page: &mut Page,
    console: &mut dyn ConsoleLog,
    duration_ms: f64,
    now_ms: f64,
) -> Option<LoadedDashboard> {
    match client.dashboard_stats() {
        Ok(stats) => {
            let update = apply_dashboard_stats(page, &stats, duration_ms, now_ms);
            Some(LoadedDashboard { stats, update })
        }
        Err(err) => {
            console.error(DASHBOARD_LOAD_ERROR, &err);
            None
        }
    }
}

/// Write a dashboard payload into the page.
///
/// Counters are animated, environmental figures get two decimals, and the
/// weekly chart is drawn only when the payload carries weekly data.
pub fn apply_dashboard_stats(
    page: &mut Page,
    stats: &DashboardStats,
    duration_ms: f64,
    now_ms: f64,
) -> DashboardUpdate {
    let mut update = DashboardUpdate::default();
    let mut set = |page: &mut Page, id: &'static str, value: StatValue| {
        if update_stat_element(page, id, value, duration_ms, now_ms) {
            update.updated.push(id);
        }
    };

    if let Some(general) = &stats.estadisticas {
        set(page, ids::TOTAL_USUARIOS, general.total_usuarios.into());
        set(page, ids::TOTAL_TRANSACCIONES, general.total_transacciones.into());
        set(page, ids::TOTAL_PUNTOS, general.total_puntos_sistema.into());
    }

    if let Some(impact) = &stats.impacto_ambiental {
        set(page, ids::CO2_EVITADO, format_fixed(impact.co2_evitado_kg, 2).into());
        set(page, ids::PESO_RECICLADO, format_fixed(impact.peso_reciclado_kg, 2).into());
    }

    if let Some(week) = &stats.reciclajes_semana {
        update.chart_drawn = create_recycling_chart(page, ids::CHART_RECICLAJES, week);
    }

    update
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
