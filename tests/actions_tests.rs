/// Integration tests for the redeem and dashboard flows.
///
/// Each test serves canned responses from a `tiny_http` server bound to an
/// ephemeral port, points an `ApiClient` at it, and checks what the user
/// would see: toasts, page contents, scheduled reloads and console lines.
use std::io::Read;
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ecorvm::actions::{
    self, CONNECTION_ERROR, DASHBOARD_LOAD_ERROR, PendingReload, REDEEM_FALLBACK_ERROR,
    RedeemOutcome,
};
use ecorvm::api::{ApiClient, RedeemRequest};
use ecorvm::logging::{ConsoleLog, Level};
use ecorvm::notify::{Notifier, Severity, ToastPhase};
use ecorvm::page::{Page, ids};
use tiny_http::{Header, Response, Server, StatusCode};

const RELOAD_DELAY: Duration = Duration::from_millis(2000);

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Recorded {
    method: String,
    url: String,
    body: String,
}

struct MockApi {
    client: ApiClient,
    handle: JoinHandle<Vec<Recorded>>,
}

impl MockApi {
    /// Serve one canned `(status, body)` per incoming request, in order.
    fn serve(responses: Vec<(u16, &'static str)>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let mut request = server.recv().unwrap();
                let mut content = String::new();
                let _ = request.as_reader().read_to_string(&mut content);
                seen.push(Recorded {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    body: content,
                });

                let response = Response::from_data(body.as_bytes().to_vec())
                    .with_header(
                        Header::from_bytes("Content-Type", "application/json").unwrap(),
                    )
                    .with_status_code(StatusCode(status));
                let _ = request.respond(response);
            }
            seen
        });

        Self {
            client: ApiClient::new(&format!("http://{addr}"), Duration::from_secs(5)),
            handle,
        }
    }

    fn finish(self) -> Vec<Recorded> {
        self.handle.join().unwrap()
    }
}

/// A client for a port nothing listens on.
fn refused_client() -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ApiClient::new(&format!("http://{addr}"), Duration::from_secs(2))
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RecordingNotifier {
    toasts: Vec<(String, Severity)>,
}

impl Notifier for RecordingNotifier {
    fn show_toast(&mut self, message: &str, severity: Severity) {
        self.toasts.push((message.to_string(), severity));
    }
}

#[derive(Debug, Default)]
struct RecordingConsole {
    lines: Vec<(Level, String)>,
}

impl ConsoleLog for RecordingConsole {
    fn log(&mut self, level: Level, message: &str) {
        self.lines.push((level, message.to_string()));
    }
}

fn redeem(
    client: &ApiClient,
    user_id: u64,
    reward_id: u64,
) -> (RedeemOutcome, RecordingNotifier, PendingReload, RecordingConsole) {
    let mut notifier = RecordingNotifier::default();
    let mut navigator = PendingReload::new();
    let mut console = RecordingConsole::default();
    let outcome = actions::redeem_reward(
        client,
        &mut notifier,
        &mut navigator,
        &mut console,
        user_id,
        reward_id,
        RELOAD_DELAY,
    );
    (outcome, notifier, navigator, console)
}

// ---------------------------------------------------------------------------
// Redeem
// ---------------------------------------------------------------------------

#[test]
fn redeem_success_shows_code_and_schedules_reload() {
    let api = MockApi::serve(vec![(
        200,
        r#"{"exito": true, "codigo_canje": "ABC123", "puntos_restantes": 150}"#,
    )]);

    let (outcome, notifier, mut navigator, console) = redeem(&api.client, 1, 5);

    assert!(outcome.is_redeemed());
    assert_eq!(notifier.toasts.len(), 1);
    let (message, severity) = &notifier.toasts[0];
    assert!(message.contains("ABC123"));
    assert_eq!(message, "¡Canje exitoso! Código: ABC123");
    assert_eq!(*severity, Severity::Success);
    assert_eq!(navigator.take(), Some(RELOAD_DELAY));
    assert!(console.lines.is_empty());

    let seen = api.finish();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].url, "/api/rewards/redeem");
    let body: RedeemRequest = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(
        body,
        RedeemRequest {
            usuario_id: 1,
            recompensa_id: 5
        }
    );
}

#[test]
fn redeem_rejection_shows_server_error() {
    let api = MockApi::serve(vec![(200, r#"{"exito": false, "error": "Ya canjeado"}"#)]);

    let (outcome, notifier, navigator, _) = redeem(&api.client, 1, 5);

    assert_eq!(outcome, RedeemOutcome::Rejected("Ya canjeado".to_string()));
    assert_eq!(
        notifier.toasts,
        vec![("Ya canjeado".to_string(), Severity::Danger)]
    );
    assert!(!navigator.is_pending());
    api.finish();
}

#[test]
fn redeem_error_status_body_is_still_read() {
    let api = MockApi::serve(vec![(400, r#"{"error": "Puntos insuficientes"}"#)]);

    let (outcome, notifier, navigator, console) = redeem(&api.client, 2, 9);

    assert_eq!(
        outcome,
        RedeemOutcome::Rejected("Puntos insuficientes".to_string())
    );
    assert_eq!(notifier.toasts[0].1, Severity::Danger);
    assert!(!navigator.is_pending());
    assert!(console.lines.is_empty());
    api.finish();
}

#[test]
fn redeem_rejection_without_message_uses_generic_text() {
    let api = MockApi::serve(vec![(404, r#"{"exito": false}"#)]);

    let (outcome, notifier, _, _) = redeem(&api.client, 1, 99);

    assert_eq!(
        outcome,
        RedeemOutcome::Rejected(REDEEM_FALLBACK_ERROR.to_string())
    );
    assert_eq!(notifier.toasts[0].0, "Error al canjear");
    api.finish();
}

#[test]
fn redeem_connection_failure_shows_generic_error_without_reload() {
    let (outcome, notifier, navigator, console) = redeem(&refused_client(), 1, 5);

    assert_eq!(outcome, RedeemOutcome::ConnectionFailed);
    assert_eq!(
        notifier.toasts,
        vec![(CONNECTION_ERROR.to_string(), Severity::Danger)]
    );
    assert!(!navigator.is_pending());
    assert_eq!(console.lines.len(), 1);
    assert_eq!(console.lines[0].0, Level::Error);
    assert!(console.lines[0].1.starts_with("Error: redeem request failed"));
}

#[test]
fn redeem_non_json_body_is_a_connection_failure() {
    let api = MockApi::serve(vec![(500, "<h1>Internal Server Error</h1>")]);

    let (outcome, notifier, navigator, console) = redeem(&api.client, 1, 5);

    assert_eq!(outcome, RedeemOutcome::ConnectionFailed);
    assert_eq!(notifier.toasts[0].0, "Error de conexión");
    assert!(!navigator.is_pending());
    assert!(console.lines[0].1.contains("failed to parse redeem response"));
    api.finish();
}

#[test]
fn redeem_toast_lands_in_page_container() {
    let api = MockApi::serve(vec![(200, r#"{"exito": true, "codigo_canje": "XYZ"}"#)]);
    let mut page = Page::new();
    let mut navigator = PendingReload::new();
    let mut console = RecordingConsole::default();

    actions::redeem_reward(
        &api.client,
        &mut page,
        &mut navigator,
        &mut console,
        3,
        4,
        RELOAD_DELAY,
    );

    let container = page.toast_container().unwrap();
    assert!(container.has_class("position-fixed"));
    let toast = page.toasts().last().unwrap();
    assert_eq!(toast.message, "¡Canje exitoso! Código: XYZ");
    assert_eq!(
        toast.class_name(),
        "toast align-items-center text-white bg-success border-0"
    );
    assert_eq!(toast.phase, ToastPhase::Showing);
    api.finish();
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

const FULL_DASHBOARD: &str = r#"{
    "estadisticas": {"total_usuarios": 50, "total_transacciones": 1200,
                     "total_puntos_sistema": 1234567},
    "impacto_ambiental": {"co2_evitado_kg": 91.0, "peso_reciclado_kg": 45.456},
    "reciclajes_semana": {"2026-01-26": 12, "2026-01-27": 0, "2026-01-28": 30}
}"#;

#[test]
fn dashboard_updates_counters_impact_and_chart() {
    let api = MockApi::serve(vec![(200, FULL_DASHBOARD)]);
    let mut page = Page::dashboard();
    let mut console = RecordingConsole::default();

    let loaded =
        actions::load_dashboard_stats(&api.client, &mut page, &mut console, 1000.0, 0.0).unwrap();

    assert!(loaded.update.chart_drawn);
    assert_eq!(page.text_of(ids::CO2_EVITADO), Some("91.00"));
    assert_eq!(page.text_of(ids::PESO_RECICLADO), Some("45.46"));

    page.advance_frame(500.0);
    let midway = page.text_of(ids::TOTAL_PUNTOS).unwrap().to_string();
    assert_ne!(midway, "1,234,567");

    page.advance_frame(1000.0);
    assert_eq!(page.text_of(ids::TOTAL_USUARIOS), Some("50"));
    assert_eq!(page.text_of(ids::TOTAL_TRANSACCIONES), Some("1,200"));
    assert_eq!(page.text_of(ids::TOTAL_PUNTOS), Some("1,234,567"));
    assert!(page.is_settled());

    let chart = page.by_id(ids::CHART_RECICLAJES).unwrap().chart.clone().unwrap();
    assert_eq!(chart.data.labels, vec!["lun 26", "mar 27", "mié 28"]);
    assert_eq!(chart.data.datasets[0].data, vec![12.0, 0.0, 30.0]);
    assert!(console.lines.is_empty());

    let seen = api.finish();
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].url, "/api/stats/dashboard");
}

#[test]
fn dashboard_without_weekly_data_skips_chart() {
    let api = MockApi::serve(vec![(
        200,
        r#"{"estadisticas": {"total_usuarios": 7, "total_transacciones": 3,
                             "total_puntos_sistema": 90}}"#,
    )]);
    let mut page = Page::dashboard();
    let mut console = RecordingConsole::default();

    let loaded =
        actions::load_dashboard_stats(&api.client, &mut page, &mut console, 0.0, 0.0).unwrap();
    page.advance_frame(0.0);

    assert!(!loaded.update.chart_drawn);
    assert!(page.by_id(ids::CHART_RECICLAJES).unwrap().chart.is_none());
    assert_eq!(page.text_of(ids::TOTAL_USUARIOS), Some("7"));
    assert_eq!(page.text_of(ids::TOTAL_PUNTOS), Some("90"));
    // Impact figures were not sent, so they keep their placeholder.
    assert_eq!(page.text_of(ids::CO2_EVITADO), Some("0.00"));
    api.finish();
}

#[test]
fn dashboard_skips_missing_elements() {
    let api = MockApi::serve(vec![(200, FULL_DASHBOARD)]);
    let mut page = Page::new();
    let mut console = RecordingConsole::default();

    let loaded =
        actions::load_dashboard_stats(&api.client, &mut page, &mut console, 1000.0, 0.0).unwrap();

    assert!(loaded.update.updated.is_empty());
    assert!(!loaded.update.chart_drawn);
    assert_eq!(page.running_animations(), 0);
    api.finish();
}

#[test]
fn dashboard_failure_is_logged_only() {
    let mut page = Page::dashboard();
    let mut console = RecordingConsole::default();

    let loaded =
        actions::load_dashboard_stats(&refused_client(), &mut page, &mut console, 1000.0, 0.0);

    assert!(loaded.is_none());
    assert!(page.toasts().is_empty());
    assert!(page.toast_container().is_none());
    assert_eq!(page.text_of(ids::TOTAL_USUARIOS), Some("0"));
    assert_eq!(console.lines.len(), 1);
    assert!(console.lines[0].1.starts_with(DASHBOARD_LOAD_ERROR));
}
