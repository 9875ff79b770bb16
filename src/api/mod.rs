/// HTTP client for the Eco-RVM backend.
///
/// Talks to the two endpoints the dashboard uses with the synchronous `ureq`
/// client:
///
/// - **Redeem**: `POST /api/rewards/redeem` with `{usuario_id, recompensa_id}`
/// - **Dashboard**: `GET /api/stats/dashboard`
///
/// An HTTP error status is not a transport failure: the backend reports
/// business errors (already redeemed, not enough points) as 4xx responses
/// with a JSON body, and that body is decoded exactly like a 2xx one. Only
/// connection problems and undecodable bodies surface as `Err`.
pub mod types;

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::config::schema::ApiConfig;

pub use types::{
    DashboardStats, EnvironmentalImpact, Equivalences, GeneralStats, RecyclerUser,
    RedeemRequest, RedeemResponse, TopRecycler,
};

pub const REDEEM_PATH: &str = "/api/rewards/redeem";
pub const DASHBOARD_PATH: &str = "/api/stats/dashboard";

/// Timeout used by [`ApiClient::is_reachable`], independent of the
/// configured request timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous backend client. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Build a client from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/rewards/redeem`.
    pub fn redeem(&self, user_id: u64, reward_id: u64) -> Result<RedeemResponse> {
        let body = RedeemRequest {
            usuario_id: user_id,
            recompensa_id: reward_id,
        };

        let result = ureq::post(&self.url(REDEEM_PATH))
            .timeout(self.timeout)
            .send_json(body);

        decode_json(result, "redeem")
    }

    /// `GET /api/stats/dashboard`.
    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        let result = ureq::get(&self.url(DASHBOARD_PATH))
            .timeout(self.timeout)
            .call();

        decode_json(result, "dashboard stats")
    }

    /// Whether the dashboard endpoint answers with any HTTP response within a
    /// short timeout.
    pub fn is_reachable(&self) -> bool {
        let result = ureq::get(&self.url(DASHBOARD_PATH))
            .timeout(PROBE_TIMEOUT)
            .call();

        !matches!(result, Err(ureq::Error::Transport(_)))
    }
}

/// Decode the JSON body of a response, whatever its status code.
fn decode_json<T: DeserializeOwned>(
    result: std::result::Result<ureq::Response, ureq::Error>,
    what: &str,
) -> Result<T> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(err) => return Err(err).with_context(|| format!("{what} request failed")),
    };

    let status = response.status();
    response
        .into_json::<T>()
        .with_context(|| format!("failed to parse {what} response (HTTP {status})"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let client = ApiClient::from_config(&ApiConfig::default());
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.timeout, Duration::from_millis(30_000));
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = ApiClient::new("http://rvm.local:8080/", Duration::from_secs(1));
        assert_eq!(client.url(REDEEM_PATH), "http://rvm.local:8080/api/rewards/redeem");
        assert_eq!(client.url(DASHBOARD_PATH), "http://rvm.local:8080/api/stats/dashboard");
    }

    #[test]
    fn unreachable_host_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}"), Duration::from_millis(500));
        let err = client.dashboard_stats().unwrap_err();
        assert!(err.to_string().contains("dashboard stats request failed"));
        assert!(!client.is_reachable());
    }
}
