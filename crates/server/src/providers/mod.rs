//! External provider adapters
//!
//! One adapter per third-party API. Each builds a request, applies its
//! API key from config, parses the JSON payload into an internal shape,
//! and substitutes a deterministic default when the call fails.
//! Transport failures get at most one retry.

pub mod places;
pub mod traffic;
pub mod weather;

pub use places::{PlaceRecord, PlacesClient};
pub use traffic::TrafficClient;
pub use weather::WeatherClient;

use std::time::Duration;

const USER_AGENT: &str = "er-wait-predictor/1.0";

/// Shared HTTP client with the configured per-request timeout.
pub fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Issue a GET, retrying once on transport failure.
pub(crate) async fn get_with_retry(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<reqwest::Response, reqwest::Error> {
    match client.get(url).query(query).send().await {
        Ok(response) => Ok(response),
        Err(first) => {
            tracing::debug!(error = %first, url, "Provider request failed, retrying");
            client.get(url).query(query).send().await
        }
    }
}
