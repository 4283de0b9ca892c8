use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::currency::{RateError, RateProvider, RateTable};

pub const DEFAULT_BASE_URL: &str = "https://openexchangerates.org";

// OpenExchangeRatesProvider implementation for RateProvider
pub struct OpenExchangeRatesProvider {
    endpoint: Url,
    app_id: String,
    client: reqwest::Client,
}

impl OpenExchangeRatesProvider {
    pub fn new(base_url: &str, app_id: &str, timeout: Duration) -> Result<Self> {
        let endpoint = format!("{}/api/latest.json", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .with_context(|| format!("Invalid rates endpoint: {endpoint}"))?;

        let client = reqwest::Client::builder()
            .user_agent("fxbot/1.0")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(OpenExchangeRatesProvider {
            endpoint,
            app_id: app_id.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    rates: HashMap<String, f64>,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    description: Option<String>,
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    #[instrument(
        name = "OpenExchangeRatesFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError> {
        // The query carries the credential, so only the bare endpoint is logged.
        debug!("Requesting latest rates from {}", self.endpoint);
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("app_id", &self.app_id)
            .append_pair("base", base);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RateError::Fetch {
                base: base.to_string(),
                source: e.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorResponse>(&body).ok())
                .and_then(|e| e.description.or(e.message));
            return Err(RateError::Status {
                base: base.to_string(),
                status,
                message,
            });
        }

        let text = response.text().await.map_err(|e| RateError::Fetch {
            base: base.to_string(),
            source: e.without_url(),
        })?;

        let data: LatestRatesResponse =
            serde_json::from_str(&text).map_err(|e| RateError::Decode {
                base: base.to_string(),
                source: e,
            })?;

        if data.base != base {
            warn!(
                requested = base,
                returned = %data.base,
                "Provider returned rates for a different base"
            );
        }
        debug!(count = data.rates.len(), "Received rate table");

        Ok(RateTable {
            base: data.base,
            rates: data.rates,
            published_at: data
                .timestamp
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const APP_ID: &str = "test-app-id";

    fn provider_for(server: &MockServer) -> OpenExchangeRatesProvider {
        OpenExchangeRatesProvider::new(&server.uri(), APP_ID, Duration::from_secs(5)).unwrap()
    }

    async fn mount_latest(server: &MockServer, base: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .and(query_param("app_id", APP_ID))
            .and(query_param("base", base))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "disclaimer": "Usage subject to terms",
            "license": "https://openexchangerates.org/license",
            "timestamp": 1700000000,
            "base": "USD",
            "rates": {
                "USD": 1.0,
                "EUR": 0.9,
                "JPY": 150.0
            }
        }"#;
        mount_latest(
            &mock_server,
            "USD",
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let table = provider_for(&mock_server)
            .fetch_rates("USD")
            .await
            .expect("Failed to fetch rates");

        assert_eq!(table.base, "USD");
        assert_eq!(table.rates.len(), 3);
        assert_eq!(table.rate("EUR"), Some(0.9));
        assert_eq!(table.rate("JPY"), Some(150.0));
        assert_eq!(
            table.published_at,
            Utc.timestamp_opt(1_700_000_000, 0).single()
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            "EUR",
            ResponseTemplate::new(200).set_body_string(r#"{"base":"EUR","rates":{"EUR":1.0}}"#),
        )
        .await;

        let base_url = format!("{}/", mock_server.uri());
        let provider =
            OpenExchangeRatesProvider::new(&base_url, APP_ID, Duration::from_secs(5)).unwrap();
        let table = provider.fetch_rates("EUR").await.unwrap();
        assert_eq!(table.rate("EUR"), Some(1.0));
        assert!(table.published_at.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_error() {
        let mock_server = MockServer::start().await;
        mount_latest(&mock_server, "USD", ResponseTemplate::new(500)).await;

        let err = provider_for(&mock_server)
            .fetch_rates("USD")
            .await
            .unwrap_err();

        assert!(err.is_fetch());
        assert_eq!(
            err.to_string(),
            "HTTP error: 500 Internal Server Error for base USD"
        );
    }

    #[tokio::test]
    async fn test_provider_error_description_is_kept() {
        let mock_server = MockServer::start().await;
        let body = r#"{
            "error": true,
            "status": 401,
            "message": "invalid_app_id",
            "description": "Invalid App ID provided."
        }"#;
        mount_latest(
            &mock_server,
            "USD",
            ResponseTemplate::new(401).set_body_string(body),
        )
        .await;

        let err = provider_for(&mock_server)
            .fetch_rates("USD")
            .await
            .unwrap_err();

        match &err {
            RateError::Status {
                status, message, ..
            } => {
                assert_eq!(*status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(message.as_deref(), Some("Invalid App ID provided."));
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_rates_is_decode_error() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            "USD",
            ResponseTemplate::new(200).set_body_string(r#"{"base": "USD"}"#),
        )
        .await;

        let err = provider_for(&mock_server)
            .fetch_rates("USD")
            .await
            .unwrap_err();

        assert!(err.is_decode());
        assert!(
            err.to_string()
                .contains("Failed to parse rates response for base USD")
        );
    }

    #[tokio::test]
    async fn test_non_numeric_rate_is_decode_error() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            "USD",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"base": "USD", "rates": {"EUR": "zero point nine"}}"#),
        )
        .await;

        let err = provider_for(&mock_server)
            .fetch_rates("USD")
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let mock_server = MockServer::start().await;
        mount_latest(
            &mock_server,
            "USD",
            ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        )
        .await;

        let err = provider_for(&mock_server)
            .fetch_rates("USD")
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        // Nothing listens on the discard port
        let provider =
            OpenExchangeRatesProvider::new("http://127.0.0.1:9", APP_ID, Duration::from_secs(5))
                .unwrap();

        let err = provider.fetch_rates("USD").await.unwrap_err();

        assert!(matches!(err, RateError::Fetch { .. }));
        assert!(!err.to_string().contains(APP_ID));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/latest.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"base":"USD","rates":{}}"#)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenExchangeRatesProvider::new(
            &mock_server.uri(),
            APP_ID,
            Duration::from_millis(100),
        )
        .unwrap();

        let err = provider.fetch_rates("USD").await.unwrap_err();
        match err {
            RateError::Fetch { source, .. } => assert!(source.is_timeout()),
            other => panic!("Expected fetch error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let result = OpenExchangeRatesProvider::new("not a url", APP_ID, Duration::from_secs(1));
        assert!(result.is_err());
    }
}
