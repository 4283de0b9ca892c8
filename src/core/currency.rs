//! Exchange rate abstractions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Rates for every currency the provider knows, relative to `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
    /// Time the provider published these rates, if it told us.
    pub published_at: Option<DateTime<Utc>>,
}

impl RateTable {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Request error for base {base}: {source}")]
    Fetch {
        base: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for base {base}{}", detail_suffix(.message))]
    Status {
        base: String,
        status: reqwest::StatusCode,
        message: Option<String>,
    },

    #[error("Failed to parse rates response for base {base}: {source}")]
    Decode {
        base: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RateError {
    /// True for transport and status failures, false for malformed bodies.
    pub fn is_fetch(&self) -> bool {
        matches!(self, RateError::Fetch { .. } | RateError::Status { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, RateError::Decode { .. })
    }
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError>;
}
