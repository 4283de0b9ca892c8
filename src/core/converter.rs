//! Currency conversion on top of a [`RateProvider`].

use super::currency::{RateError, RateProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a conversion obtains its rate from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStrategy {
    /// Fetch rates based on the source currency and read the destination rate.
    #[default]
    Base,
    /// Fetch rates based on a fixed pivot currency and divide the two legs.
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Converted {
        value: f64,
        /// Units of the destination currency per unit of the source.
        rate: f64,
        published_at: Option<DateTime<Utc>>,
    },
    /// The provider's table has no entry for `code`.
    UnknownCurrency { code: String },
    /// The provider listed `code` with a rate that cannot be divided by.
    UnusableRate { code: String, rate: f64 },
}

impl Conversion {
    pub fn value(&self) -> Option<f64> {
        match self {
            Conversion::Converted { value, .. } => Some(*value),
            Conversion::UnknownCurrency { .. } | Conversion::UnusableRate { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct Converter {
    provider: Arc<dyn RateProvider>,
    strategy: ConversionStrategy,
    pivot: String,
}

impl Converter {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self {
            provider,
            strategy: ConversionStrategy::Base,
            pivot: "USD".to_string(),
        }
    }

    pub fn with_strategy(mut self, strategy: ConversionStrategy, pivot: &str) -> Self {
        self.strategy = strategy;
        self.pivot = pivot.to_string();
        self
    }

    pub fn strategy(&self) -> ConversionStrategy {
        self.strategy
    }

    /// Converts `amount` of `from` into `to`. Codes must already be normalized.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, RateError> {
        match self.strategy {
            ConversionStrategy::Base => self.convert_based(from, to, amount).await,
            ConversionStrategy::Cross => self.convert_cross(from, to, amount).await,
        }
    }

    async fn convert_based(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, RateError> {
        let table = self.provider.fetch_rates(from).await?;

        let Some(rate) = table.rate(to) else {
            debug!(from, to, "Destination currency missing from rate table");
            return Ok(Conversion::UnknownCurrency {
                code: to.to_string(),
            });
        };

        Ok(Conversion::Converted {
            value: amount * rate,
            rate,
            published_at: table.published_at,
        })
    }

    async fn convert_cross(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, RateError> {
        let table = self.provider.fetch_rates(&self.pivot).await?;

        let from_rate = match table.rate(from) {
            Some(rate) if rate > 0.0 => rate,
            Some(rate) => {
                warn!(from, rate, pivot = %self.pivot, "Source rate is not positive");
                return Ok(Conversion::UnusableRate {
                    code: from.to_string(),
                    rate,
                });
            }
            None => {
                debug!(from, pivot = %self.pivot, "Source currency missing from rate table");
                return Ok(Conversion::UnknownCurrency {
                    code: from.to_string(),
                });
            }
        };
        let Some(to_rate) = table.rate(to) else {
            debug!(to, pivot = %self.pivot, "Destination currency missing from rate table");
            return Ok(Conversion::UnknownCurrency {
                code: to.to_string(),
            });
        };

        let rate = to_rate / from_rate;
        Ok(Conversion::Converted {
            value: amount * rate,
            rate,
            published_at: table.published_at,
        })
    }
}
