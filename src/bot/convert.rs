use anyhow::Result;
use async_trait::async_trait;
use std::sync::LazyLock;
use tracing::{debug, error, instrument, warn};

use super::command::{CommandDefinition, CommandInvocation, OptionType};
use super::reply::{Embed, EmbedField, EmbedFooter, Reply};
use super::CommandHandler;
use crate::core::{Conversion, Converter, DisplayStyle, format_amount};

pub const INVALID_VALUE: &str = "Invalid value.";
pub const INVALID_CURRENCY: &str = "Invalid currency.";
pub const RATES_UNAVAILABLE: &str = "Something went wrong while fetching exchange rates.";

const EMBED_COLOR: u32 = 0xDDBD46;

static DEFINITION: LazyLock<CommandDefinition> = LazyLock::new(|| {
    CommandDefinition::new("convert", "Convert between two currencies")
        .required_option(OptionType::String, "from", "The base currency to convert from")
        .required_option(OptionType::String, "to", "The ending currency to convert to")
        .required_option(OptionType::Number, "value", "The amount you want to convert")
});

pub struct ConvertCommand {
    converter: Converter,
    style: DisplayStyle,
}

impl ConvertCommand {
    pub fn new(converter: Converter, style: DisplayStyle) -> Self {
        Self { converter, style }
    }
}

#[async_trait]
impl CommandHandler for ConvertCommand {
    fn definition(&self) -> &CommandDefinition {
        &DEFINITION
    }

    #[instrument(name = "ConvertCommand", skip_all)]
    async fn handle(&self, invocation: &CommandInvocation) -> Result<Reply> {
        let from = invocation.string("from")?.trim().to_uppercase();
        let to = invocation.string("to")?.trim().to_uppercase();
        let value = invocation.number("value")?;
        debug!(%from, %to, value, "Handling convert command");

        if !value.is_finite() || value <= 0.0 {
            return Ok(Reply::text(INVALID_VALUE));
        }

        let conversion = match self.converter.convert(&from, &to, value).await {
            Ok(conversion) => conversion,
            Err(e) => {
                error!(error = %e, %from, %to, "Currency conversion failed");
                return Ok(Reply::text(RATES_UNAVAILABLE));
            }
        };

        match conversion {
            Conversion::UnknownCurrency { code } => {
                debug!(%code, "Currency not recognized by provider");
                Ok(Reply::text(INVALID_CURRENCY))
            }
            Conversion::UnusableRate { code, rate } => {
                warn!(%code, rate, "Provider returned an unusable rate");
                Ok(Reply::text(RATES_UNAVAILABLE))
            }
            Conversion::Converted {
                value: converted,
                published_at,
                ..
            } => Ok(Reply::Embed(Embed {
                title: format!("{} to {} is:", format_amount(&from, value, self.style), to),
                fields: vec![EmbedField {
                    name: to.clone(),
                    value: format_amount(&to, converted, self.style),
                    inline: false,
                }],
                color: EMBED_COLOR,
                footer: published_at.map(|ts| EmbedFooter {
                    text: format!("Rates as of {}", ts.format("%Y-%m-%d %H:%M UTC")),
                }),
            })),
        }
    }
}
