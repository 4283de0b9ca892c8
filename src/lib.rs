pub mod bot;
pub mod cli;
pub mod core;
pub mod providers;

use crate::bot::convert::ConvertCommand;
use crate::bot::{CommandRouter, Reply};
use crate::core::config::AppConfig;
use crate::core::Converter;
use crate::providers::open_exchange_rates::OpenExchangeRatesProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        from: String,
        to: String,
        value: f64,
        json: bool,
    },
    Commands,
}

/// Wires provider, converter and command handlers from the configuration.
pub fn build_router(config: &AppConfig) -> Result<CommandRouter> {
    let oxr = &config.providers.open_exchange_rates;
    let provider = OpenExchangeRatesProvider::new(&oxr.base_url, &config.app_id()?, oxr.timeout())?;

    let converter = Converter::new(Arc::new(provider))
        .with_strategy(config.conversion.strategy, &config.conversion.pivot);
    debug!(strategy = ?converter.strategy(), "Built converter");

    Ok(CommandRouter::new().register(Arc::new(ConvertCommand::new(
        converter,
        config.display.style,
    ))))
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        strategy = ?config.conversion.strategy,
        style = ?config.display.style,
        base_url = %config.providers.open_exchange_rates.base_url,
        "Loaded config"
    );
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<Option<Reply>> {
    info!("fxbot starting...");

    let config = load_config(config_path)?;
    let router = build_router(&config)?;

    match command {
        AppCommand::Convert {
            from,
            to,
            value,
            json,
        } => cli::convert::run(&router, &from, &to, value, json)
            .await
            .map(Some),
        AppCommand::Commands => {
            println!(
                "{}",
                serde_json::to_string_pretty(&router.registration_payloads())?
            );
            Ok(None)
        }
    }
}
