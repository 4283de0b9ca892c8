//! Command surface of the bot: definitions, handlers and routing.
//!
//! Transport (gateway sessions, registering commands, posting responses) belongs to
//! the hosting chat SDK. This module only turns a [`CommandInvocation`] into a [`Reply`].

pub mod command;
pub mod convert;
pub mod reply;

pub use command::{CommandDefinition, CommandInvocation, OptionType, OptionValue};
pub use reply::{Embed, EmbedField, EmbedFooter, Reply};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn definition(&self) -> &CommandDefinition;

    async fn handle(&self, invocation: &CommandInvocation) -> Result<Reply>;
}

#[derive(Default, Clone)]
pub struct CommandRouter {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        let name = handler.definition().name.clone();
        self.handlers.insert(name, handler);
        self
    }

    pub fn definitions(&self) -> Vec<&CommandDefinition> {
        self.handlers.values().map(|h| h.definition()).collect()
    }

    pub fn registration_payloads(&self) -> Vec<Value> {
        self.definitions()
            .into_iter()
            .map(CommandDefinition::registration_payload)
            .collect()
    }

    /// Runs the handler registered for the invocation. Unregistered commands yield `None`.
    pub async fn dispatch(&self, invocation: &CommandInvocation) -> Option<Result<Reply>> {
        let Some(handler) = self.handlers.get(&invocation.name) else {
            debug!(command = %invocation.name, "Ignoring unregistered command");
            return None;
        };
        Some(handler.handle(invocation).await)
    }
}
