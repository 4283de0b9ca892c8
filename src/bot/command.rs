//! Slash command definitions and the options a user sends with an invocation.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};

/// Chat input ("slash") command.
const CHAT_INPUT_COMMAND: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    String,
    Number,
}

impl OptionType {
    /// Numeric option type used by the platform's registration API.
    pub fn code(self) -> u8 {
        match self {
            OptionType::String => 3,
            OptionType::Number => 10,
        }
    }
}

impl Serialize for OptionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDefinition {
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub name: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionDefinition>,
}

impl CommandDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        CommandDefinition {
            name: name.to_string(),
            description: description.to_string(),
            options: Vec::new(),
        }
    }

    pub fn required_option(
        mut self,
        option_type: OptionType,
        name: &str,
        description: &str,
    ) -> Self {
        self.options.push(OptionDefinition {
            option_type,
            name: name.to_string(),
            description: description.to_string(),
            required: true,
        });
        self
    }

    /// Payload submitted to the platform when registering this command.
    pub fn registration_payload(&self) -> Value {
        json!({
            "type": CHAT_INPUT_COMMAND,
            "name": self.name,
            "description": self.description,
            "options": self.options,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationOption {
    pub name: String,
    pub value: OptionValue,
}

/// The command data delivered with an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub name: String,
    #[serde(default)]
    pub options: Vec<InvocationOption>,
}

impl CommandInvocation {
    pub fn new(name: &str) -> Self {
        CommandInvocation {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, name: &str, value: OptionValue) -> Self {
        self.options.push(InvocationOption {
            name: name.to_string(),
            value,
        });
        self
    }

    fn option(&self, name: &str) -> Result<&OptionValue> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
            .ok_or_else(|| anyhow!("Missing option '{}' for command '{}'", name, self.name))
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        match self.option(name)? {
            OptionValue::String(s) => Ok(s),
            OptionValue::Number(_) => Err(anyhow!("Option '{}' is not a string", name)),
        }
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        match self.option(name)? {
            OptionValue::Number(n) => Ok(*n),
            OptionValue::String(_) => Err(anyhow!("Option '{}' is not a number", name)),
        }
    }
}
