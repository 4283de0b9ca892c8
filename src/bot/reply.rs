//! Replies produced by command handlers.

use serde::Serialize;
use serde_json::{Value, json};

/// Interaction response type that posts a message in the channel.
const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub fields: Vec<EmbedField>,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Embed(Embed),
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text(content.into())
    }

    pub fn to_interaction_response(&self) -> Value {
        let data = match self {
            Reply::Text(content) => json!({ "content": content }),
            Reply::Embed(embed) => json!({ "embeds": [embed] }),
        };
        json!({
            "type": CHANNEL_MESSAGE_WITH_SOURCE,
            "data": data,
        })
    }
}
