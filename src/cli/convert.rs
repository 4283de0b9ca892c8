use super::ui;
use crate::bot::convert::{INVALID_CURRENCY, INVALID_VALUE, RATES_UNAVAILABLE};
use crate::bot::{CommandInvocation, CommandRouter, OptionValue, Reply};
use anyhow::{Result, anyhow};

impl Reply {
    /// Renders the reply the way a chat client would show it, for a terminal.
    pub fn display_in_terminal(&self) -> String {
        match self {
            Reply::Text(content) => {
                let is_failure = [INVALID_VALUE, INVALID_CURRENCY, RATES_UNAVAILABLE]
                    .contains(&content.as_str());
                if is_failure {
                    ui::style_text(content, ui::StyleType::Error)
                } else {
                    content.clone()
                }
            }
            Reply::Embed(embed) => {
                let mut output = ui::style_text(&embed.title, ui::StyleType::Title);
                for field in &embed.fields {
                    output.push('\n');
                    output.push_str(&ui::style_text(&field.value, ui::StyleType::Value));
                }
                if let Some(footer) = &embed.footer {
                    output.push_str("\n\n");
                    output.push_str(&ui::style_text(&footer.text, ui::StyleType::Subtle));
                }
                output
            }
        }
    }
}

pub fn invocation(from: &str, to: &str, value: f64) -> CommandInvocation {
    CommandInvocation::new("convert")
        .with_option("from", OptionValue::String(from.to_string()))
        .with_option("to", OptionValue::String(to.to_string()))
        .with_option("value", OptionValue::Number(value))
}

/// Runs the `convert` command through the router and prints its reply.
pub async fn run(
    router: &CommandRouter,
    from: &str,
    to: &str,
    value: f64,
    json: bool,
) -> Result<Reply> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let result = router.dispatch(&invocation(from, to, value)).await;
    spinner.finish_and_clear();

    let reply = result.ok_or_else(|| anyhow!("The convert command is not registered"))??;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reply.to_interaction_response())?
        );
    } else {
        println!("{}", reply.display_in_terminal());
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{Embed, EmbedField, EmbedFooter};

    #[test]
    fn test_display_embed() {
        let reply = Reply::Embed(Embed {
            title: "$100.00 USD to EUR is:".to_string(),
            fields: vec![EmbedField {
                name: "EUR".to_string(),
                value: "€90.00 EUR".to_string(),
                inline: false,
            }],
            color: 0xDDBD46,
            footer: Some(EmbedFooter {
                text: "Rates as of 2023-11-14 22:13 UTC".to_string(),
            }),
        });

        let rendered = reply.display_in_terminal();
        assert_eq!(
            console::strip_ansi_codes(&rendered),
            "$100.00 USD to EUR is:\n€90.00 EUR\n\nRates as of 2023-11-14 22:13 UTC"
        );
    }

    #[test]
    fn test_display_text() {
        let rendered = Reply::text(INVALID_CURRENCY).display_in_terminal();
        assert_eq!(console::strip_ansi_codes(&rendered), "Invalid currency.");
    }

    #[test]
    fn test_invocation_options() {
        let invocation = invocation("usd", "eur", 12.5);
        assert_eq!(invocation.name, "convert");
        assert_eq!(invocation.string("from").unwrap(), "usd");
        assert_eq!(invocation.string("to").unwrap(), "eur");
        assert_eq!(invocation.number("value").unwrap(), 12.5);
    }
}
