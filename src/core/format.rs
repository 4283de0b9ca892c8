//! Display formatting for currency amounts.

use iso_currency::Currency;
use serde::{Deserialize, Serialize};
use thousands::Separable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// Currency symbol, minor-unit precision and digit grouping, e.g. `$1,234.50 USD`.
    #[default]
    Symbol,
    /// Two decimals followed by the code, e.g. `1234.50 USD`.
    Plain,
}

const FALLBACK_SCALE: usize = 2;

/// Formats `value` as an amount of the currency identified by `code`.
///
/// Codes outside ISO 4217 (most crypto assets) are printed with two decimals and no symbol.
/// Separators are always `,` and `.`, and rounding follows the minor unit only, so cash
/// increments such as 0.05 CHF are not applied.
pub fn format_amount(code: &str, value: f64, style: DisplayStyle) -> String {
    match style {
        DisplayStyle::Plain => format!("{value:.2} {code}"),
        DisplayStyle::Symbol => {
            let currency = Currency::from_code(code);
            let scale = currency
                .and_then(|c| c.exponent())
                .map_or(FALLBACK_SCALE, usize::from);
            let sign = if value.is_sign_negative() && round_is_nonzero(value, scale) {
                "-"
            } else {
                ""
            };
            let digits = format!("{:.*}", scale, value.abs()).separate_with_commas();
            match currency {
                Some(currency) => {
                    format!("{sign}{}{digits} {}", currency.symbol(), currency.code())
                }
                None => format!("{sign}{digits} {code}"),
            }
        }
    }
}

fn round_is_nonzero(value: f64, scale: usize) -> bool {
    format!("{:.*}", scale, value.abs())
        .chars()
        .any(|c| c.is_ascii_digit() && c != '0')
}
