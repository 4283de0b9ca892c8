//! Core conversion logic and the ambient pieces it needs

pub mod config;
pub mod converter;
pub mod currency;
pub mod format;
pub mod log;

// Re-export main types for cleaner imports
pub use converter::{Conversion, ConversionStrategy, Converter};
pub use currency::{RateError, RateProvider, RateTable};
pub use format::{DisplayStyle, format_amount};
