//! # folio-core
//!
//! Core record types for the folio portfolio charts.
//!
//! Records enter through the [`raw`] normalization boundary, where every
//! optional field of the upstream JSON is resolved once. The shaper modules
//! then turn strict records into chart-ready items:
//!
//! - [`publication`] - year stacking for the dot plot
//! - [`affiliation`] - experience timeline bars and education points
//! - [`reputation`] - per-post reputation segments with an "other" residual

pub mod affiliation;
pub mod dates;
pub mod error;
pub mod publication;
pub mod raw;
pub mod reputation;

pub use affiliation::*;
pub use dates::*;
pub use error::*;
pub use publication::*;
pub use raw::{PortfolioSnapshot, RawEducation, RawSite, RawWork};
pub use reputation::*;

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for rendering a number as a short label
pub trait NumberFormatter: Send + Sync {
    fn format(&self, num: f64) -> String;
}

/// Compact formatter for large counts (`1.2k`, `3m`)
#[derive(Debug, Clone, Default)]
pub struct CompactNumberFormatter;

impl NumberFormatter for CompactNumberFormatter {
    fn format(&self, num: f64) -> String {
        let abs = num.abs();
        let sign = if num < 0.0 { "-" } else { "" };

        if abs >= 1_000_000.0 {
            format!("{}{}m", sign, trim_zero_decimal(abs / 1_000_000.0))
        } else if abs >= 1_000.0 {
            format!("{}{}k", sign, trim_zero_decimal(abs / 1_000.0))
        } else {
            format!("{}{}", sign, abs.round())
        }
    }
}

/// Whole-number formatter with no grouping
#[derive(Debug, Clone, Default)]
pub struct IntegerFormatter;

impl NumberFormatter for IntegerFormatter {
    fn format(&self, num: f64) -> String {
        format!("{}", num.round())
    }
}

/// One decimal place, dropping a trailing `.0`
fn trim_zero_decimal(value: f64) -> String {
    let text = format!("{:.1}", value);
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    /// ggplot2 panel background
    pub const PANEL_BG: &str = "#EBEBEB";
    pub const GRID: &str = "#FFFFFF";
    pub const AXIS: &str = "#4D4D4D";
    pub const TEXT_MUTED: &str = "#4D4D4D";
    /// Fill of the unattributed "other" reputation segment
    pub const RESIDUAL: &str = "#B0B0B0";
    pub const HIGHLIGHT: &str = "#000000";

    /// Hue of category `index` out of `total`, rotating from 15 degrees the
    /// way ggplot2's default discrete palette does.
    ///
    /// The result only depends on `(total, index)`.
    pub fn hue(total: usize, index: usize) -> String {
        let total = total.max(1) as f64;
        let h = (15.0 + (360.0 / total) * index as f64) % 360.0;
        format!("hsl({}, 65%, 55%)", round_hue(h))
    }

    fn round_hue(h: f64) -> f64 {
        (h * 1e6).round() / 1e6
    }
}

/// Labels in order of first appearance, without repeats
pub fn distinct_in_order<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<String> = Vec::new();
    for label in labels {
        if !seen.iter().any(|s| s == label) {
            seen.push(label.to_string());
        }
    }
    seen
}
