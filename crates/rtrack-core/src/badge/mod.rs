//! SVG badge rendering.
//!
//! Pure formatting: a [`HistoryRecord`] in, an SVG document out. Output is
//! deterministic for a given history so an unchanged history never produces
//! a changed badge.

mod cyberpunk;
mod dashboard;
mod flat;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrafficError;
use crate::history::HistoryRecord;

/// Visual style of the generated SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    /// Shields-style flat badge.
    Flat,
    /// HUD panel with grid, scan line and pulse animations.
    #[default]
    Cyberpunk,
    /// Card with totals and a waveform chart of recent days.
    Dashboard,
}

impl BadgeStyle {
    pub const ALL: [BadgeStyle; 3] = [BadgeStyle::Flat, BadgeStyle::Cyberpunk, BadgeStyle::Dashboard];

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeStyle::Flat => "flat",
            BadgeStyle::Cyberpunk => "cyberpunk",
            BadgeStyle::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for BadgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeStyle {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        BadgeStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                TrafficError::Config(format!(
                    "unknown badge style {s:?} (expected flat, cyberpunk or dashboard)"
                ))
            })
    }
}

/// Text and chart settings shared by all styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeOptions {
    pub label: String,
    pub chart_days: usize,
}

impl Default for BadgeOptions {
    fn default() -> Self {
        Self {
            label: "views".to_string(),
            chart_days: 14,
        }
    }
}

/// Render `history` as an SVG document in the given style.
pub fn render(style: BadgeStyle, history: &HistoryRecord, opts: &BadgeOptions) -> String {
    match style {
        BadgeStyle::Flat => flat::render(history, opts),
        BadgeStyle::Cyberpunk => cyberpunk::render(history, opts),
        BadgeStyle::Dashboard => dashboard::render(history, opts),
    }
}

/// Abbreviate a count for display: `999`, `1.0k`, `12.3k`, `4.5M`.
/// Rounds half up to one decimal place.
pub fn format_count(n: u64) -> String {
    if n < 1_000 {
        return n.to_string();
    }
    let tenths_k = round_half_up(n, 100);
    if tenths_k < 10_000 {
        return format!("{}.{}k", tenths_k / 10, tenths_k % 10);
    }
    let tenths_m = round_half_up(n, 100_000);
    format!("{}.{}M", tenths_m / 10, tenths_m % 10)
}

/// `n / unit` rounded half up, without the overflow of `(n + unit / 2) / unit`.
fn round_half_up(n: u64, unit: u64) -> u64 {
    n / unit + u64::from(n % unit >= unit / 2)
}

/// Escape text for use in SVG element content and attribute values.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Rough text width in px for 11px sans-serif (shields.io uses real metrics).
pub(crate) fn text_width(s: &str) -> u32 {
    s.chars().count() as u32 * 7
}
