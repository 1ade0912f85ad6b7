//! Dashboard card: totals on the left, waveform of recent daily views on the right.

use super::{escape_xml, format_count, BadgeOptions};
use crate::history::HistoryRecord;

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 150.0;
const CHART_X: f64 = 190.0;
const CHART_Y: f64 = 28.0;
const CHART_W: f64 = 270.0;
const CHART_H: f64 = 84.0;

/// Chart coordinates for `values`, left to right. Fewer than two values
/// give a flat baseline across the chart.
fn chart_points(values: &[u64]) -> Vec<(f64, f64)> {
    let base = CHART_Y + CHART_H;
    if values.len() < 2 {
        return vec![(CHART_X, base), (CHART_X + CHART_W, base)];
    }
    let max = values.iter().copied().max().unwrap_or(0).max(1) as f64;
    let step = CHART_W / (values.len() - 1) as f64;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (CHART_X + step * i as f64, base - (*v as f64 / max) * CHART_H))
        .collect()
}

pub(super) fn render(history: &HistoryRecord, opts: &BadgeOptions) -> String {
    let days = history.recent_days(opts.chart_days);
    let values: Vec<u64> = days.iter().map(|(_, d)| d.views).collect();
    let points = chart_points(&values);
    let base = CHART_Y + CHART_H;

    let line = points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ");
    let (first_x, last_x) = (points[0].0, points[points.len() - 1].0);
    let area = format!("M {first_x:.1},{base:.1} L {line} L {last_x:.1},{base:.1} Z");

    let range = match (days.first(), days.last()) {
        (Some((a, _)), Some((b, _))) => format!("{a} .. {b}"),
        _ => "no data yet".to_string(),
    };
    let clones = match &history.clones {
        Some(c) => format!("clones: {}", format_count(c.total_clones)),
        None => String::new(),
    };
    let updated = history
        .updated_at
        .map(|t| format!("updated {}", t.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();

    format!(
        r##"<svg width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="wave-fill" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0%" stop-color="#58a6ff" stop-opacity="0.45"/>
      <stop offset="100%" stop-color="#58a6ff" stop-opacity="0"/>
    </linearGradient>
  </defs>
  <rect x="0.5" y="0.5" width="{rw}" height="{rh}" rx="8" fill="#0d1117" stroke="#30363d"/>
  <g font-family="Segoe UI, Helvetica, Arial, sans-serif">
    <text x="20" y="32" font-size="12" fill="#8b949e">{label}</text>
    <text x="20" y="68" font-size="32" font-weight="600" fill="#e6edf3">{views}</text>
    <text x="20" y="92" font-size="12" fill="#8b949e">{uniques} cumulative daily uniques</text>
    <text x="20" y="112" font-size="11" fill="#8b949e">{clones}</text>
    <text x="20" y="136" font-size="10" fill="#6e7681">{updated}</text>
  </g>
  <line x1="{CHART_X}" y1="{base}" x2="{chart_r}" y2="{base}" stroke="#30363d"/>
  <path d="{area}" fill="url(#wave-fill)"/>
  <polyline points="{line}" fill="none" stroke="#58a6ff" stroke-width="2" stroke-linejoin="round" stroke-linecap="round"/>
  <text x="{chart_r}" y="{range_y}" font-family="Segoe UI, Helvetica, Arial, sans-serif" font-size="10" fill="#6e7681" text-anchor="end">{range}</text>
</svg>
"##,
        rw = WIDTH - 1.0,
        rh = HEIGHT - 1.0,
        label = escape_xml(&opts.label),
        views = format_count(history.total_views),
        uniques = format_count(history.total_uniques),
        chart_r = CHART_X + CHART_W,
        range_y = base + 18.0,
    )
}
