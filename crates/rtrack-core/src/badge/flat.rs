//! Shields-style flat badge: `label | views | uniques`.

use super::{escape_xml, format_count, text_width, BadgeOptions};
use crate::history::HistoryRecord;

const PAD: u32 = 10;

pub(super) fn render(history: &HistoryRecord, opts: &BadgeOptions) -> String {
    let label = escape_xml(&opts.label);
    let views = format_count(history.total_views);
    let uniques = format!("{} uniques", format_count(history.total_uniques));

    let label_w = text_width(&opts.label) + PAD;
    let views_w = text_width(&views) + PAD;
    let uniques_w = text_width(&uniques) + PAD;
    let width = label_w + views_w + uniques_w;
    let views_x = label_w;
    let uniques_x = label_w + views_w;

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="20" role="img" aria-label="{label}: {views}, {uniques}">
  <title>{label}: {views}, {uniques}</title>
  <linearGradient id="s" x2="0" y2="100%">
    <stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
    <stop offset="1" stop-opacity=".1"/>
  </linearGradient>
  <clipPath id="r"><rect width="{width}" height="20" rx="3" fill="#fff"/></clipPath>
  <g clip-path="url(#r)">
    <rect width="{label_w}" height="20" fill="#555"/>
    <rect x="{views_x}" width="{views_w}" height="20" fill="#007ec6"/>
    <rect x="{uniques_x}" width="{uniques_w}" height="20" fill="#4c1"/>
    <rect width="{width}" height="20" fill="url(#s)"/>
  </g>
  <g fill="#fff" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" font-size="11">
    <text x="{label_cx}" y="14">{label}</text>
    <text x="{views_cx}" y="14">{views}</text>
    <text x="{uniques_cx}" y="14">{uniques}</text>
  </g>
</svg>
"##,
        label_cx = label_w / 2,
        views_cx = views_x + views_w / 2,
        uniques_cx = uniques_x + uniques_w / 2,
    )
}
