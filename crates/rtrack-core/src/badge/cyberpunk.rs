//! HUD-style panel.
//!
//! The hex tag in the corner is decoration. It is taken from a SHA-256 of
//! the totals rather than a random number so the SVG only changes when the
//! numbers do.

use sha2::{Digest, Sha256};

use super::{escape_xml, format_count, BadgeOptions};
use crate::history::HistoryRecord;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 60;

fn signature(history: &HistoryRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(history.total_views.to_le_bytes());
    hasher.update(history.total_uniques.to_le_bytes());
    let digest = hasher.finalize();
    hex::encode_upper(&digest[..3])
}

pub(super) fn render(history: &HistoryRecord, opts: &BadgeOptions) -> String {
    let (w, h) = (WIDTH, HEIGHT);
    let views = format_count(history.total_views);
    let uniques = format_count(history.total_uniques);
    let label = escape_xml(&opts.label.to_uppercase());
    let tag = signature(history);

    format!(
        r##"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" fill="none" xmlns="http://www.w3.org/2000/svg">
  <style>
    @keyframes scan {{
      0% {{ transform: translateX(-100%); }}
      100% {{ transform: translateX(100%); }}
    }}
    @keyframes pulse {{
      0% {{ opacity: 0.4; }}
      50% {{ opacity: 1; }}
      100% {{ opacity: 0.4; }}
    }}
    .text-glow {{ text-shadow: 0 0 2px #00f3ff, 0 0 5px #00f3ff; }}
    .border-glow {{ filter: drop-shadow(0 0 2px #00f3ff); }}
  </style>
  <defs>
    <pattern id="grid" width="20" height="20" patternUnits="userSpaceOnUse">
      <path d="M 20 0 L 0 0 0 20" fill="none" stroke="#00f3ff" stroke-width="0.5" stroke-opacity="0.1"/>
    </pattern>
    <linearGradient id="scan-gradient" x1="0" y1="0" x2="1" y2="0">
      <stop offset="0%" stop-color="#00f3ff" stop-opacity="0"/>
      <stop offset="50%" stop-color="#00f3ff" stop-opacity="0.3"/>
      <stop offset="100%" stop-color="#00f3ff" stop-opacity="0"/>
    </linearGradient>
  </defs>
  <rect x="2" y="2" width="{iw}" height="{ih}" fill="#050a10"/>
  <rect x="2" y="2" width="{iw}" height="{ih}" fill="url(#grid)"/>
  <rect x="2" y="2" width="{iw}" height="{ih}" fill="url(#scan-gradient)" style="animation: scan 3s linear infinite"/>
  <path d="M 10 2 L {r10} 2 L {r2} 10 L {r2} {b10} L {r10} {b2} L 10 {b2} L 2 {b10} L 2 10 Z" stroke="#00f3ff" stroke-width="1" fill="none" class="border-glow" stroke-opacity="0.6"/>
  <rect x="0" y="20" width="2" height="20" fill="#00f3ff" class="border-glow"/>
  <rect x="{r2}" y="20" width="2" height="20" fill="#00f3ff" class="border-glow"/>
  <rect x="20" y="{b5}" width="60" height="2" fill="#00f3ff" fill-opacity="0.5"/>
  <circle cx="25" cy="30" r="3" fill="#00f3ff" style="animation: pulse 2s infinite"/>
  <circle cx="25" cy="30" r="6" stroke="#00f3ff" stroke-width="1" stroke-opacity="0.5"/>
  <text x="38" y="33" font-family="Consolas, Monaco, monospace" font-size="10" fill="#00f3ff" fill-opacity="0.7">SYSTEM.ACTIVE</text>
  <g font-family="Consolas, Monaco, monospace" font-weight="bold">
    <text x="{label_x}" y="20" font-size="9" fill="#00f3ff" fill-opacity="0.5" text-anchor="end">{label}</text>
    <text x="{value_x}" y="30" font-size="20" fill="#fff" text-anchor="end" class="text-glow">{views}</text>
    <text x="{value_x}" y="45" font-size="10" fill="#00f3ff" fill-opacity="0.8" text-anchor="end">UNIQUES: {uniques}</text>
  </g>
  <text x="140" y="52" font-family="Consolas, monospace" font-size="8" fill="#00f3ff" fill-opacity="0.3">0x{tag}</text>
</svg>
"##,
        iw = w - 4,
        ih = h - 4,
        r10 = w - 10,
        r2 = w - 2,
        b10 = h - 10,
        b5 = h - 5,
        b2 = h - 2,
        label_x = w - 130,
        value_x = w - 25,
    )
}
