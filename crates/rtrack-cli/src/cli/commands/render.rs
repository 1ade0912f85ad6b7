//! `rtrack render` – rebuild the badge from stored history.

use anyhow::Result;
use rtrack_core::config::RtrackConfig;
use rtrack_core::store::JsonFileStore;
use rtrack_core::update::{self, BadgeTarget};

pub fn run_render(cfg: &RtrackConfig) -> Result<()> {
    let store = JsonFileStore::new(&cfg.data_file);
    let history = update::render_only(&store, &BadgeTarget::from_config(cfg))?;
    println!(
        "{} badge ({} views) generated at {}",
        cfg.style,
        history.total_views,
        cfg.svg_file.display()
    );
    Ok(())
}
