//! CLI command handlers, one per file.

mod completions;
mod render;
mod status;
mod update;

pub use completions::{run_completions, run_man};
pub use render::run_render;
pub use status::run_status;
pub use update::run_update;
