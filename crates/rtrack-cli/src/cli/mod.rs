//! CLI for the rtrack traffic tracker.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use rtrack_core::badge::BadgeStyle;
use rtrack_core::config::{self, RtrackConfig};
use std::path::PathBuf;

use commands::{run_completions, run_man, run_render, run_status, run_update};

/// Top-level CLI for rtrack.
#[derive(Debug, Parser)]
#[command(name = "rtrack", version)]
#[command(about = "rtrack: keep repository traffic history and render it as an SVG badge", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Output overrides shared by `update` and `render`.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// History JSON file (default from config: traffic-data.json).
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// SVG badge to write (default from config: traffic-stat.svg).
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Badge style: flat, cyberpunk or dashboard.
    #[arg(long, value_name = "STYLE")]
    pub style: Option<BadgeStyle>,

    /// Label text on the badge.
    #[arg(long)]
    pub label: Option<String>,
}

impl OutputArgs {
    fn apply(&self, cfg: &mut RtrackConfig) {
        if let Some(p) = &self.data {
            cfg.data_file = p.clone();
        }
        if let Some(p) = &self.svg {
            cfg.svg_file = p.clone();
        }
        if let Some(s) = self.style {
            cfg.style = s;
        }
        if let Some(l) = &self.label {
            cfg.label = l.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch traffic, merge it into the history file, and regenerate the badge.
    Update {
        /// Repository as owner/name (default: $GITHUB_REPOSITORY).
        #[arg(long, value_name = "OWNER/NAME")]
        repo: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Regenerate the badge from the stored history without fetching.
    Render {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show totals and the most recent days of the stored history.
    Status {
        /// History JSON file.
        #[arg(long, value_name = "PATH")]
        data: Option<PathBuf>,

        /// Number of recent days to list.
        #[arg(long, default_value = "14", value_name = "N")]
        days: usize,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

/// Config file, then `RTRACK_*` environment overrides.
fn load_config() -> Result<RtrackConfig> {
    let mut cfg = config::load_or_init().context("load config")?;
    cfg.apply_env(|k| std::env::var(k).ok())?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Update { repo, output } => {
                let mut cfg = load_config()?;
                output.apply(&mut cfg);
                run_update(&cfg, repo.as_deref()).await?;
            }
            CliCommand::Render { output } => {
                let mut cfg = load_config()?;
                output.apply(&mut cfg);
                run_render(&cfg)?;
            }
            CliCommand::Status { data, days } => {
                let mut cfg = load_config()?;
                if let Some(p) = data {
                    cfg.data_file = p;
                }
                run_status(&cfg, days)?;
            }
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command())?,
            CliCommand::Man => run_man(Cli::command())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
