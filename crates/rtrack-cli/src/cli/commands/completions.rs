//! `rtrack completions` and `rtrack man`.

use anyhow::Result;
use clap::Command;
use clap_complete::Shell;
use std::io;

/// Write a completion script for `shell` to stdout.
pub fn run_completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut io::stdout());
    Ok(())
}

/// Write the roff man page to stdout.
pub fn run_man(cmd: Command) -> Result<()> {
    clap_mangen::Man::new(cmd).render(&mut io::stdout())?;
    Ok(())
}
