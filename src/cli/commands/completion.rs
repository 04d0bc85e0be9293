//! cli::commands::completion
//!
//! Shell completion scripts for `metax_access`.

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::shells;

use crate::cli::args::{Cli, Shell};

/// Print the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    write_completion(shell, &mut std::io::stdout().lock());
    Ok(())
}

fn write_completion(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    match shell {
        Shell::Bash => clap_complete::generate(shells::Bash, &mut cmd, name, out),
        Shell::Zsh => clap_complete::generate(shells::Zsh, &mut cmd, name, out),
        Shell::Fish => clap_complete::generate(shells::Fish, &mut cmd, name, out),
        Shell::PowerShell => clap_complete::generate(shells::PowerShell, &mut cmd, name, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_name_the_binary_and_commands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut out = Vec::new();
            write_completion(shell, &mut out);
            let script = String::from_utf8(out).unwrap();
            assert!(script.contains("metax_access"), "{:?}", shell);
            assert!(script.contains("datacite"), "{:?}", shell);
        }
    }
}
