//! Provides helpers to generate shell completions
use clap::CommandFactory;

use crate::ShelfOptions;

/// Available shells for completion generation
#[derive(Clone, clap::ValueEnum, PartialEq, Debug)]
pub enum Shell {
    /// Bourne Again SHell
    Bash,
    /// Elvish shell
    Elvish,
    /// Friendly Interactive SHell
    Fish,
    /// Nushell (nu)
    Nushell,
    /// PowerShell
    PowerShell,
    /// Zsh
    Zsh,
}

/// Generate the completion script for `sh` into `output`
pub fn generate_to(sh: &Shell, output: &mut dyn std::io::Write) {
    let cmd = &mut ShelfOptions::command();
    let bin_name = "shelf";

    let clap_shell = match sh {
        Shell::Nushell => return clap_complete::generate(clap_complete_nushell::Nushell, cmd, bin_name, output),
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Elvish => clap_complete::Shell::Elvish,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Zsh => clap_complete::Shell::Zsh,
    };
    clap_complete::generate(clap_shell, cmd, bin_name, output)
}

/// Generate the completion and write it to stdout
pub fn generate(sh: &Shell) {
    generate_to(sh, &mut std::io::stdout());
}
