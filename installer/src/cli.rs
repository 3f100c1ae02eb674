//! CLI argument definitions for the git-plugins installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Fetch, verify, and install the git-plugins command-line tools.
#[derive(Parser, Debug)]
#[command(name = "git-plugins-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch, verify, and install the git-plugins command-line tools.\n\n",
    "Each tool is a single script downloaded from a pinned URL. The installer ",
    "checks its SHA-256 digest against the value compiled into this binary, ",
    "writes it atomically into the binary directory with the executable bit ",
    "set, and runs `<tool> --version` as a self-test.\n\n",
    "A download whose digest does not match is discarded and nothing is ",
    "written.",
))]
#[command(after_help = concat!(
    "TOOLS:\n",
    "  git-autocommit        Create formatted commits from branch names\n",
    "  git-branch-cleanup    Clean up merged and stale branches\n",
    "  git-get               Clone repositories into an organised tree\n\n",
    "EXAMPLES:\n",
    "  Install every tool:\n",
    "    $ git-plugins-installer install --all\n\n",
    "  Install one tool into a custom directory:\n",
    "    $ git-plugins-installer --bin-dir ~/bin install git-get\n\n",
    "  Show install state:\n",
    "    $ git-plugins-installer list\n\n",
    "For more information, see: https://github.com/rfussien/git-plugins",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Directory that receives installed tools [default: platform-specific].
    #[arg(short, long, global = true, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Configuration file [default: platform config directory].
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase diagnostic output (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch, verify, install, and self-test tools.
    Install(InstallArgs),

    /// Self-test already installed tools.
    Test(TestArgs),

    /// List known tools and their install state.
    List(ListArgs),

    /// Show details for one tool.
    Info(InfoArgs),

    /// Remove an installed tool.
    Uninstall(UninstallArgs),
}

/// Tool selection shared by `install` and `test`.
#[derive(Args, Debug, Clone, Default)]
pub struct ToolSelection {
    /// Tools to act on.
    #[arg(value_name = "NAME", required_unless_present = "all")]
    pub names: Vec<String>,

    /// Act on every known tool.
    #[arg(long, conflicts_with = "names")]
    pub all: bool,
}

/// Arguments for the install command.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Tools to install.
    #[command(flatten)]
    pub selection: ToolSelection,

    /// Number of tools to install in parallel [default: 4].
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Skip running `<tool> --version` after installing.
    #[arg(long)]
    pub no_self_test: bool,
}

/// Arguments for the test command.
#[derive(Args, Debug, Clone, Default)]
pub struct TestArgs {
    /// Tools to test.
    #[command(flatten)]
    pub selection: ToolSelection,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Output in JSON format.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the info command.
#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Tool to describe.
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Arguments for the uninstall command.
#[derive(Args, Debug, Clone)]
pub struct UninstallArgs {
    /// Tool to remove.
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
