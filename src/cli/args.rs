//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Command interpreter for classic data structures
#[derive(Parser, Debug)]
#[command(name = "dsinterp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, env = "DSINTERP_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Keep executing a script after a failing statement
    #[arg(long, global = true)]
    pub continue_on_error: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a script file ("-" reads stdin)
    Run {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Print the merged history afterwards
        #[arg(long)]
        history: bool,
    },

    /// Execute statements given as arguments (each may contain ';')
    Exec {
        #[arg(required = true)]
        statements: Vec<String>,
        /// Print the merged history afterwards
        #[arg(long)]
        history: bool,
    },

    /// Parse a script without executing it
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_debug_flags_when_parsing_then_counted() {
        let cli = Cli::parse_from(["dsinterp", "-dd", "exec", "create stack"]);
        assert_eq!(cli.debug, 2);
        assert!(matches!(cli.command, Some(Commands::Exec { .. })));
    }

    #[test]
    fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
        let cli = Cli::parse_from(["dsinterp", "run", "demo.ds", "--continue-on-error"]);
        assert!(cli.continue_on_error);
    }
}
