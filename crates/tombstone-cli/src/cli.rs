//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tombstone - Deletion countdowns for low-rated wiki pages.
#[derive(Debug, Parser)]
#[command(name = "tombstone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.tombstone/config.toml)
    #[arg(short, long, global = true, env = "TOMBSTONE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (links only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run reconciliation cycles until Ctrl+C or the failure budget runs out
    Run(RunArgs),

    /// Run a single cycle and print the resulting status document
    Once,

    /// Serve the status document over HTTP
    Serve(ServeArgs),

    /// Print the status document written by the last cycle
    Show,

    /// Decode a countdown timer link
    Decode(DecodeArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Stop after this many cycles instead of running forever
    #[arg(short = 'n', long)]
    pub cycles: Option<usize>,
}

/// Arguments for the serve command.
#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Bind address, overriding the config file
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Bind port, overriding the config file
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the decode command.
#[derive(Debug, Parser)]
pub struct DecodeArgs {
    /// Timer link, or a whole post body containing one
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_cycles() {
        let cli = Cli::try_parse_from(["tombstone", "run", "-n", "3"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.cycles, Some(3)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tombstone",
            "once",
            "--config",
            "/etc/tombstone.toml",
            "-f",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/tombstone.toml")));
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_decode_requires_link() {
        assert!(Cli::try_parse_from(["tombstone", "decode"]).is_err());
    }

    #[test]
    fn test_verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
