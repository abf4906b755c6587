//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::Parser;
use std::path::PathBuf;

/// Interactive console for the rover vehicle link
#[derive(Parser, Debug, Default)]
#[command(name = "rover-cli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target address to connect to on startup (host:port)
    #[arg(long, value_name = "ADDR")]
    pub target: Option<String>,

    /// Named target from the config file's [targets] table
    #[arg(long, value_name = "NAME", conflicts_with = "target")]
    pub preset: Option<String>,

    /// Path to the config file (default: rover-link.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        let cli = Cli::parse_from(["rover-cli", "--target", "192.168.1.50:9000"]);
        assert_eq!(cli.target.as_deref(), Some("192.168.1.50:9000"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["rover-cli"]);
        assert!(cli.target.is_none());
        assert!(cli.preset.is_none());
        assert!(cli.config.is_none());
    }
}
