//! Command-line argument definitions for the Tome CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the declaration manifest, override parts
//! of the configuration file, and control logging verbosity.

use std::path::PathBuf;

use clap::Parser;

use tome::render::Format;

/// Command-line arguments for the Tome documentation generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the declaration manifest (TOML)
    #[arg(help = "Path to the declaration manifest")]
    pub manifest: PathBuf,

    /// Output directory, overriding `[output] directory`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (html, markdown, jekyll, website)
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write the resolved documentation model as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub dump_model: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["tome", "api.toml"]);
        assert_eq!(args.manifest, PathBuf::from("api.toml"));
        assert_eq!(args.log_level, "info");
        assert!(args.output.is_none());
        assert!(args.format.is_none());
        assert!(args.dump_model.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "tome",
            "api.toml",
            "-o",
            "site",
            "-f",
            "md",
            "--dump-model",
            "model.json",
        ]);
        assert_eq!(args.output, Some(PathBuf::from("site")));
        assert_eq!(args.format, Some(Format::Markdown));
        assert_eq!(args.dump_model, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["tome", "api.toml", "-f", "pdf"]).is_err());
    }
}
