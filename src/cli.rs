//! Command-line argument definitions
//!
//! Kept in the library so integration tests can drive [`Cli::try_parse_from`]
//! without spawning a process.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::error::DigestError;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Summarize the classes and functions of a Python project
///
/// Walks a directory, keeps the definitions that pass the name filters and
/// writes them, without docstrings, to a single digest file.
#[derive(Parser, Debug)]
#[command(name = "pydigest")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Digest of Python class and function definitions", long_about = None)]
pub struct Cli {
    /// Log every visited definition and skipped file.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk a directory and write the digest (and optionally a notebook).
    Extract(ExtractArgs),

    /// Print the directory listing used to pick files.
    ///
    /// Save it, delete the lines you do not want and pass it back with
    /// `extract --tree-file`.
    Tree {
        /// Project root.
        root: PathBuf,

        /// Path to a config file (defaults to the user config location).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Extract the given files and print the digest to stdout.
    Files {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Skip files that fail to parse instead of stopping.
        #[arg(long)]
        skip_unparseable: bool,
    },

    /// Write the default configuration to a file.
    Init {
        /// Destination (defaults to the user config location).
        path: Option<PathBuf>,

        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Project root.
    pub root: PathBuf,

    /// Path to a config file (defaults to the user config location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Digest destination (overrides `output.digest_path`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a notebook here (overrides `output.notebook_path`).
    #[arg(long)]
    pub notebook: Option<PathBuf>,

    /// Edited `tree` listing; only the `.py` files it names are read.
    #[arg(long)]
    pub tree_file: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// File name glob to keep (repeatable, replaces `walk.include_patterns`).
    #[arg(long = "include", value_name = "GLOB")]
    pub include_patterns: Vec<String>,

    /// File name glob to drop (repeatable, replaces `walk.exclude_patterns`).
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude_patterns: Vec<String>,

    /// Skip files that fail to parse instead of stopping.
    #[arg(long)]
    pub skip_unparseable: bool,
}

/// Name filters; each non-empty list replaces the configured one
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only emit these classes (repeatable).
    #[arg(long = "include-class", value_name = "NAME")]
    pub include_classes: Vec<String>,

    /// Only emit these methods and functions (repeatable).
    #[arg(long = "include-method", value_name = "NAME")]
    pub include_methods: Vec<String>,

    /// Never emit these classes (repeatable).
    #[arg(long = "exclude-class", value_name = "NAME")]
    pub exclude_classes: Vec<String>,

    /// Never emit these methods and functions (repeatable).
    #[arg(long = "exclude-method", value_name = "NAME")]
    pub exclude_methods: Vec<String>,
}

impl FilterArgs {
    pub fn apply(&self, config: &mut Config) {
        let filter = &mut config.filter;
        for (flag, target) in [
            (&self.include_classes, &mut filter.include_classes),
            (&self.include_methods, &mut filter.include_methods),
            (&self.exclude_classes, &mut filter.exclude_classes),
            (&self.exclude_methods, &mut filter.exclude_methods),
        ] {
            if !flag.is_empty() {
                *target = flag.clone();
            }
        }
    }
}

impl ExtractArgs {
    /// Layer the command-line overrides on top of a loaded config
    pub fn apply(&self, config: &mut Config) {
        self.filter.apply(config);
        if !self.include_patterns.is_empty() {
            config.walk.include_patterns = self.include_patterns.clone();
        }
        if !self.exclude_patterns.is_empty() {
            config.walk.exclude_patterns = self.exclude_patterns.clone();
        }
        if let Some(output) = &self.output {
            config.output.digest_path = output.clone();
        }
        if let Some(notebook) = &self.notebook {
            config.output.notebook_path = Some(notebook.clone());
        }
    }
}

/// Process exit status for a failed run
///
/// Bad input (unparseable source, invalid config or glob) exits with 2, any
/// other failure with 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DigestError>() {
        Some(digest_err) if digest_err.is_user_error() => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_flags() {
        let cli = Cli::try_parse_from([
            "pydigest",
            "-v",
            "extract",
            "proj",
            "--exclude-method",
            "__repr__",
            "--exclude-method",
            "__str__",
            "--include",
            "*.py",
            "-o",
            "out.py",
            "--skip-unparseable",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.root, PathBuf::from("proj"));
        assert_eq!(args.filter.exclude_methods, vec!["__repr__", "__str__"]);
        assert_eq!(args.include_patterns, vec!["*.py"]);
        assert!(args.skip_unparseable);

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.filter.exclude_methods, vec!["__repr__", "__str__"]);
        assert_eq!(config.output.digest_path, PathBuf::from("out.py"));
        // Unset flags leave the config alone
        assert!(config.output.notebook_path.is_none());
        assert_eq!(config.walk.ignore_dirs, Config::default().walk.ignore_dirs);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["pydigest", "-v", "-q", "tree", "."]).is_err());
    }

    #[test]
    fn test_files_requires_paths() {
        assert!(Cli::try_parse_from(["pydigest", "files"]).is_err());
        let cli = Cli::try_parse_from(["pydigest", "files", "a.py", "b.py"]).unwrap();
        assert!(matches!(cli.command, Commands::Files { ref paths, .. } if paths.len() == 2));
    }

    #[test]
    fn test_init_takes_optional_path() {
        let cli = Cli::try_parse_from(["pydigest", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { path: None, force: false }));
        let cli = Cli::try_parse_from(["pydigest", "init", "p.toml", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { path: Some(_), force: true }));
    }

    #[test]
    fn test_exit_code_separates_bad_input() {
        use crate::error::{ExtractError, WalkError};
        use anyhow::Context;

        let parse: anyhow::Error = DigestError::Extract(ExtractError::Parse {
            file: "a.py".to_string(),
            line: 1,
            column: 1,
        })
        .into();
        assert_eq!(exit_code(&parse), 2);

        let pattern: Result<(), DigestError> = Err(WalkError::InvalidPattern {
            pattern: "[".to_string(),
            reason: "unclosed class".to_string(),
        }
        .into());
        let wrapped = pattern.context("walking proj").unwrap_err();
        assert_eq!(exit_code(&wrapped), 2);

        let read: anyhow::Error = DigestError::Read {
            path: PathBuf::from("a.py"),
            source: std::io::Error::other("disk"),
        }
        .into();
        assert_eq!(exit_code(&read), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("No .py files listed")), 1);
    }
}
