//! # pydigest - Python Class and Function Digests
//!
//! Reads Python source files and produces a compact summary of their
//! definitions: class headers, methods and functions with their signatures
//! and bodies, decorators kept, docstrings moved out into a separate list.
//! The digest is meant to be pasted into a prompt or skimmed by a reviewer.
//!
//! ## Overview
//!
//! Each file is parsed with tree-sitter and lowered into a small owned syntax
//! model. A single visitor pass applies the name filters and emits one code
//! block per accepted definition together with its docstring. The aggregator
//! repeats this per file and joins the results into one digest with a
//! `# file.py:` header per section.
//!
//! ## Architecture
//!
//! ```text
//! FileWalker ──► Aggregator ──► PythonParser ──► Extractor ──► digest text
//!  (ignore,        (per file,     (tree-sitter)    (FilterSpec,    │
//!   globset)        policy)                         docstrings)    └─► Notebook
//! ```
//!
//! ## Modules
//!
//! - [`extract`]: parsing, filtering, rendering and aggregation
//! - [`walker`]: input file selection and the editable tree listing
//! - [`notebook`]: nbformat output pairing docstrings with code
//! - [`config`]: configuration file and environment overrides
//! - [`cli`]: command-line definitions
//! - [`error`]: error types
//! - [`paths`]: platform configuration directory
//!
//! ## Usage Example
//!
//! ```
//! use pydigest::extract::{Aggregator, FilterSpec};
//!
//! let filter = FilterSpec::new().with_exclude_methods(["helper"]);
//! let result = Aggregator::new(&filter)
//!     .run_sources([("shapes.py", "def area(r):\n    return 3.14 * r * r\n")])
//!     .unwrap();
//!
//! assert_eq!(result.digest(), "# shapes.py:\ndef area(r):\n    return 3.14 * r * r\n\n");
//! ```

/// Command-line argument definitions
pub mod cli;

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// Definition extraction from Python sources
pub mod extract;

/// Glob matching on file names
pub mod glob_utils;

/// Notebook output
pub mod notebook;

/// Platform configuration directory
pub mod paths;

/// Directory walking and file selection
pub mod walker;
