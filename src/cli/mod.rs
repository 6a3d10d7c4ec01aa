//! # CLI Module
//!
//! Command-line interface of the `swagen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate the document for the tables listed in a config file:
//!
//! ```bash
//! swagen generate --config swagen.yaml > swagger.yaml
//! ```
//!
//! Options:
//! - `-c, --config <FILE>` - YAML configuration (aliases `--conf` and the
//!   Go tool's single-dash `-conf`, see [`normalize_args`])
//! - `-o, --output <FILE>` - write to a file instead of stdout
//! - `--timeout-secs <N>` - deadline per table, `0` disables it
//! - `--max-concurrency <N>` - tables introspected at once
//! - `--collect-errors` - report every failing table, not just the first
//!
//! The document is only written when every table was assembled.
//!
//! ### `types`
//!
//! Print the supported column types and what they map to:
//!
//! ```bash
//! swagen types
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use clap::Parser;
//! use swagen::cli::{normalize_args, run_cli, Cli};
//!
//! run_cli(Cli::parse_from(normalize_args(std::env::args_os()))).await?;
//! ```

mod commands;


pub use commands::{
    assembler_options, format_type_table, normalize_args, resolve_settings, run_cli,
    write_document, Cli, Commands,
};
