use crate::assembler::{AssemblerOptions, ErrorMode};
use crate::config::{redact_url, Config, IntrospectSettings};
use crate::generator::Generator;
use crate::introspect::MySqlIntrospector;
use crate::model::FieldType;
use crate::type_map::TypeRegistry;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Command-line interface for swagen
#[derive(Parser, Debug)]
#[command(name = "swagen", version)]
#[command(about = "Generate Swagger 2.0 documents from MySQL tables", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the document for the tables listed in a config file
    Generate {
        /// Path to the YAML configuration file
        #[arg(short, long, visible_alias = "conf")]
        config: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Deadline per table in seconds (0 disables it)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Tables introspected at once
        #[arg(long)]
        max_concurrency: Option<usize>,

        /// Report every failing table instead of stopping at the first
        #[arg(long, default_value_t = false)]
        collect_errors: bool,
    },
    /// Print the column type table
    Types,
}

/// Rewrite the single-dash `-conf` flag of the Go tool to `--conf`.
///
/// Clap would otherwise read `-conf` as `-c onf`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            match arg.to_str() {
                Some("-conf") => OsString::from("--conf"),
                Some(s) if s.starts_with("-conf=") => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}

/// Execute the parsed command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the database cannot be
/// reached, generation fails or the output cannot be written. Nothing is
/// written in any of these cases.
pub async fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            config,
            output,
            timeout_secs,
            max_concurrency,
            collect_errors,
        } => {
            let loaded = Config::load(&config)?;
            let settings = resolve_settings(loaded.introspect, timeout_secs, max_concurrency);
            let options = assembler_options(&settings, collect_errors);
            let url = loaded.database_url()?;

            info!(
                database = %redact_url(&url),
                tables = loaded.resources.len(),
                "Connecting to database"
            );
            let introspector = MySqlIntrospector::connect(
                &url,
                u32::try_from(options.max_concurrency).unwrap_or(u32::MAX),
                options.deadline.unwrap_or(Duration::from_secs(30)),
            )
            .await
            .with_context(|| format!("Failed to connect to {}", redact_url(&url)))?;

            let result = Generator::new(introspector.clone(), loaded.service)
                .with_resources(loaded.resources)
                .with_options(options)
                .generate()
                .await;
            introspector.close().await;

            let document = result?;
            write_document(&document, output.as_deref())
        }
        Commands::Types => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(format_type_table(&TypeRegistry::mysql()).as_bytes())?;
            Ok(())
        }
    }
}

/// Flags win over environment variables, which win over the config file.
pub fn resolve_settings(
    file: IntrospectSettings,
    timeout_secs: Option<u64>,
    max_concurrency: Option<usize>,
) -> IntrospectSettings {
    let mut settings = file.with_env_overrides();
    if let Some(secs) = timeout_secs {
        settings.timeout_secs = secs;
    }
    if let Some(n) = max_concurrency {
        settings.max_concurrency = n;
    }
    settings
}

pub fn assembler_options(settings: &IntrospectSettings, collect_errors: bool) -> AssemblerOptions {
    AssemblerOptions {
        deadline: settings.deadline(),
        max_concurrency: settings.max_concurrency.max(1),
        error_mode: if collect_errors {
            ErrorMode::CollectAll
        } else {
            ErrorMode::FailFast
        },
    }
}

/// Write to `path`, or stdout when `None`.
pub fn write_document(document: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote document");
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(document.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

/// One line per registry entry, `TYPE -> swagger type[, format]`.
pub fn format_type_table(registry: &TypeRegistry) -> String {
    let width = registry
        .entries()
        .iter()
        .map(|(matcher, _)| matcher.to_string().len())
        .max()
        .unwrap_or(0);

    let mut table = String::new();
    for (matcher, field_type) in registry.entries() {
        table.push_str(&format!(
            "{:<width$} -> {}\n",
            matcher.to_string(),
            describe(field_type)
        ));
    }
    table
}

fn describe(field_type: &FieldType) -> String {
    let mut text = field_type.name.clone();
    for (key, value) in &field_type.extra_properties {
        text.push_str(&format!(", {key}: {value}"));
    }
    text
}
