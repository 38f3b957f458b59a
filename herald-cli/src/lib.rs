//! Command-line interface for managing herald sources.
//!
//! Subcommands edit the source registry, run refreshes and resets, and route
//! chat messages the way the bot front end does. Output is written to an
//! injected writer so commands can be exercised without a terminal.
#![forbid(unsafe_code)]

mod chat;
mod error;

pub use chat::{ChatCommand, ChatRouter, HELP_TEXT, RESET_USAGE};
pub use error::CliError;

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use herald_core::NO_SOURCES;
use herald_data::{RefreshEngine, SourceRegistry};
use herald_fs::BaseDir;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

const ARG_BASE_DIR: &str = "base-dir";
const ARG_REGISTRY: &str = "registry";
const DEFAULT_BASE_DIR: &str = "./data";
const DEFAULT_REGISTRY: &str = "config/bot_registry.json";
const RULE_WIDTH: usize = 60;

/// Run the herald CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli, &mut stdout)
}

/// Execute a parsed command line, writing results to `writer`.
pub fn run_with(cli: Cli, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = cli.store.into_config()?;
    let output = execute(cli.command, &config)?;
    writeln!(writer, "{output}").map_err(CliError::WriteOutput)
}

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(
    name = "herald",
    about = "Manage JSON sources and announce their unpushed items",
    version
)]
pub struct Cli {
    #[command(flatten)]
    store: StoreArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register or replace a source.
    Set {
        /// Source name.
        name: String,
        /// JSON file relative to the base directory.
        file: String,
        /// Dot path inside the document, such as `a.b[0].c`.
        #[arg(long)]
        key: Option<String>,
    },
    /// Remove a source.
    Remove {
        /// Source name.
        name: String,
    },
    /// List registered sources.
    List,
    /// Enable a source.
    Enable {
        /// Source name.
        name: String,
    },
    /// Disable a source.
    Disable {
        /// Source name.
        name: String,
    },
    /// Refresh one source, or every enabled source.
    Test {
        /// Source to refresh; all enabled sources when omitted.
        #[arg(long)]
        name: Option<String>,
    },
    /// Clear pushed flags on one source, or on every enabled source with `all`.
    Reset {
        /// Source name or `all`.
        name: String,
    },
    /// Answer a chat message such as `/refresh status`.
    Chat {
        /// Message text.
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },
}

/// Storage locations shared by every subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[ortho_config(prefix = "HERALD")]
struct StoreArgs {
    /// Directory source files are resolved against.
    #[arg(long = ARG_BASE_DIR, value_name = "dir", global = true)]
    #[serde(default)]
    base_dir: Option<Utf8PathBuf>,
    /// Registry file location.
    #[arg(long = ARG_REGISTRY, value_name = "path", global = true)]
    #[serde(default)]
    registry: Option<Utf8PathBuf>,
}

impl StoreArgs {
    fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(StoreConfig::from(merged))
    }
}

/// Resolved storage locations.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StoreConfig {
    base_dir: Utf8PathBuf,
    registry: Utf8PathBuf,
}

impl From<StoreArgs> for StoreConfig {
    fn from(args: StoreArgs) -> Self {
        Self {
            base_dir: args
                .base_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_BASE_DIR)),
            registry: args
                .registry
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_REGISTRY)),
        }
    }
}

impl StoreConfig {
    fn open(&self) -> Result<(SourceRegistry, RefreshEngine), CliError> {
        let base = BaseDir::open(&self.base_dir)?;
        let registry = SourceRegistry::open(&self.registry)?.with_base_dir(base.clone());
        Ok((registry, RefreshEngine::new(base)))
    }
}

fn execute(command: Command, config: &StoreConfig) -> Result<String, CliError> {
    let (mut registry, engine) = config.open()?;
    match command {
        Command::Set { name, file, key } => {
            let source = registry.register(&name, &file, key.as_deref())?;
            let mut lines = vec![
                format!("Registered source '{}'", source.name_key()),
                format!("  file: {}", source.file()),
            ];
            if let Some(path) = source.target_path() {
                lines.push(format!("  key: {path}"));
            }
            Ok(lines.join("\n"))
        }
        Command::Remove { name } => {
            require(registry.remove(&name)?, &name)?;
            Ok(format!("Removed source '{name}'"))
        }
        Command::List => Ok(list_sources(&registry)),
        Command::Enable { name } => {
            require(registry.set_enabled(&name, true)?, &name)?;
            Ok(format!("Enabled source '{name}'"))
        }
        Command::Disable { name } => {
            require(registry.set_enabled(&name, false)?, &name)?;
            Ok(format!("Disabled source '{name}'"))
        }
        Command::Test { name: Some(name) } => {
            let source = registry
                .get(&name)
                .ok_or_else(|| CliError::UnknownSource { name: name.clone() })?;
            Ok(framed(
                &format!("Refreshing source: {name}"),
                &engine.refresh_source(source),
            ))
        }
        Command::Test { name: None } => {
            let sources = registry.get_enabled();
            Ok(framed(
                &format!("Refreshing all enabled sources ({})...", sources.len()),
                &engine.refresh_multiple_sources(&sources),
            ))
        }
        Command::Reset { name } if name == "all" => {
            let sources = registry.get_enabled();
            let mut lines = vec![format!("Resetting all sources ({})...", sources.len())];
            lines.extend(
                sources
                    .iter()
                    .map(|(key, source)| format!("  {key}: {}", engine.reset_source(source))),
            );
            Ok(lines.join("\n"))
        }
        Command::Reset { name } => {
            let source = registry
                .get(&name)
                .ok_or_else(|| CliError::UnknownSource { name: name.clone() })?;
            Ok(format!(
                "Resetting source: {name}\n{}",
                engine.reset_source(source)
            ))
        }
        Command::Chat { text } => Ok(ChatRouter::new(&registry, &engine).handle(&text.join(" "))),
    }
}

fn require(found: bool, name: &str) -> Result<(), CliError> {
    if found {
        Ok(())
    } else {
        Err(CliError::UnknownSource {
            name: name.to_owned(),
        })
    }
}

fn list_sources(registry: &SourceRegistry) -> String {
    let sources = registry.list();
    if sources.is_empty() {
        return NO_SOURCES.to_owned();
    }
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = vec![format!("Registered sources ({}):", sources.len()), rule.clone()];
    for (name, source) in &sources {
        lines.push(format!("name: {name}"));
        lines.push(format!("file: {}", source.file()));
        if let Some(path) = source.target_path() {
            lines.push(format!("key: {path}"));
        }
        let status = if source.enabled() { "enabled" } else { "disabled" };
        lines.push(format!("status: {status}"));
        lines.push(rule.clone());
    }
    lines.join("\n")
}

fn framed(heading: &str, body: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{heading}\n{rule}\n{body}\n{rule}")
}

#[cfg(test)]
fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<StoreConfig, CliError> {
    let merged = StoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(StoreConfig::from(merged))
}

#[cfg(test)]
mod tests;
