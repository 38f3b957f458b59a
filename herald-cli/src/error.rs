//! Error types emitted by the herald CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use herald_data::RegistryError;
use herald_fs::BaseDirError;
use thiserror::Error;

/// Errors emitted by the herald CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The configured base directory could not be opened.
    #[error("failed to open base directory: {0}")]
    BaseDir(#[from] BaseDirError),
    /// Opening or updating the registry failed.
    #[error(transparent)]
    Registry(#[from] Box<RegistryError>),
    /// The named source is not registered.
    #[error("source '{name}' does not exist")]
    UnknownSource {
        /// Name as supplied.
        name: String,
    },
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(Box::new(err))
    }
}
