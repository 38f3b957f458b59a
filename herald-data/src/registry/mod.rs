//! Persistent mapping from source name to [`Source`].
//!
//! The registry is read once when opened and is authoritative in memory
//! afterwards. Every mutation rewrites the whole file atomically; a failed
//! write leaves the in-memory state as it was.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use herald_core::{Source, SourceError};
use herald_fs::{BaseDir, BaseDirError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`SourceRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The name or file failed validation.
    #[error("invalid source {name}: {source}")]
    InvalidSource {
        /// Name as supplied.
        name: String,
        /// Validation failure.
        #[source]
        source: SourceError,
    },
    /// The file escapes the registry's base directory.
    #[error("invalid source {name}: {source}")]
    Containment {
        /// Name as supplied.
        name: String,
        /// Containment failure.
        #[source]
        source: BaseDirError,
    },
    /// Checking whether the registry file exists failed.
    #[error("failed to inspect registry {path}: {source}")]
    Inspect {
        /// Registry path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// Creating the registry's parent directory failed.
    #[error("failed to create directory for registry {path}: {source}")]
    CreateParent {
        /// Registry path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// Reading the registry file failed.
    #[error("failed to read registry {path}: {source}")]
    Read {
        /// Registry path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// The registry file is not valid registry JSON.
    #[error("failed to parse registry {path}: {source}")]
    Parse {
        /// Registry path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored entry does not form a valid source.
    #[error("invalid registry entry {name}: {source}")]
    InvalidEntry {
        /// Entry key.
        name: String,
        /// Validation failure.
        #[source]
        source: SourceError,
    },
    /// Serialising the registry failed.
    #[error("failed to serialise registry: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Writing the registry file failed.
    #[error("failed to write registry {path}: {source}")]
    Write {
        /// Registry path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    items: BTreeMap<String, SourceRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SourceRecord {
    #[serde(default)]
    dot_path: Option<String>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    file: String,
    #[serde(default)]
    transform: Option<String>,
}

const fn enabled_by_default() -> bool {
    true
}

impl From<&Source> for SourceRecord {
    fn from(source: &Source) -> Self {
        Self {
            dot_path: source.dot_path().map(str::to_owned),
            enabled: source.enabled(),
            file: source.file().to_owned(),
            transform: source.transform().map(str::to_owned),
        }
    }
}

impl SourceRecord {
    fn into_source(self, name: &str) -> Result<Source, RegistryError> {
        Source::new(name, &self.file)
            .map(|source| {
                source
                    .with_dot_path(self.dot_path)
                    .with_enabled(self.enabled)
                    .with_transform(self.transform)
            })
            .map_err(|source| RegistryError::InvalidEntry {
                name: name.to_owned(),
                source,
            })
    }
}

/// Named sources persisted to one JSON file.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use herald_data::SourceRegistry;
///
/// # fn main() -> Result<(), herald_data::RegistryError> {
/// let mut registry = SourceRegistry::open(Utf8Path::new("config/bot_registry.json"))?;
/// registry.register("status", "status.json", Some("data.items"))?;
/// assert!(registry.get("status").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SourceRegistry {
    path: Utf8PathBuf,
    sources: BTreeMap<String, Source>,
    base: Option<BaseDir>,
}

impl SourceRegistry {
    /// Load the registry at `path`, creating an empty one when it is absent.
    ///
    /// A file that cannot be read or parsed is logged and replaced by an
    /// empty in-memory registry; it is only overwritten by the next
    /// mutation.
    pub fn open(path: &Utf8Path) -> Result<Self, RegistryError> {
        let mut registry = Self {
            path: path.to_path_buf(),
            sources: BTreeMap::new(),
            base: None,
        };
        match herald_fs::file_is_file(path) {
            Ok(_) => {
                registry.sources = registry.load().unwrap_or_else(|err| {
                    log::error!("failed to load registry: {err}");
                    BTreeMap::new()
                });
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                herald_fs::ensure_parent_dir(path).map_err(|source| {
                    RegistryError::CreateParent {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                registry.save(&registry.sources)?;
            }
            Err(source) => {
                return Err(RegistryError::Inspect {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        Ok(registry)
    }

    /// Reject registrations whose file escapes `base`.
    #[must_use]
    pub fn with_base_dir(mut self, base: BaseDir) -> Self {
        self.base = Some(base);
        self
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Insert or replace the source named `name` and persist.
    ///
    /// Nothing is written when validation fails. The stored source is
    /// enabled, whatever the previous entry under the same name was.
    pub fn register(
        &mut self,
        name: &str,
        file: &str,
        dot_path: Option<&str>,
    ) -> Result<Source, RegistryError> {
        let source = Source::new(name, file)
            .map_err(|source| RegistryError::InvalidSource {
                name: name.to_owned(),
                source,
            })?
            .with_dot_path(dot_path.map(str::to_owned));
        if let Some(base) = &self.base {
            base.resolve(source.file())
                .map_err(|err| RegistryError::Containment {
                    name: name.to_owned(),
                    source: err,
                })?;
        }
        let mut next = self.sources.clone();
        next.insert(source.name_key().to_owned(), source.clone());
        self.commit(next)?;
        log::info!("registered source {} -> {}", source.name_key(), source.file());
        Ok(source)
    }

    /// Delete `name`; returns whether it existed.
    pub fn remove(&mut self, name: &str) -> Result<bool, RegistryError> {
        if !self.sources.contains_key(name) {
            return Ok(false);
        }
        let mut next = self.sources.clone();
        next.remove(name);
        self.commit(next)?;
        log::info!("removed source {name}");
        Ok(true)
    }

    /// Look up one source.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Source> {
        self.sources.get(name)
    }

    /// Snapshot of every source, keyed by name.
    #[must_use]
    pub fn list(&self) -> BTreeMap<String, Source> {
        self.sources.clone()
    }

    /// Snapshot of the enabled sources.
    #[must_use]
    pub fn get_enabled(&self) -> BTreeMap<String, Source> {
        self.sources
            .iter()
            .filter(|(_, source)| source.enabled())
            .map(|(name, source)| (name.clone(), source.clone()))
            .collect()
    }

    /// Set the enabled flag of `name` and persist; returns whether it existed.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<bool, RegistryError> {
        let mut next = self.sources.clone();
        let Some(source) = next.get_mut(name) else {
            return Ok(false);
        };
        source.set_enabled(enabled);
        self.commit(next)?;
        Ok(true)
    }

    fn commit(&mut self, next: BTreeMap<String, Source>) -> Result<(), RegistryError> {
        self.save(&next)?;
        self.sources = next;
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, Source>, RegistryError> {
        let text = herald_fs::read_utf8_file(&self.path).map_err(|source| RegistryError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: RegistryFile =
            serde_json::from_str(&text).map_err(|source| RegistryError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let sources = file
            .items
            .into_iter()
            .map(|(name, record)| {
                let source = record.into_source(&name)?;
                Ok((source.name_key().to_owned(), source))
            })
            .collect::<Result<BTreeMap<_, _>, RegistryError>>()?;
        log::info!("loaded {} source(s) from registry", sources.len());
        Ok(sources)
    }

    fn save(&self, sources: &BTreeMap<String, Source>) -> Result<(), RegistryError> {
        let file = RegistryFile {
            items: sources
                .iter()
                .map(|(name, source)| (name.clone(), SourceRecord::from(source)))
                .collect(),
        };
        let text = serde_json::to_string_pretty(&file).map_err(RegistryError::Serialise)?;
        herald_fs::write_atomic(&self.path, text.as_bytes()).map_err(|source| {
            RegistryError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }
}
