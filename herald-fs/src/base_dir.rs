//! A root directory that relative file names must stay inside.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors raised while opening a [`BaseDir`] or resolving a path below it.
#[derive(Debug, Error)]
pub enum BaseDirError {
    /// The current directory could not be read to absolutise a relative root.
    #[error("failed to read the current directory")]
    CurrentDir(#[source] io::Error),
    /// The current directory is not valid UTF-8.
    #[error("current directory is not valid UTF-8")]
    NonUtf8CurrentDir,
    /// Canonicalising a path failed for a reason other than absence.
    #[error("failed to resolve {path}")]
    Canonicalise {
        /// Path being resolved.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// The resolved path lies outside the base directory.
    #[error("path escapes base dir: {file}")]
    Escapes {
        /// File name as supplied by the caller.
        file: String,
        /// Where the file name resolved to.
        resolved: Utf8PathBuf,
    },
}

/// An absolute, symlink-resolved root directory.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use herald_fs::BaseDir;
///
/// # fn main() -> Result<(), herald_fs::BaseDirError> {
/// let base = BaseDir::open(Utf8Path::new("./data"))?;
/// let inside = base.resolve("feeds/status.json")?;
/// assert!(inside.starts_with(base.as_path()));
/// assert!(base.resolve("../../etc/passwd").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDir {
    root: Utf8PathBuf,
}

impl BaseDir {
    /// Absolutise and canonicalise `path`. The directory need not exist yet.
    pub fn open(path: &Utf8Path) -> Result<Self, BaseDirError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let cwd = std::env::current_dir().map_err(BaseDirError::CurrentDir)?;
            let cwd_utf8 =
                Utf8PathBuf::from_path_buf(cwd).map_err(|_| BaseDirError::NonUtf8CurrentDir)?;
            cwd_utf8.join(path)
        };
        let root = resolve_existing_prefix(&normalise(&absolute))?;
        Ok(Self { root })
    }

    /// The canonical root.
    #[must_use]
    pub fn as_path(&self) -> &Utf8Path {
        &self.root
    }

    /// Resolve `file` against the root and check it stays inside.
    ///
    /// `..` components are applied lexically first, then any existing prefix
    /// of the result is canonicalised so symlinks pointing outside the root
    /// are rejected too. Nothing is read from the resolved file.
    pub fn resolve(&self, file: &str) -> Result<Utf8PathBuf, BaseDirError> {
        let lexical = normalise(&self.root.join(file));
        self.check(file, &lexical)?;
        let resolved = resolve_existing_prefix(&lexical)?;
        self.check(file, &resolved)?;
        Ok(resolved)
    }

    fn check(&self, file: &str, resolved: &Utf8Path) -> Result<(), BaseDirError> {
        if resolved.starts_with(&self.root) {
            Ok(())
        } else {
            Err(BaseDirError::Escapes {
                file: file.to_owned(),
                resolved: resolved.to_path_buf(),
            })
        }
    }
}

/// Apply `.` and `..` components without touching the filesystem.
fn normalise(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

/// Canonicalise the longest existing ancestor of `path` and re-append the rest.
fn resolve_existing_prefix(path: &Utf8Path) -> Result<Utf8PathBuf, BaseDirError> {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        match current.canonicalize_utf8() {
            Ok(mut real) => {
                for name in missing.iter().rev() {
                    real.push(name);
                }
                return Ok(real);
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (current.parent(), current.file_name()) else {
                    return Ok(path.to_path_buf());
                };
                missing.push(name);
                current = parent;
            }
            Err(source) => {
                return Err(BaseDirError::Canonicalise {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }
}
