//! Named descriptors pointing at tracked JSON documents.

use thiserror::Error;

/// A logical source: a JSON file below the base directory plus an optional
/// dot path selecting the tracked structure inside it.
///
/// # Examples
///
/// ```
/// use herald_core::Source;
///
/// # fn main() -> Result<(), herald_core::SourceError> {
/// let source = Source::new(" status ", "feeds/status.json")?
///     .with_dot_path(Some("releases[0].items".to_owned()));
/// assert_eq!(source.name_key(), "status");
/// assert_eq!(source.target_path(), Some("releases[0].items"));
/// assert!(source.enabled());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    name_key: String,
    file: String,
    dot_path: Option<String>,
    enabled: bool,
    transform: Option<String>,
}

/// Errors returned by [`Source::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The name key was empty or whitespace.
    #[error("name_key cannot be empty")]
    EmptyName,
    /// The file path was empty or whitespace.
    #[error("file path cannot be empty")]
    EmptyFile,
}

impl Source {
    /// Validates and constructs an enabled [`Source`] without a dot path.
    ///
    /// Both values are trimmed before validation.
    pub fn new(name_key: &str, file: &str) -> Result<Self, SourceError> {
        let trimmed_name = name_key.trim();
        if trimmed_name.is_empty() {
            return Err(SourceError::EmptyName);
        }
        let trimmed_file = file.trim();
        if trimmed_file.is_empty() {
            return Err(SourceError::EmptyFile);
        }
        Ok(Self {
            name_key: trimmed_name.to_owned(),
            file: trimmed_file.to_owned(),
            dot_path: None,
            enabled: true,
            transform: None,
        })
    }

    /// Replace the dot path.
    #[must_use]
    pub fn with_dot_path(mut self, dot_path: Option<String>) -> Self {
        self.dot_path = dot_path;
        self
    }

    /// Replace the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replace the reserved formatter identifier.
    #[must_use]
    pub fn with_transform(mut self, transform: Option<String>) -> Self {
        self.transform = transform;
        self
    }

    /// Unique key identifying the source.
    #[must_use]
    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    /// Path of the JSON document relative to the base directory.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Dot path exactly as stored, including an empty string.
    #[must_use]
    pub fn dot_path(&self) -> Option<&str> {
        self.dot_path.as_deref()
    }

    /// Dot path to resolve, treating an empty string as the document root.
    #[must_use]
    pub fn target_path(&self) -> Option<&str> {
        self.dot_path.as_deref().filter(|path| !path.is_empty())
    }

    /// Whether bulk operations include this source.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Set the enabled flag in place.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Reserved formatter identifier. Carried and persisted, never applied.
    #[must_use]
    pub fn transform(&self) -> Option<&str> {
        self.transform.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "status.json", SourceError::EmptyName)]
    #[case("   ", "status.json", SourceError::EmptyName)]
    #[case("status", "", SourceError::EmptyFile)]
    #[case("status", " \t", SourceError::EmptyFile)]
    fn rejects_blank_fields(
        #[case] name: &str,
        #[case] file: &str,
        #[case] expected: SourceError,
    ) {
        assert_eq!(Source::new(name, file), Err(expected));
    }

    #[rstest]
    fn trims_and_defaults() {
        let source = Source::new("  status\n", " data/status.json ").unwrap();
        assert_eq!(source.name_key(), "status");
        assert_eq!(source.file(), "data/status.json");
        assert_eq!(source.dot_path(), None);
        assert!(source.enabled());
        assert_eq!(source.transform(), None);
    }

    #[rstest]
    fn empty_dot_path_targets_root() {
        let source = Source::new("status", "status.json")
            .unwrap()
            .with_dot_path(Some(String::new()));
        assert_eq!(source.dot_path(), Some(""));
        assert_eq!(source.target_path(), None);
    }

    #[rstest]
    fn toggles_enabled() {
        let mut source = Source::new("status", "status.json")
            .unwrap()
            .with_enabled(false);
        assert!(!source.enabled());
        source.set_enabled(true);
        assert!(source.enabled());
    }
}
