//! Shared helpers for herald-data behaviour tests.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tempfile::TempDir;

/// Temporary directory holding a `data/` base directory and a `config/`
/// directory for the registry.
#[derive(Debug)]
pub struct Sandbox {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Sandbox {
    /// Create the sandbox with an empty `data/` directory.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap_or_else(|err| panic!("failed to create temp dir: {err}"));
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temp dir {path:?} is not UTF-8"));
        fs::create_dir(root.join("data"))
            .unwrap_or_else(|err| panic!("failed to create data dir: {err}"));
        Self { _tmp: tmp, root }
    }

    /// The `data/` base directory.
    pub fn data_dir(&self) -> Utf8PathBuf {
        self.root.join("data")
    }

    /// Registry location below `config/`.
    pub fn registry_path(&self) -> Utf8PathBuf {
        self.root.join("config/bot_registry.json")
    }

    /// Write `value` as compact JSON to `file` below `data/`.
    pub fn write_document(&self, file: &str, value: &Value) {
        write_text(&self.data_dir().join(file), &value.to_string());
    }

    /// Parse `file` below `data/`.
    pub fn read_document(&self, file: &str) -> Value {
        let path = self.data_dir().join(file);
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read {path}: {err}"));
        serde_json::from_str(&text).unwrap_or_else(|err| panic!("{path} is not JSON: {err}"))
    }
}

/// Write `text` to `path`, creating parents.
pub fn write_text(path: &Utf8Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|err| panic!("failed to create {parent}: {err}"));
    }
    fs::write(path, text).unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}
