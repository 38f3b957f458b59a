//! Test helpers for building a scratch base directory and registry.

use super::*;
use std::fs;
use tempfile::TempDir;

/// Temporary `data/` directory plus registry path for one test.
#[derive(Debug)]
pub(super) struct Scratch {
    _dir: TempDir,
    pub(super) base_dir: Utf8PathBuf,
    pub(super) registry: Utf8PathBuf,
}

impl Scratch {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let base_dir = root.join("data");
        fs::create_dir(&base_dir).expect("create data dir");
        Self {
            _dir: dir,
            base_dir,
            registry: root.join("config/bot_registry.json"),
        }
    }

    pub(super) fn write_document(&self, file: &str, contents: &str) {
        fs::write(self.base_dir.join(file), contents).expect("write document");
    }

    pub(super) fn read_document(&self, file: &str) -> serde_json::Value {
        let text = fs::read_to_string(self.base_dir.join(file)).expect("read document");
        serde_json::from_str(&text).expect("document JSON")
    }

    pub(super) fn config(&self) -> StoreConfig {
        StoreConfig {
            base_dir: self.base_dir.clone(),
            registry: self.registry.clone(),
        }
    }

    /// Run `herald <args>` against this scratch space and capture stdout.
    pub(super) fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let mut argv = vec![
            "herald".to_owned(),
            format!("--{ARG_BASE_DIR}"),
            self.base_dir.as_str().to_owned(),
            format!("--{ARG_REGISTRY}"),
            self.registry.as_str().to_owned(),
        ];
        argv.extend(args.iter().map(|arg| (*arg).to_owned()));
        let cli = Cli::try_parse_from(argv)?;
        let mut buffer = Vec::new();
        run_with(cli, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("stdout utf-8"))
    }
}
