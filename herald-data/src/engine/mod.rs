//! Refresh engine: read a tracked document, collect and mark unpushed items,
//! write the document back atomically and render a reply.
//!
//! The engine keeps no state between calls beyond per-file locks; everything
//! it tracks lives in the JSON documents. Calls touching the same resolved
//! file are serialised within the process. Nothing coordinates separate
//! processes: two of them refreshing one file race at whole-document
//! granularity and the last rename wins.
//!
//! The typed operations ([`RefreshEngine::refresh`], [`RefreshEngine::reset`])
//! return `Result`. The reply operations (`refresh_source`,
//! `refresh_multiple_sources`, `reset_source`, `reset_all`) never fail: they
//! render data, a fixed marker, or a line starting with `[ERR]`.

mod error;
mod locks;

pub use error::EngineError;

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use herald_core::{
    DotPath, EventSink, NO_SOURCES, NO_UPDATE, RefreshEvent, Source, TargetShape, format_items,
    is_error_reply, labelled_reply,
};
use herald_fs::BaseDir;
use serde_json::Value;

use crate::LogSink;
use locks::FileLocks;

/// Reply from [`RefreshEngine::reset_all`] when no source could be reset.
pub const NOTHING_RESET: &str = "No sources needed resetting";

/// Result of a successful [`RefreshEngine::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing was unpushed; the document was not rewritten.
    NothingNew,
    /// Copies of the newly marked items, taken before the mark.
    Collected(Vec<Value>),
}

/// Stateless refresh and reset operations over documents below a base
/// directory.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use herald_core::Source;
/// use herald_data::RefreshEngine;
/// use herald_fs::BaseDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = RefreshEngine::new(BaseDir::open(Utf8Path::new("./data"))?);
/// let source = Source::new("status", "status.json")?;
/// println!("{}", engine.refresh_source(&source));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RefreshEngine<S = LogSink> {
    base: BaseDir,
    sink: S,
    locks: FileLocks,
}

impl RefreshEngine<LogSink> {
    /// Create an engine that reports events through the `log` facade.
    #[must_use]
    pub fn new(base: BaseDir) -> Self {
        Self::with_sink(base, LogSink)
    }
}

impl<S: EventSink> RefreshEngine<S> {
    /// Create an engine reporting events to `sink`.
    pub fn with_sink(base: BaseDir, sink: S) -> Self {
        Self {
            base,
            sink,
            locks: FileLocks::default(),
        }
    }

    /// Root every source file is resolved against.
    pub const fn base_dir(&self) -> &BaseDir {
        &self.base
    }

    /// Collect and mark the unpushed items of `source`.
    ///
    /// The document is rewritten only when at least one item was marked.
    pub fn refresh(&self, source: &Source) -> Result<RefreshOutcome, EngineError> {
        let path = self.locate(source)?;
        let handle = self.locks.handle(&path);
        let _guard = FileLocks::acquire(&handle);

        let mut document = load_document(&path)?;
        let items = {
            let target = resolve_target(&mut document, source)?;
            TargetShape::classify(target)?.collect_unpushed()
        };
        if items.is_empty() {
            return Ok(RefreshOutcome::NothingNew);
        }
        persist_document(&path, &document)?;
        Ok(RefreshOutcome::Collected(items))
    }

    /// Clear the pushed flag on every item of `source` and return how many
    /// were cleared.
    ///
    /// A scalar target has nothing to reset and yields zero.
    pub fn reset(&self, source: &Source) -> Result<usize, EngineError> {
        let path = self.locate(source)?;
        let handle = self.locks.handle(&path);
        let _guard = FileLocks::acquire(&handle);

        let mut document = load_document(&path)?;
        let cleared = {
            let target = resolve_target(&mut document, source)?;
            TargetShape::classify(target).map_or(0, TargetShape::reset_pushed)
        };
        if cleared > 0 {
            persist_document(&path, &document)?;
        }
        Ok(cleared)
    }

    /// Refresh one source and render the reply.
    pub fn refresh_source(&self, source: &Source) -> String {
        let name = source.name_key();
        match self.refresh(source) {
            Ok(RefreshOutcome::NothingNew) => {
                self.sink.emit(&RefreshEvent::NothingNew {
                    name: name.to_owned(),
                });
                NO_UPDATE.to_owned()
            }
            Ok(RefreshOutcome::Collected(items)) => match format_items(&items) {
                Ok(text) => {
                    self.sink.emit(&RefreshEvent::Refreshed {
                        name: name.to_owned(),
                        items: items.len(),
                    });
                    text
                }
                Err(err) => self.fail(name, &EngineError::Serialise(err)),
            },
            Err(err) => self.fail(name, &err),
        }
    }

    /// Refresh every source in key order and join the replies.
    ///
    /// Sources with nothing new are left out; data replies are labelled with
    /// their source name and separated by a blank line. When every source
    /// had nothing new the whole reply is the no-update marker.
    pub fn refresh_multiple_sources(&self, sources: &BTreeMap<String, Source>) -> String {
        if sources.is_empty() {
            return NO_SOURCES.to_owned();
        }
        let replies: Vec<String> = sources
            .iter()
            .filter_map(|(name, source)| {
                let reply = self.refresh_source(source);
                if reply == NO_UPDATE {
                    None
                } else if is_error_reply(&reply) {
                    Some(reply)
                } else {
                    Some(labelled_reply(name, &reply))
                }
            })
            .collect();
        if replies.is_empty() {
            NO_UPDATE.to_owned()
        } else {
            replies.join("\n\n")
        }
    }

    /// Reset one source and render the reply.
    pub fn reset_source(&self, source: &Source) -> String {
        let name = source.name_key();
        match self.reset(source) {
            Ok(count) => {
                self.sink.emit(&RefreshEvent::Reset {
                    name: name.to_owned(),
                    count,
                });
                if count > 0 {
                    format!("Reset {count} items in {name}")
                } else {
                    format!("No items to reset in {name}")
                }
            }
            Err(err) => self.fail(name, &err),
        }
    }

    /// Reset every source and join the successful replies, one per line.
    ///
    /// Failed sources are reported through the sink but left out of the
    /// reply.
    pub fn reset_all(&self, sources: &BTreeMap<String, Source>) -> String {
        let replies: Vec<String> = sources
            .values()
            .map(|source| self.reset_source(source))
            .filter(|reply| !is_error_reply(reply))
            .collect();
        if replies.is_empty() {
            NOTHING_RESET.to_owned()
        } else {
            replies.join("\n")
        }
    }

    fn fail(&self, name: &str, err: &EngineError) -> String {
        let reply = err.reply(name);
        self.sink.emit(&RefreshEvent::Failed {
            name: name.to_owned(),
            message: err.to_string(),
        });
        reply
    }

    fn locate(&self, source: &Source) -> Result<Utf8PathBuf, EngineError> {
        let path = self.base.resolve(source.file())?;
        match herald_fs::file_is_file(&path) {
            Ok(true) => Ok(path),
            Ok(false) => Err(EngineError::NotAFile { path }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(EngineError::NotFound {
                file: source.file().to_owned(),
            }),
            Err(source) => Err(EngineError::Inspect { path, source }),
        }
    }
}

fn load_document(path: &Utf8Path) -> Result<Value, EngineError> {
    let text = herald_fs::read_utf8_file(path).map_err(|source| EngineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| EngineError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_target<'d>(
    document: &'d mut Value,
    source: &Source,
) -> Result<&'d mut Value, EngineError> {
    let Some(raw) = source.target_path() else {
        return Ok(document);
    };
    DotPath::parse(raw)
        .and_then(|path| path.resolve_mut(document))
        .map_err(|err| EngineError::Path {
            dot_path: raw.to_owned(),
            source: err,
        })
}

fn persist_document(path: &Utf8Path, document: &Value) -> Result<(), EngineError> {
    let text = serde_json::to_string_pretty(document).map_err(EngineError::Serialise)?;
    herald_fs::write_atomic(path, text.as_bytes()).map_err(|source| EngineError::Write {
        path: path.to_path_buf(),
        source,
    })
}
