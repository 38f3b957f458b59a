//! Facade crate for herald, a tracker that announces unpushed items from
//! JSON documents on disk.
//!
//! This crate re-exports the core domain types and, behind the `store-fs`
//! feature, the filesystem-backed refresh engine and source registry.

#![forbid(unsafe_code)]

pub use herald_core::{
    DotPath, ERR_PREFIX, EventSink, MAX_REPLY_CHARS, NO_SOURCES, NO_UPDATE, NullSink, PathError,
    RefreshEvent, ShapeError, ShapeKind, Source, SourceError, TRUNCATION_SUFFIX, TargetShape,
    format_items, is_error_reply,
};

#[cfg(feature = "store-fs")]
pub use herald_data::{
    EngineError, LogSink, NOTHING_RESET, RefreshEngine, RefreshOutcome, RegistryError,
    SourceRegistry,
};

#[cfg(feature = "store-fs")]
pub use herald_fs::{BaseDir, BaseDirError};
