//! Filesystem-backed storage for herald: the refresh engine and the source
//! registry.
//!
//! Responsibilities:
//! - Read tracked JSON documents below a base directory, mark their unpushed
//!   items and write them back atomically.
//! - Persist the set of registered sources as one JSON file.
//!
//! Boundaries:
//! - Collection and marking rules live in `herald-core`.
//! - Path containment and atomic replacement live in `herald-fs`.
//!
//! Invariants:
//! - No global mutable state; every lock belongs to an engine instance.
//! - A document or registry file on disk is either the old or the new
//!   version, never a partial write.
#![forbid(unsafe_code)]

mod engine;
mod log_sink;
mod registry;

pub use engine::{EngineError, NOTHING_RESET, RefreshEngine, RefreshOutcome};
pub use log_sink::LogSink;
pub use registry::{RegistryError, SourceRegistry};
