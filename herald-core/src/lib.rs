//! Core domain for the Herald state tracker.
//!
//! Herald pulls "not yet announced" entries out of JSON documents, marks them
//! as announced and can later clear the mark. This crate holds the pure part:
//! source descriptors, dot-path resolution, target classification, the
//! collect/mark/reset algorithms and reply rendering. Filesystem access lives
//! in `herald-data`.
//!
//! # Examples
//!
//! ```
//! use herald_core::{DotPath, TargetShape, format_items};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = json!({"a": {"b": [{"c": {"pushed": false, "x": 1}}]}});
//! let target = DotPath::parse("a.b[0].c")?.resolve_mut(&mut doc)?;
//! let fresh = TargetShape::classify(target)?.collect_unpushed();
//!
//! assert_eq!(fresh, vec![json!({"pushed": false, "x": 1})]);
//! assert_eq!(doc["a"]["b"][0]["c"]["pushed"], json!(true));
//! assert!(format_items(&fresh)?.contains("\"x\": 1"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod dot_path;
mod event;
mod output;
mod shape;
mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use dot_path::{DotPath, PathError, Segment};
pub use event::{EventSink, NullSink, RefreshEvent};
pub use output::{
    ERR_PREFIX, MAX_REPLY_CHARS, NO_SOURCES, NO_UPDATE, TRUNCATION_SUFFIX, error_reply,
    format_items, is_error_reply, labelled_reply, not_found_reply, truncate_reply,
};
pub use shape::{PUSHED_FIELD, ShapeError, ShapeKind, TargetShape, is_pushed};
pub use source::{Source, SourceError};
