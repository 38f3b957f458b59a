//! One mutex per resolved document path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};

/// Per-path mutexes, created on first use and kept for the engine's lifetime.
///
/// Entries are never evicted; the map is bounded by the distinct document
/// paths the registry's sources resolve to.
#[derive(Debug, Default)]
pub(super) struct FileLocks {
    handles: Mutex<HashMap<Utf8PathBuf, Arc<Mutex<()>>>>,
}

impl FileLocks {
    /// Shared lock for `path`, created on first use.
    pub(super) fn handle(&self, path: &Utf8Path) -> Arc<Mutex<()>> {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(handles.entry(path.to_path_buf()).or_default())
    }

    /// Lock `handle`, recovering the guard if a previous holder panicked.
    pub(super) fn acquire(handle: &Mutex<()>) -> MutexGuard<'_, ()> {
        handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
