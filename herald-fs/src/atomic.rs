//! Temp-file-then-rename replacement of whole files.

use std::io::{self, Write};

use camino::Utf8Path;
use cap_std::fs_utf8;

use crate::open_dir_and_file;

/// Contents written to `<file_name>.tmp` beside the target, not yet renamed
/// into place.
///
/// Dropping a `StagedWrite` without calling [`StagedWrite::commit`] removes
/// the temp file and leaves the target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    dir: fs_utf8::Dir,
    temp_name: String,
    target_name: String,
    committed: bool,
}

/// Write `contents` to a sibling temp file of `path`, flushed to disk.
pub fn stage_write(path: &Utf8Path, contents: &[u8]) -> io::Result<StagedWrite> {
    let (dir, target_name) = open_dir_and_file(path)?;
    let temp_name = format!("{target_name}.tmp");
    let mut file = dir.create(temp_name.as_str())?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(StagedWrite {
        dir,
        temp_name,
        target_name,
        committed: false,
    })
}

/// Replace `path` with `contents` atomically.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
///
/// herald_fs::write_atomic(Utf8Path::new("data/status.json"), b"[]\n")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    stage_write(path, contents)?.commit()
}

impl StagedWrite {
    /// File name of the temp file inside the target's directory.
    #[must_use]
    pub fn temp_name(&self) -> &str {
        &self.temp_name
    }

    /// Rename the temp file over the target.
    pub fn commit(mut self) -> io::Result<()> {
        self.dir
            .rename(self.temp_name.as_str(), &self.dir, self.target_name.as_str())?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            // A leftover temp file is overwritten by the next staged write.
            self.dir.remove_file(self.temp_name.as_str()).ok();
        }
    }
}
