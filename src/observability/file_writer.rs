//! Size-rotated line writer for trace output.
//!
//! Lines are appended to a single active file. Once the next line would push
//! it past the size limit, the active file becomes backup `.1`, older backups
//! shift up by one, and anything beyond the retention count is removed.
//!
//! ```text
//! homescout-traces.json      ← active
//! homescout-traces.json.1    ← newest backup
//! homescout-traces.json.2
//! homescout-traces.json.3    ← oldest retained
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// When to rotate and how many backups to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for RotationPolicy {
    /// 10 MB per file, 3 backups.
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            backups: 3,
        }
    }
}

#[derive(Default)]
struct ActiveFile {
    file: Option<File>,
    /// Bytes in the active file, including bytes present before it was opened.
    len: u64,
}

/// Thread-safe rotating writer.
///
/// The file is opened lazily on the first write, so construction never fails.
pub struct RotatingFileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    active: Mutex<ActiveFile>,
}

impl RotatingFileWriter {
    #[must_use]
    pub fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            path,
            policy,
            active: Mutex::new(ActiveFile::default()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a newline, rotating first if the limit would be exceeded.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from opening, rotating, or writing, or an error if
    /// another writer panicked while holding the lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut active = self
            .active
            .lock()
            .map_err(|e| io::Error::other(format!("trace writer lock poisoned: {e}")))?;

        if active.file.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            active.len = file.metadata()?.len();
            active.file = Some(file);
        }

        let incoming = line.len() as u64 + 1;
        if active.len > 0 && active.len + incoming > self.policy.max_bytes {
            active.file = None;
            self.rotate()?;
            active.file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
            active.len = 0;
        }

        let file = active
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("trace file unavailable"))?;
        writeln!(file, "{line}")?;
        file.flush()?;
        active.len += incoming;
        Ok(())
    }

    /// Shifts `.N` backups up by one and moves the active file to `.1`.
    fn rotate(&self) -> io::Result<()> {
        if self.policy.backups == 0 {
            return remove_if_exists(&self.path);
        }

        remove_if_exists(&self.backup_path(self.policy.backups))?;
        for index in (1..self.policy.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path(1))?;
        }
        Ok(())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(OsString::new, ToOwned::to_owned);
        name.push(format!(".{index}"));
        self.path.with_file_name(name)
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
