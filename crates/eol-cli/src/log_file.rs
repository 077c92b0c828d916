// crates/eol-cli/src/log_file.rs
// ============================================================================
// Module: Rotating Log File
// Description: Size-bounded diagnostic log with numbered backups.
// Purpose: Keep the station log from growing without bound on the fixture PC.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`RotatingLogFile`] appends to `<dir>/<name>`. When a write would take
//! the file past its size bound, the file is shifted to `<name>.1`, older
//! backups move up by one, and the oldest beyond the backup count is
//! removed. The writer is wrapped in a `Mutex` and handed to the tracing
//! file layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Append-mode log file rotated by size.
///
/// # Invariants
/// - `written` tracks the current file length.
/// - At most `backups` numbered files exist next to the live file.
#[derive(Debug)]
pub struct RotatingLogFile {
    /// Live log path.
    path: PathBuf,
    /// Size bound in bytes for the live file.
    max_bytes: u64,
    /// Number of numbered backups kept.
    backups: u32,
    /// Open handle; `None` only while rotating.
    file: Option<File>,
    /// Bytes in the live file.
    written: u64,
}

impl RotatingLogFile {
    /// Opens `dir/name` for appending, creating the directory.
    ///
    /// A live file already past the bound is rotated before use.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory or file cannot be opened.
    pub fn open(dir: &Path, name: &str, max_bytes: u64, backups: u32) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        let mut log = Self { path, max_bytes: max_bytes.max(1), backups, file: Some(file), written };
        if log.written >= log.max_bytes {
            log.rotate()?;
        }
        Ok(log)
    }

    /// Returns the live log path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of backup `index` (1 is the newest).
    #[must_use]
    pub fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    /// Shifts backups up by one and starts an empty live file.
    fn rotate(&mut self) -> io::Result<()> {
        drop(self.file.take());
        if self.backups == 0 {
            fs::remove_file(&self.path)?;
        } else {
            let oldest = self.backup_path(self.backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1 .. self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }
        self.file = Some(open_append(&self.path)?);
        self.written = 0;
        Ok(())
    }

    /// Returns the live handle, reopening it after a failed rotation.
    fn file(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = open_append(&self.path)?;
            self.written = file.metadata()?.len();
            self.file = Some(file);
        }
        self.file.as_mut().ok_or_else(|| io::Error::other("log file unavailable"))
    }
}

impl Write for RotatingLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = u64::try_from(buf.len()).unwrap_or(u64::MAX);
        if self.written > 0 && self.written.saturating_add(incoming) > self.max_bytes {
            self.rotate()?;
        }
        let count = self.file()?.write(buf)?;
        self.written = self.written.saturating_add(u64::try_from(count).unwrap_or(u64::MAX));
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}

/// Opens `path` in create-append mode.
fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
