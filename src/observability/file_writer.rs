//! Rotating file writer with size-based rotation and backup retention.
//!
//! This module provides a thread-safe log sink that rotates the file once it
//! exceeds a size threshold and keeps a fixed number of backups, so the log
//! never grows without bound. It plugs into `tracing-subscriber` as a
//! [`MakeWriter`].

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size exceeds the limit, rotate:
///    - Rename current file to `<name>.<unix_nanos>`
///    - Open a fresh file on the next write
///    - Remove the oldest backups beyond the retention limit
pub struct FileWriter {
    /// Path to the primary log file.
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Lazily-initialized file handle (opens on first write).
    writer: Mutex<Option<fs::File>>,
}

impl FileWriter {
    /// Creates a writer with the default 10 MB / 3 backup limits.
    ///
    /// The file is not opened until the first write, so construction succeeds
    /// even when the directory is not writable yet.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `bytes` to the file, rotating first if it has grown too large.
    ///
    /// # Errors
    ///
    /// May fail due to:
    /// - File system permissions
    /// - Disk space exhaustion
    /// - Mutex poisoning (if another thread panicked while holding the lock)
    pub fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::other("No file available"))?;

        file.write_all(bytes)?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();

        let mut backup = self.file_path.clone().into_os_string();
        backup.push(format!(".{stamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, PathBuf::from(backup))?;
        }

        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention limit, oldest first.
    ///
    /// Individual deletion errors are ignored so cleanup continues.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = match self.file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let prefix = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| format!("{name}."))
            .ok_or_else(|| io::Error::other("Invalid file name"))?;

        let mut backups: Vec<(u128, PathBuf)> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter_map(|path| {
                let stamp = path
                    .file_name()?
                    .to_str()?
                    .strip_prefix(&prefix)?
                    .parse::<u128>()
                    .ok()?;
                Some((stamp, path))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, old_backup) in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

/// Per-event handle handed out to the fmt layer.
pub struct FileWriterHandle<'a> {
    inner: &'a FileWriter,
}

impl Write for FileWriterHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterHandle { inner: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|n| n.starts_with("test.log."))
            })
            .count()
    }

    #[test]
    fn appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.log");
        let writer = FileWriter::new(path.clone());

        writer.write_bytes(b"one\n").unwrap();
        writer.make_writer().write_all(b"two\n").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn rotates_and_caps_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.log");
        let writer = FileWriter::with_limits(path.clone(), 8, 2);

        for _ in 0..5 {
            writer.write_bytes(b"0123456789\n").unwrap();
        }

        assert_eq!(backups(dir.path()), 2);
        assert_eq!(fs::read_to_string(path).unwrap(), "0123456789\n");
    }
}
