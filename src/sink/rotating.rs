//! Size-bounded log file with a fixed-depth ring of archived generations:
//! `app.log` rolls to `app.log.1`, `app.log.1` to `app.log.2`, and so on up
//! to `backup_count`; the oldest generation is discarded.

use super::compress::compress_file;
use super::{Record, Sink};
use crate::Error;
use crate::internal;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// When and how far to rotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size the active file may reach. `0` disables rotation.
    pub max_bytes: u64,
    /// Archived generations to keep. `0` disables rotation.
    pub backup_count: usize,
    /// Gzip archived generations (`app.log.1.gz`).
    pub compress: bool,
}

impl RotationPolicy {
    pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
    pub const DEFAULT_BACKUP_COUNT: usize = 5;
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
            backup_count: Self::DEFAULT_BACKUP_COUNT,
            compress: false,
        }
    }
}

struct ActiveFile {
    /// `None` only between a failed reopen and the next write.
    file: Option<File>,
    size: u64,
}

/// Appends lines to one file and rotates it per [`RotationPolicy`].
pub struct RotatingFileSink {
    path: PathBuf,
    policy: RotationPolicy,
    state: Mutex<ActiveFile>,
}

impl std::fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileSink")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl RotatingFileSink {
    /// Opens (creating if needed) `path` for append. Missing parent directories are created.
    ///
    /// # Errors
    /// [`Error::CreateDir`] if a parent directory cannot be created,
    /// [`Error::OpenFile`] if the file cannot be opened for append.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> Result<Self, Error> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = open_append(&path).map_err(|source| Error::OpenFile {
            path: path.clone(),
            source,
        })?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);
        internal::debug(
            "FILE",
            &format!("Opened {} ({size} bytes)", path.display()),
        );

        Ok(Self {
            path,
            policy,
            state: Mutex::new(ActiveFile {
                file: Some(file),
                size,
            }),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Name of archived generation `n` (1 = newest).
    #[must_use]
    pub fn archive_path(&self, n: usize) -> PathBuf {
        let suffix = if self.policy.compress {
            format!(".{n}.gz")
        } else {
            format!(".{n}")
        };
        let mut name = self.path.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn should_rotate(&self, current: u64, incoming: u64) -> bool {
        // An empty file is never archived, even if a single line exceeds the limit
        self.policy.max_bytes > 0
            && self.policy.backup_count > 0
            && current > 0
            && current + incoming > self.policy.max_bytes
    }

    fn rotate(&self, state: &mut ActiveFile) -> Result<(), Error> {
        // Close before renaming so platforms that lock open files can move it
        state.file = None;

        let oldest = self.archive_path(self.policy.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.policy.backup_count).rev() {
            let src = self.archive_path(n);
            if src.exists() {
                fs::rename(&src, self.archive_path(n + 1))?;
            }
        }

        let newest = self.archive_path(1);
        if self.policy.compress {
            compress_file(&self.path, &newest)?;
        } else {
            fs::rename(&self.path, &newest)?;
        }

        state.file = Some(open_append(&self.path)?);
        state.size = 0;
        internal::debug("ROTATE", &format!("Rotated {}", self.path.display()));
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn write(&self, _record: &Record, line: &str) -> Result<(), Error> {
        let mut content = String::with_capacity(line.len() + 1);
        content.push_str(line);
        content.push('\n');
        let incoming = content.len() as u64;

        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;

        if self.should_rotate(state.size, incoming)
            && let Err(e) = self.rotate(state)
        {
            // Keep appending to whatever is at the active path rather than dropping records
            internal::error(
                "ROTATE",
                &format!("Rotation of {} failed: {e}", self.path.display()),
            );
        }

        if state.file.is_none() {
            let file = open_append(&self.path)?;
            state.size = file.metadata().map(|m| m.len()).unwrap_or(0);
            state.file = Some(file);
        }

        if let Some(file) = state.file.as_mut() {
            // Single write per record keeps lines whole
            file.write_all(content.as_bytes())?;
            state.size += incoming;
        }

        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = state.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use tempfile::TempDir;

    fn write_line(sink: &RotatingFileSink, line: &str) {
        let record = Record::now("test", Level::Info, line);
        sink.write(&record, line).unwrap();
    }

    #[test]
    fn archive_names() {
        let tmp = TempDir::new().unwrap();
        let sink = RotatingFileSink::open(tmp.path().join("app.log"), RotationPolicy::default())
            .unwrap();
        assert_eq!(sink.archive_path(3), tmp.path().join("app.log.3"));

        let gz = RotatingFileSink::open(
            tmp.path().join("gz.log"),
            RotationPolicy {
                compress: true,
                ..RotationPolicy::default()
            },
        )
        .unwrap();
        assert_eq!(gz.archive_path(1), tmp.path().join("gz.log.1.gz"));
    }

    #[test]
    fn oversized_first_line_does_not_rotate_empty_file() {
        let tmp = TempDir::new().unwrap();
        let policy = RotationPolicy {
            max_bytes: 4,
            backup_count: 2,
            compress: false,
        };
        let sink = RotatingFileSink::open(tmp.path().join("a.log"), policy).unwrap();
        write_line(&sink, "much longer than four bytes");
        assert!(!sink.archive_path(1).exists());
    }

    #[test]
    fn zero_backups_never_rotates() {
        let tmp = TempDir::new().unwrap();
        let policy = RotationPolicy {
            max_bytes: 10,
            backup_count: 0,
            compress: false,
        };
        let path = tmp.path().join("t.log");
        let sink = RotatingFileSink::open(&path, policy).unwrap();
        for i in 0..5 {
            write_line(&sink, &format!("line{i}"));
        }

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "line0\nline1\nline2\nline3\nline4\n"
        );
        assert!(!tmp.path().join("t.log.1").exists());
    }

    #[test]
    fn reopen_picks_up_existing_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("s.log");
        fs::write(&path, "0123456789\n").unwrap();
        let policy = RotationPolicy {
            max_bytes: 12,
            backup_count: 1,
            compress: false,
        };
        let sink = RotatingFileSink::open(&path, policy).unwrap();
        write_line(&sink, "x");

        assert_eq!(fs::read_to_string(sink.archive_path(1)).unwrap(), "0123456789\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }
}
