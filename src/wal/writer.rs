//! Log Writer
//!
//! Append-mode handle over the log file. A record counts as durable once
//! it has been written and the buffer flushed to the operating system;
//! fsync is available as an opt-in for callers that want it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::{CacheError, Result};
use crate::wal::Record;

// == Wal Writer ==
/// Appends records to the log file.
///
/// Opened after recovery has replayed the existing file, and attached to
/// the cache facade for the facade's lifetime. The handle flushes on
/// close and on drop.
#[derive(Debug)]
pub struct WalWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    fsync: bool,
}

impl WalWriter {
    // == Open ==
    /// Opens the log file for appending, creating it if absent.
    pub fn open(path: impl AsRef<Path>, fsync: bool) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!(path = %path.display(), "opened write-ahead log for appending");

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            fsync,
        })
    }

    // == Append ==
    /// Appends one record and flushes it to the OS.
    ///
    /// On failure the caller must not apply the mutation; the store and
    /// the log would otherwise disagree after a crash.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        self.try_append(record).map_err(CacheError::LogWrite)
    }

    fn try_append(&mut self, record: &Record) -> std::io::Result<()> {
        self.writer.write_all(record.encode().as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        if self.fsync {
            self.writer.get_ref().sync_all()?;
        }
        Ok(())
    }

    // == Close ==
    /// Flushes and releases the handle.
    pub fn close(mut self) -> std::io::Result<()> {
        self.writer.flush()?;
        info!(path = %self.path.display(), "closed write-ahead log");
        Ok(())
    }

    // == Path ==
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WalWriter {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            error!(path = %self.path.display(), error = %err, "failed to flush log on drop");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wal");

        let mut writer = WalWriter::open(&path, false).unwrap();
        writer
            .append(&Record::Put {
                key: "a".to_string(),
                value: "1".to_string(),
            })
            .unwrap();
        writer
            .append(&Record::Del {
                key: "a".to_string(),
            })
            .unwrap();
        writer.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "PUT,a,1\nDEL,a\n");
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wal");
        fs::write(&path, "PUT,old,value\n").unwrap();

        let mut writer = WalWriter::open(&path, false).unwrap();
        writer
            .append(&Record::Put {
                key: "new".to_string(),
                value: "value".to_string(),
            })
            .unwrap();
        writer.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "PUT,old,value\nPUT,new,value\n");
    }

    #[test]
    fn test_fsync_append_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wal");

        let mut writer = WalWriter::open(&path, true).unwrap();
        writer
            .append(&Record::Put {
                key: "a".to_string(),
                value: "1".to_string(),
            })
            .unwrap();
        writer.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "PUT,a,1\n");
    }

    #[test]
    fn test_drop_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.wal");

        {
            let mut writer = WalWriter::open(&path, false).unwrap();
            writer
                .append(&Record::Del {
                    key: "a".to_string(),
                })
                .unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "DEL,a\n");
    }
}
