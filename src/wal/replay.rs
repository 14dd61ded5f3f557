//! Log Replay
//!
//! Rebuilds the in-memory store from the log at startup. Records are
//! applied in file order against an empty store, which reproduces the
//! same state and eviction pattern as the original run: the LRU order is
//! a pure function of the operation sequence, so evictions never need to
//! be logged. Expirations are not replayed either; an entry that had
//! expired before the crash comes back live with a fresh timestamp,
//! which is acceptable for a best-effort cache.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::{info, warn};

use crate::cache::LruStore;
use crate::wal::Record;

// == Replay Summary ==
/// Counters produced by a recovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// PUT records applied
    pub puts: usize,
    /// DEL records applied
    pub dels: usize,
    /// Malformed lines skipped
    pub skipped: usize,
}

// == Replay ==
/// Replays the log at `path` into `store`.
///
/// The store must not yet be attached to a facade: replayed mutations
/// must not append to the log or reach the replication queue, and going
/// through the bare store guarantees both.
///
/// Malformed lines are skipped with a diagnostic and recovery continues.
/// A missing file is a clean start, not an error. An I/O error while
/// reading is fatal to recovery and is returned to the caller.
pub fn replay(path: &Path, store: &mut LruStore) -> std::io::Result<ReplaySummary> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no log file found, starting with an empty cache");
            return Ok(ReplaySummary::default());
        }
        Err(err) => return Err(err),
    };

    info!(path = %path.display(), "replaying log");
    let reader = BufReader::new(file);
    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match Record::parse(&line) {
            Some(Record::Put { key, value }) => {
                store.insert(key, value);
                summary.puts += 1;
            }
            Some(Record::Del { key }) => {
                store.erase(&key);
                summary.dels += 1;
            }
            None => {
                warn!(line = idx + 1, "skipping malformed log record");
                summary.skipped += 1;
            }
        }
    }

    info!(
        puts = summary.puts,
        dels = summary.dels,
        skipped = summary.skipped,
        "log replay complete"
    );
    Ok(summary)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn replay_str(contents: &str, capacity: usize) -> (LruStore, ReplaySummary) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.wal");
        fs::write(&path, contents).unwrap();

        let mut store = LruStore::new(capacity, 0);
        let summary = replay(&path, &mut store).unwrap();
        (store, summary)
    }

    #[test]
    fn test_replay_missing_file_is_clean_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LruStore::new(10, 0);

        let summary = replay(&dir.path().join("absent.wal"), &mut store).unwrap();
        assert_eq!(summary, ReplaySummary::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replay_applies_in_order() {
        let (mut store, summary) = replay_str("PUT,a,1\nPUT,b,2\nDEL,a\nPUT,c,3\n", 10);

        assert_eq!(summary.puts, 3);
        assert_eq!(summary.dels, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(store.fetch("a"), None);
        assert_eq!(store.fetch("b"), Some("2".to_string()));
        assert_eq!(store.fetch("c"), Some("3".to_string()));
    }

    #[test]
    fn test_replay_reproduces_eviction_pattern() {
        // Four puts against capacity 3 evict the first key again.
        let (mut store, _) = replay_str("PUT,a,1\nPUT,b,2\nPUT,c,3\nPUT,d,4\n", 3);

        assert_eq!(store.len(), 3);
        assert_eq!(store.fetch("a"), None);
        assert_eq!(store.fetch("d"), Some("4".to_string()));
    }

    #[test]
    fn test_replay_skips_malformed_lines() {
        let (mut store, summary) = replay_str(
            "PUT,a,1\n\ngarbage\nDEL\nEXPIRE,a\nPUT,b,2\n",
            10,
        );

        assert_eq!(summary.puts, 2);
        assert_eq!(summary.skipped, 4);
        assert_eq!(store.fetch("a"), Some("1".to_string()));
        assert_eq!(store.fetch("b"), Some("2".to_string()));
    }

    #[test]
    fn test_replay_del_of_absent_key_is_noop() {
        let (store, summary) = replay_str("DEL,ghost\nDEL,ghost\n", 10);

        assert_eq!(summary.dels, 2);
        assert!(store.is_empty());
    }
}
