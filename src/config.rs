//! Configuration Module
//!
//! Loads server configuration from a simple `key = value` file.
//!
//! A missing file is not an error: the server starts with defaults.
//! Unknown keys and malformed lines are skipped with a diagnostic so a
//! typo never prevents startup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub listen_address: String,
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Time-to-live in seconds; zero or negative disables expiration
    pub ttl_seconds: i64,
    /// Path of the write-ahead log file
    pub log_file: PathBuf,
    /// Whether each log append is fsynced to disk (off by default; the
    /// durability contract only requires a flush to the OS)
    pub wal_fsync: bool,
    /// Replica endpoints this node forwards mutations to.
    /// Empty means this node runs in replica role.
    pub replica_addresses: Vec<String>,
    /// Per-call deadline for replication requests, in milliseconds
    pub replication_deadline_ms: u64,
}

impl Config {
    /// Loads configuration from the given file path.
    ///
    /// # File Format
    /// One `key = value` pair per line; `#` starts a comment. Recognised
    /// keys:
    /// - `listen-address` - bind address (default: `0.0.0.0:3000`)
    /// - `capacity` - maximum entries (default: 1000)
    /// - `ttl-seconds` - TTL in seconds, <= 0 disables (default: 300)
    /// - `log-file` - write-ahead log path (default: `cache.wal`)
    /// - `wal-fsync` - fsync each append (default: false)
    /// - `replica-addresses` - comma-separated replica endpoints
    /// - `replication-deadline-ms` - replication call deadline (default: 500)
    pub fn load(path: &Path) -> Self {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found, using defaults");
                return config;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read config file, using defaults");
                return config;
            }
        };

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => {
                    warn!(line = idx + 1, "skipping malformed config line");
                    continue;
                }
            };

            match key {
                "listen-address" => config.listen_address = value.to_string(),
                "capacity" => match value.parse() {
                    Ok(capacity) => config.capacity = capacity,
                    Err(_) => warn!(line = idx + 1, value, "invalid capacity, keeping default"),
                },
                "ttl-seconds" => match value.parse() {
                    Ok(ttl) => config.ttl_seconds = ttl,
                    Err(_) => warn!(line = idx + 1, value, "invalid ttl-seconds, keeping default"),
                },
                "log-file" => config.log_file = PathBuf::from(value),
                "wal-fsync" => match value.parse() {
                    Ok(fsync) => config.wal_fsync = fsync,
                    Err(_) => warn!(line = idx + 1, value, "invalid wal-fsync, keeping default"),
                },
                "replica-addresses" => {
                    config.replica_addresses = value
                        .split(',')
                        .map(str::trim)
                        .filter(|addr| !addr.is_empty())
                        .map(String::from)
                        .collect();
                }
                "replication-deadline-ms" => match value.parse() {
                    Ok(deadline) => config.replication_deadline_ms = deadline,
                    Err(_) => {
                        warn!(line = idx + 1, value, "invalid replication-deadline-ms, keeping default")
                    }
                },
                other => warn!(line = idx + 1, key = other, "ignoring unknown config key"),
            }
        }

        config
    }

    /// Returns true when this node forwards mutations to replicas.
    pub fn is_primary(&self) -> bool {
        !self.replica_addresses.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:3000".to_string(),
            capacity: 1000,
            ttl_seconds: 300,
            log_file: PathBuf::from("cache.wal"),
            wal_fsync: false,
            replica_addresses: Vec::new(),
            replication_deadline_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.listen_address, "0.0.0.0:3000");
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.log_file, PathBuf::from("cache.wal"));
        assert!(!config.wal_fsync);
        assert!(config.replica_addresses.is_empty());
        assert_eq!(config.replication_deadline_ms, 500);
        assert!(!config.is_primary());
    }

    #[test]
    fn test_config_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/cache.conf"));
        assert_eq!(config.capacity, 1000);
    }

    #[test]
    fn test_config_full_file() {
        let file = write_config(
            "# test config\n\
             listen-address = 127.0.0.1:4100\n\
             capacity = 64\n\
             ttl-seconds = 0\n\
             log-file = /tmp/test.wal\n\
             wal-fsync = true\n\
             replica-addresses = 10.0.0.1:4100, 10.0.0.2:4100\n\
             replication-deadline-ms = 250\n",
        );

        let config = Config::load(file.path());
        assert_eq!(config.listen_address, "127.0.0.1:4100");
        assert_eq!(config.capacity, 64);
        assert_eq!(config.ttl_seconds, 0);
        assert_eq!(config.log_file, PathBuf::from("/tmp/test.wal"));
        assert!(config.wal_fsync);
        assert_eq!(
            config.replica_addresses,
            vec!["10.0.0.1:4100".to_string(), "10.0.0.2:4100".to_string()]
        );
        assert_eq!(config.replication_deadline_ms, 250);
        assert!(config.is_primary());
    }

    #[test]
    fn test_config_skips_malformed_and_unknown_lines() {
        let file = write_config(
            "capacity 64\n\
             shard-count = 8\n\
             capacity = not-a-number\n\
             ttl-seconds = 42\n",
        );

        let config = Config::load(file.path());
        // Malformed, unknown, and unparsable lines all keep defaults.
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.ttl_seconds, 42);
    }

    #[test]
    fn test_config_empty_replica_list_items_filtered() {
        let file = write_config("replica-addresses = ,\n");
        let config = Config::load(file.path());
        assert!(config.replica_addresses.is_empty());
        assert!(!config.is_primary());
    }
}
