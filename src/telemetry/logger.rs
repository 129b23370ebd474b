//! JSONL telemetry logger with file rotation

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::TelemetryConfig;
use crate::error::Result;

use super::types::TelemetryRecord;

/// Writes telemetry records as JSON Lines to rotating files
///
/// A new file is started after `max_records_per_file` records; only
/// the newest `max_files_to_keep` files are retained. File names are
/// timestamped (`eeg-YYYYMMDD-HHMMSS.jsonl`) so lexicographic order is
/// chronological order.
pub struct TelemetryLogger {
    log_dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    current_file: Option<File>,
    records_in_current_file: usize,
    file_sequence: u32,
}

impl TelemetryLogger {
    /// Create a logger, creating the log directory if needed
    ///
    /// # Arguments
    ///
    /// * `config` - Telemetry settings (directory and rotation limits)
    ///
    /// # Errors
    ///
    /// Returns error if the log directory cannot be created
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        let log_dir = PathBuf::from(&config.log_dir);
        fs::create_dir_all(&log_dir)?;

        Ok(Self {
            log_dir,
            max_records_per_file: config.max_records_per_file,
            max_files_to_keep: config.max_files_to_keep,
            current_file: None,
            records_in_current_file: 0,
            file_sequence: 0,
        })
    }

    /// Append one record as a JSON line, rotating if the current file
    /// is full
    ///
    /// # Errors
    ///
    /// Returns error on serialization or file I/O failure
    pub fn write_record(&mut self, record: &TelemetryRecord) -> Result<()> {
        if self.current_file.is_none() || self.records_in_current_file >= self.max_records_per_file
        {
            self.rotate()?;
        }

        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        // rotate() always installs a file
        if let Some(file) = self.current_file.as_mut() {
            writeln!(file, "{}", line)?;
            self.records_in_current_file += 1;
        }

        Ok(())
    }

    /// Start a new log file and prune old ones
    ///
    /// The sequence suffix keeps names unique and lexicographically
    /// ordered when several rotations land in the same second.
    fn rotate(&mut self) -> Result<()> {
        let name = format!(
            "eeg-{}-{:04}.jsonl",
            Utc::now().format("%Y%m%d-%H%M%S"),
            self.file_sequence
        );
        self.file_sequence += 1;
        let path = self.log_dir.join(&name);

        debug!("Starting telemetry file: {}", path.display());
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        self.current_file = Some(file);
        self.records_in_current_file = 0;

        self.prune_old_files()?;
        Ok(())
    }

    /// Delete the oldest telemetry files beyond the retention limit
    fn prune_old_files(&self) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.log_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| Self::is_telemetry_file(path))
            .collect();

        files.sort();

        while files.len() > self.max_files_to_keep {
            let oldest = files.remove(0);
            if let Err(e) = fs::remove_file(&oldest) {
                warn!("Failed to prune telemetry file {}: {}", oldest.display(), e);
            } else {
                debug!("Pruned telemetry file: {}", oldest.display());
            }
        }

        Ok(())
    }

    fn is_telemetry_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("eeg-") && name.ends_with(".jsonl"))
            .unwrap_or(false)
    }
}
