//! Stage log file writer.
//!
//! Every stage appends to one persistent log file: a header block when the
//! stage starts, one line per step on that step's completion (success or
//! failure), occasional notes (e.g. downstream enqueues), and a trailer
//! block when the whole stage succeeds. Chained stages are handed the same
//! path, so a sample's log reads as one continuous history.
//!
//! Lines are first formatted into a temporary per-step buffer and flushed
//! to the file when the step completes, then the buffer is cleared.

use crate::error::Result;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Buffered writer for one stage's log entries.
#[derive(Debug)]
pub struct StageLog {
    path: PathBuf,
    buffer: String,
}

impl StageLog {
    /// Open the log at `path` (creating it if absent) and append the
    /// stage header block.
    pub fn open(path: &Path, process_name: &str, genome_build: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut log = Self {
            path: path.to_path_buf(),
            buffer: String::new(),
        };
        log.buffer.push_str(&format!(
            "==== seqpipe {} ====\nstarted: {}\ngenome build: {}\n",
            process_name,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            genome_build
        ));
        log.flush()?;
        Ok(log)
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one completed step: name, rendered command, start time,
    /// elapsed wall time, and exit status.
    pub fn step_entry(
        &mut self,
        name: &str,
        command: &str,
        started: DateTime<Local>,
        elapsed: Duration,
        exit_code: Option<i32>,
    ) -> Result<()> {
        let status = match exit_code {
            Some(0) => "ok".to_string(),
            Some(code) => format!("exit={}", code),
            None => "killed".to_string(),
        };
        self.buffer.push_str(&format!(
            "{} [{}] {} elapsed={:.1}s :: {}\n",
            started.format("%Y-%m-%d %H:%M:%S"),
            name,
            status,
            elapsed.as_secs_f64(),
            command
        ));
        self.flush()
    }

    /// Record a free-form note (e.g. a downstream enqueue).
    pub fn note(&mut self, line: &str) -> Result<()> {
        self.buffer.push_str(&format!(
            "{} {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            line
        ));
        self.flush()
    }

    /// Append the trailer block. Written only when every step succeeded.
    pub fn trailer(&mut self) -> Result<()> {
        self.buffer.push_str(&format!(
            "finished: {}\n====\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        self.flush()
    }

    /// Append the buffer to the log file and clear it.
    fn flush(&mut self) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(self.buffer.as_bytes())?;
        self.buffer.clear();
        Ok(())
    }
}
