//! Append-only run log
//!
//! A human-readable event log written alongside the outputs. Every
//! failure or degradation is appended with a timestamp and separated by a
//! dash rule; the file is flushed entry by entry so an interrupted run
//! still leaves a complete record of everything logged before the
//! interruption.

use chrono::Local;
use lcpath_core::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Entry timestamp format (asctime style)
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

const SEPARATOR: &str =
    "------------------------------------------------------------------------------------------";

/// The run's event log file
pub struct RunLog {
    out: BufWriter<File>,
    path: PathBuf,
}

impl RunLog {
    /// Create `log<timestamp>.txt` in `dir` and write the header block.
    ///
    /// The file name embeds the run's unix seconds (last 8 digits), so
    /// reruns into the same directory keep their own logs.
    pub fn create(dir: &Path, set_one: &str, set_two: &str) -> Result<Self> {
        let now = Local::now();
        let secs = now.timestamp().to_string();
        let suffix = &secs[secs.len().saturating_sub(8)..];
        let path = dir.join(format!("log{}.txt", suffix));

        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "{}", SEPARATOR)?;
        writeln!(out, "Event log for least cost path analysis between locations in:")?;
        writeln!(out, "{}", set_one)?;
        writeln!(out, "{}", set_two)?;
        writeln!(out, "Event log created: {}", now.format(TIMESTAMP_FORMAT))?;
        writeln!(out, "{}", SEPARATOR)?;
        out.flush()?;

        Ok(Self { out, path })
    }

    /// Append one timestamped entry. Best-effort: a log write failure is
    /// reported to stderr but never interrupts the analysis.
    pub fn entry(&mut self, message: impl AsRef<str>) {
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        let result = writeln!(self.out, "{}: {}\n{}", stamp, message.as_ref(), SEPARATOR)
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            eprintln!("run log write failed: {}", e);
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
