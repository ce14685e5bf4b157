//! CSV event log sink.
//!
//! Writes one row per arbitration decision:
//!
//! ```text
//! clock,pid,policy,granted,req0..req{m-1},avail0..avail{m-1}
//! ```
//!
//! The sink is best effort: a write failure is logged once and the run
//! continues without further rows.

use locksim_engine::{EventSink, RequestEvent};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// [`EventSink`] that appends arbitration events to a CSV file
pub struct CsvEventLog {
    writer: BufWriter<File>,
    failed: bool,
}

impl CsvEventLog {
    /// Create the log file, truncating any previous one, and write the
    /// header row for `m` resource types.
    pub fn create(path: &Path, m: usize) -> std::io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);

        let mut header = String::from("clock,pid,policy,granted");
        for j in 0..m {
            header.push_str(&format!(",req{j}"));
        }
        for j in 0..m {
            header.push_str(&format!(",avail{j}"));
        }
        writeln!(writer, "{header}")?;

        Ok(Self {
            writer,
            failed: false,
        })
    }

    /// Flush buffered rows to disk
    pub fn finish(mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    fn write_row(&mut self, event: &RequestEvent) -> std::io::Result<()> {
        write!(
            self.writer,
            "{},{},{},{}",
            event.clock,
            event.pid.as_u32(),
            event.policy.as_str(),
            u8::from(event.granted)
        )?;
        for v in &event.request {
            write!(self.writer, ",{v}")?;
        }
        for v in &event.available {
            write!(self.writer, ",{v}")?;
        }
        writeln!(self.writer)
    }
}

impl EventSink for CsvEventLog {
    fn record(&mut self, event: &RequestEvent) {
        if self.failed {
            return;
        }
        if let Err(e) = self.write_row(event) {
            self.failed = true;
            tracing::warn!(error = %e, "event log write failed, disabling log");
        }
    }
}
