use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::PathBuf,
};

use chrono::NaiveDate;
use serde::Serialize;

use crate::prelude::*;

/// One backed-up day as it appears on disk.
#[derive(Serialize)]
struct Record<'a> {
    day: NaiveDate,
    data: &'a serde_json::Value,
}

/// Bounded buffer of fetched days, appended to the output file in groups.
///
/// Flushing in groups bounds the memory footprint and makes partial progress
/// survive a crash: the file only ever contains complete lines.
pub struct Batch {
    path: PathBuf,
    flush_threshold: usize,
    entries: Vec<(NaiveDate, serde_json::Value)>,
}

impl Batch {
    #[must_use]
    pub fn new(path: PathBuf, flush_threshold: usize) -> Self {
        Self { path, flush_threshold, entries: Vec::with_capacity(flush_threshold) }
    }

    /// Buffer one day, flushing as soon as the threshold is reached.
    pub fn push(&mut self, day: NaiveDate, data: serde_json::Value) -> Result {
        self.entries.push((day, data));
        if self.entries.len() >= self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Append the buffered days to the output file, one JSON object per line,
    /// and clear the buffer. A no-op on an empty buffer.
    ///
    /// The file handle lives only for the duration of one flush. A write
    /// failure propagates: continuing after a torn line would corrupt the
    /// line-delimited structure.
    #[instrument(skip_all, fields(path = %self.path.display(), n_entries = self.entries.len()))]
    pub fn flush(&mut self) -> Result {
        if self.entries.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        for (day, data) in &self.entries {
            serde_json::to_writer(&mut writer, &Record { day: *day, data })?;
            writer.write_all(b"\n")?;
        }
        writer
            .flush()
            .with_context(|| format!("failed to append to `{}`", self.path.display()))?;
        info!("flushed");
        self.entries.clear();
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
