//! Report sinks.

use std::path::{Path, PathBuf};

use cap_store::atomic_write::atomic_write;
use cap_store::StoreError;

use crate::Result;

/// Receives a rendered report.
pub trait ReportSink {
    /// Take ownership of one PDF, delivered under `filename`.
    fn accept(&mut self, filename: &str, pdf: &[u8]) -> Result<()>;
}

/// Keeps every accepted report in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Most recently accepted `(filename, bytes)`.
    pub fn last(&self) -> Option<(&str, &[u8])> {
        self.reports
            .last()
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }

    /// Remove and return the most recent report.
    pub fn take_last(&mut self) -> Option<(String, Vec<u8>)> {
        self.reports.pop()
    }
}

impl ReportSink for MemorySink {
    fn accept(&mut self, filename: &str, pdf: &[u8]) -> Result<()> {
        self.reports.push((filename.to_string(), pdf.to_vec()));
        Ok(())
    }
}

/// Writes each report into a directory, replacing any file of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportSink for DirectorySink {
    fn accept(&mut self, filename: &str, pdf: &[u8]) -> Result<()> {
        let path = self.dir.join(filename);
        atomic_write(&path, pdf).map_err(StoreError::Io)?;
        tracing::info!(path = %path.display(), bytes = pdf.len(), "report written");
        Ok(())
    }
}
