use crate::domain::model::{FileReport, RowSchema, SourceArchive};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

pub trait ConfigProvider: Send + Sync {
    fn source_dir(&self) -> &Path;
    fn output_dir(&self) -> &Path;
    fn concurrent_files(&self) -> usize;
    fn schema(&self) -> RowSchema;
}

/// Receives one human-readable line per skipped record or abandoned file.
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

impl<F> WarningSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// Forwards warnings to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Keeps warnings in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Lists the recognized archives and how many other files were passed over.
    async fn discover(&self) -> Result<(Vec<SourceArchive>, usize)>;
    async fn convert(&self, archive: SourceArchive) -> FileReport;
}
