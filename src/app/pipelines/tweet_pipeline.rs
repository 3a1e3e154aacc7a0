use crate::core::batch;
use crate::core::{archive, ConfigProvider, Pipeline};
use crate::domain::model::{FileOutcome, FileReport, SourceArchive};
use crate::domain::ports::{TracingSink, WarningSink};
use crate::utils::error::{EtlError, Result};
use std::sync::Arc;

/// Converts every gzip archive of the configured source directory into a CSV
/// file in the output directory.
pub struct TweetPipeline<C: ConfigProvider> {
    config: C,
    sink: Arc<dyn WarningSink>,
}

impl<C: ConfigProvider> TweetPipeline<C> {
    pub fn new(config: C) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    pub fn with_sink(config: C, sink: Arc<dyn WarningSink>) -> Self {
        Self { config, sink }
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> Pipeline for TweetPipeline<C> {
    async fn discover(&self) -> Result<(Vec<SourceArchive>, usize)> {
        let source_dir = self.config.source_dir().to_path_buf();
        let output_dir = self.config.output_dir().to_path_buf();

        tracing::debug!("Scanning {}", source_dir.display());
        tokio::fs::create_dir_all(&output_dir).await?;

        let (archives, skipped) =
            tokio::task::spawn_blocking(move || batch::scan_source_dir(&source_dir))
                .await
                .map_err(|e| EtlError::ProcessingError {
                    message: format!("directory scan task failed: {}", e),
                })??;

        let (archives, collisions) =
            batch::claim_outputs(archives, &output_dir, self.sink.as_ref());
        Ok((archives, skipped + collisions))
    }

    async fn convert(&self, source: SourceArchive) -> FileReport {
        let output_dir = self.config.output_dir().to_path_buf();
        let schema = self.config.schema();
        let sink = Arc::clone(&self.sink);
        let source_path = source.path.clone();
        let output = archive::output_path_for(&source_path, &output_dir);

        let worker = tokio::task::spawn_blocking(move || {
            batch::convert_archive(&source, &output_dir, schema, sink.as_ref())
        });

        match worker.await {
            Ok(report) => report,
            Err(e) => {
                let reason = format!("conversion worker failed: {}", e);
                self.sink.warn(&format!("Abandoned {}: {}", source_path.display(), reason));
                FileReport {
                    source: source_path,
                    output,
                    rows_written: 0,
                    records_skipped: 0,
                    outcome: FileOutcome::Abandoned(reason),
                }
            }
        }
    }
}
