use crate::core::Pipeline;
use crate::domain::model::{BatchReport, FileOutcome, FileReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub struct EtlEngine<P: Pipeline + 'static> {
    pipeline: Arc<P>,
    concurrent_files: usize,
    monitor: SystemMonitor,
}

impl<P: Pipeline + 'static> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            concurrent_files: 1,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            monitor: SystemMonitor::new(monitor_enabled),
            ..Self::new(pipeline)
        }
    }

    pub fn with_concurrency(mut self, concurrent_files: usize) -> Self {
        self.concurrent_files = concurrent_files.max(1);
        self
    }

    pub async fn run(&self) -> Result<BatchReport> {
        tracing::info!("Starting conversion run");
        if self.monitor.is_enabled() {
            tracing::info!("Resource monitoring enabled");
        }
        self.monitor.log_stats("Startup");

        let (archives, skipped_files) = self.pipeline.discover().await?;
        tracing::info!(
            "Found {} archive(s), skipped {} other file(s)",
            archives.len(),
            skipped_files
        );

        let mut files = if self.concurrent_files == 1 {
            let mut files = Vec::with_capacity(archives.len());
            for archive in archives {
                files.push(self.pipeline.convert(archive).await);
            }
            files
        } else {
            self.convert_concurrently(archives).await
        };
        files.sort_by(|a, b| a.source.cmp(&b.source));
        self.monitor.log_stats("Conversion");

        for file in &files {
            log_file_report(file);
        }

        let report = BatchReport {
            files,
            skipped_files,
        };
        tracing::info!(
            "Wrote {} row(s) from {} file(s); {} record(s) skipped, {} file(s) abandoned",
            report.rows_written(),
            report.files.len(),
            report.records_skipped(),
            report.abandoned_files()
        );
        self.monitor.log_final_stats();

        Ok(report)
    }

    async fn convert_concurrently(
        &self,
        archives: Vec<crate::domain::model::SourceArchive>,
    ) -> Vec<FileReport> {
        let semaphore = Arc::new(Semaphore::new(self.concurrent_files));
        let mut tasks = JoinSet::new();

        for archive in archives {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                pipeline.convert(archive).await
            });
        }

        let mut files = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => files.push(report),
                Err(e) => tracing::error!("File conversion task failed: {}", e),
            }
        }
        files
    }
}

fn log_file_report(file: &FileReport) {
    match &file.outcome {
        FileOutcome::Completed => tracing::info!(
            "{} -> {}: {} row(s), {} skipped",
            file.source.display(),
            file.output.display(),
            file.rows_written,
            file.records_skipped
        ),
        FileOutcome::Abandoned(reason) => tracing::warn!(
            "{} -> {}: abandoned after {} row(s): {}",
            file.source.display(),
            file.output.display(),
            file.rows_written,
            reason
        ),
    }
}
