//! Concurrent attachment downloads.
//!
//! Every descriptor gets its own task in a [`JoinSet`]. Each task yields
//! exactly one [`DownloadOutcome`], and the caller drains the set in
//! completion order. A task that panics is reported as a failure for its
//! descriptor.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use threadgrab_core::{AttachmentDescriptor, BatchSummary, DownloadOutcome};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::persist::{ensure_output_dir, AtomicFileWriter, PersistError};
use crate::Fetcher;

/// Receives outcomes one at a time, in the order downloads finish.
pub trait OutcomeSink: Send + Sync {
    fn report(&self, outcome: &DownloadOutcome);
}

pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    limiter: Option<Arc<Semaphore>>,
}

impl Downloader {
    /// `max_concurrent` of `None` or `Some(0)` lets every download run at once.
    pub fn new(fetcher: Arc<dyn Fetcher>, max_concurrent: Option<usize>) -> Self {
        let limiter = max_concurrent
            .filter(|&n| n > 0)
            .map(|n| Arc::new(Semaphore::new(n)));
        Self { fetcher, limiter }
    }

    /// Download every descriptor into `dir`, reporting each outcome to `sink`.
    ///
    /// Only a failure to prepare `dir` is an error. Individual downloads that
    /// fail are reported through `sink` and counted in the summary.
    pub async fn download_all(
        &self,
        dir: &Path,
        descriptors: Vec<AttachmentDescriptor>,
        sink: &dyn OutcomeSink,
    ) -> Result<BatchSummary, PersistError> {
        ensure_output_dir(dir)?;

        let expected = descriptors.len();
        let mut summary = BatchSummary::default();
        if expected == 0 {
            return Ok(summary);
        }

        let writer = AtomicFileWriter::new(dir.to_path_buf());
        let mut tasks = JoinSet::new();
        let mut names = HashMap::with_capacity(expected);

        for descriptor in descriptors {
            let file_name = descriptor.file_name.clone();
            let job = DownloadJob {
                fetcher: Arc::clone(&self.fetcher),
                limiter: self.limiter.clone(),
                writer: writer.clone(),
                descriptor,
            };
            let handle = tasks.spawn(job.run());
            names.insert(handle.id(), file_name);
        }

        // One joined result per spawned task, yielded as each task finishes.
        while let Some(joined) = tasks.join_next_with_id().await {
            let outcome = match joined {
                Ok((_, outcome)) => outcome,
                Err(err) => {
                    let file_name = names.remove(&err.id()).unwrap_or_default();
                    DownloadOutcome::failed(file_name, format!("download task failed: {err}"))
                }
            };
            if let Err(message) = &outcome.result {
                engine_debug!("download of {} failed: {}", outcome.file_name, message);
            }
            sink.report(&outcome);
            summary.record(&outcome);
        }

        engine_info!(
            "batch finished: {} downloaded, {} failed",
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }
}

struct DownloadJob {
    fetcher: Arc<dyn Fetcher>,
    limiter: Option<Arc<Semaphore>>,
    writer: AtomicFileWriter,
    descriptor: AttachmentDescriptor,
}

impl DownloadJob {
    async fn run(self) -> DownloadOutcome {
        let AttachmentDescriptor {
            file_name,
            source_url,
        } = self.descriptor;

        let permit = match self.limiter {
            Some(limiter) => match limiter.acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(err) => return DownloadOutcome::failed(file_name, err),
            },
            None => None,
        };

        engine_debug!("downloading {} from {}", file_name, source_url);
        let output = match self.fetcher.fetch(&source_url).await {
            Ok(output) => output,
            Err(err) => return DownloadOutcome::failed(file_name, err),
        };
        drop(permit);

        let byte_len = output.metadata.byte_len;
        let writer = self.writer;
        let name = file_name.clone();
        let written = tokio::task::spawn_blocking(move || writer.write(&name, &output.bytes)).await;

        match written {
            Ok(Ok(path)) => {
                engine_debug!("wrote {} bytes to {}", byte_len, path.display());
                DownloadOutcome::succeeded(file_name, byte_len)
            }
            Ok(Err(err)) => DownloadOutcome::failed(file_name, err),
            Err(err) => {
                DownloadOutcome::failed(file_name, format!("write task failed: {err}"))
            }
        }
    }
}
