use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::engine_info;
use threadgrab_core::{
    resolve, thread_output_dir, AttachmentDescriptor, BatchSummary, ResolveError, ResolvedThread,
};

use crate::download::{Downloader, OutcomeSink};
use crate::persist::PersistError;
use crate::thread_client::{fetch_thread, ThreadError};
use crate::{EngineConfig, FetchError, Fetcher, ReqwestFetcher};

/// Setup failures. Anything that goes wrong for a single attachment is an
/// outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("failed to build http client: {0}")]
    Client(FetchError),
    #[error(transparent)]
    Thread(#[from] ThreadError),
    #[error(transparent)]
    OutputDir(#[from] PersistError),
}

/// Everything known about a thread before any attachment is downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestPlan {
    pub thread: ResolvedThread,
    pub output_dir: PathBuf,
    pub descriptors: Vec<AttachmentDescriptor>,
}

pub struct Engine {
    config: EngineConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, HarvestError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone()).map_err(HarvestError::Client)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Resolve the thread URL, fetch its JSON and list its attachments.
    pub async fn prepare(&self, thread_url: &str) -> Result<HarvestPlan, HarvestError> {
        let thread = resolve(thread_url, &self.config.endpoints)?;
        engine_info!("resolved thread {} -> {}", thread.location, thread.api_url);

        let attachments =
            fetch_thread(self.fetcher.as_ref(), &thread, &self.config.endpoints).await?;
        let output_dir = thread_output_dir(&self.config.output_root, &thread.location);

        Ok(HarvestPlan {
            thread,
            output_dir,
            descriptors: attachments.descriptors,
        })
    }

    /// Download every attachment in `plan`, reporting outcomes as they finish.
    pub async fn download(
        &self,
        plan: HarvestPlan,
        sink: &dyn OutcomeSink,
    ) -> Result<BatchSummary, HarvestError> {
        let downloader = Downloader::new(
            Arc::clone(&self.fetcher),
            self.config.max_concurrent_downloads,
        );
        let summary = downloader
            .download_all(&plan.output_dir, plan.descriptors, sink)
            .await?;
        Ok(summary)
    }

    pub async fn harvest(
        &self,
        thread_url: &str,
        sink: &dyn OutcomeSink,
    ) -> Result<BatchSummary, HarvestError> {
        let plan = self.prepare(thread_url).await?;
        self.download(plan, sink).await
    }
}
