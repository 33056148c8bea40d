use engine_logging::{engine_debug, engine_warn};
use threadgrab_core::{Attachments, Endpoints, ResolvedThread, SkippedPost, Thread};

use crate::{FetchError, Fetcher};

#[derive(Debug, thiserror::Error)]
pub enum ThreadError {
    #[error("failed to fetch thread: {0}")]
    Network(#[from] FetchError),
    #[error("failed to parse thread json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetch the thread JSON and turn its media posts into download descriptors.
pub async fn fetch_thread(
    fetcher: &dyn Fetcher,
    resolved: &ResolvedThread,
    endpoints: &Endpoints,
) -> Result<Attachments, ThreadError> {
    let output = fetcher.fetch(&resolved.api_url).await?;
    engine_debug!(
        "thread {} returned {} bytes ({})",
        resolved.location,
        output.metadata.byte_len,
        output.metadata.content_type.as_deref().unwrap_or("no content type")
    );

    let thread = Thread::from_json(&output.bytes)?;
    let attachments = thread.attachments(&resolved.location, endpoints);
    engine_debug!(
        "thread {} has {} posts, {} with media",
        resolved.location,
        thread.posts.len(),
        attachments.descriptors.len()
    );

    for post in &thread.posts {
        if let (Some(tim), Some(upload)) = (post.tim, post.upload_summary()) {
            engine_debug!("post {:?}: {} stored as {}", post.no, upload, tim);
        }
    }

    for skipped in &attachments.skipped {
        match skipped {
            SkippedPost::MissingExtension { no, tim } => {
                engine_warn!("post {:?} has tim {} but no ext; skipping", no, tim);
            }
            SkippedPost::DuplicateName { no, file_name } => {
                engine_warn!("post {:?} repeats file name {}; skipping", no, file_name);
            }
        }
    }

    Ok(attachments)
}
