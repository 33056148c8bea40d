//! threadgrab core: thread URL resolution and the typed thread model, free of IO.
mod endpoints;
mod location;
mod outcome;
mod paths;
mod thread;

pub use endpoints::Endpoints;
pub use location::{resolve, ResolveError, ResolvedThread, ThreadLocation};
pub use outcome::{BatchSummary, DownloadOutcome};
pub use paths::thread_output_dir;
pub use thread::{AttachmentDescriptor, Attachments, Post, SkippedPost, Thread};
