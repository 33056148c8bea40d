use std::path::{Path, PathBuf};

use crate::ThreadLocation;

/// `{root}/{board}/No. {thread_no}`
pub fn thread_output_dir(root: &Path, location: &ThreadLocation) -> PathBuf {
    root.join(location.board())
        .join(format!("No. {}", location.thread_no()))
}
