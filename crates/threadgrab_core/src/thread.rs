use std::collections::HashSet;

use serde::Deserialize;

use crate::{Endpoints, ThreadLocation};

/// Top-level JSON document returned by the thread API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thread {
    pub posts: Vec<Post>,
}

/// One post. Every field is optional; only `tim` and `ext` matter for media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub no: Option<u64>,
    pub tim: Option<u64>,
    pub ext: Option<String>,
    pub filename: Option<String>,
    pub fsize: Option<u64>,
}

impl Post {
    /// The uploader's file name and size, e.g. `clip.webm (1024 bytes)`.
    /// `None` for posts without media.
    pub fn upload_summary(&self) -> Option<String> {
        self.tim?;
        let name = self.filename.as_deref().unwrap_or("unnamed");
        let ext = self.ext.as_deref().unwrap_or_default();
        Some(match self.fsize {
            Some(size) => format!("{name}{ext} ({size} bytes)"),
            None => format!("{name}{ext}"),
        })
    }
}

/// A single file to download: where it comes from and what to call it locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachmentDescriptor {
    pub file_name: String,
    pub source_url: String,
}

/// Why a post did not produce an attachment even though it looked like a
/// media post. Posts without `tim` are plain text and never show up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkippedPost {
    MissingExtension { no: Option<u64>, tim: u64 },
    DuplicateName { no: Option<u64>, file_name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    pub descriptors: Vec<AttachmentDescriptor>,
    pub skipped: Vec<SkippedPost>,
}

impl Thread {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Build one descriptor per media post, in post order.
    pub fn attachments(&self, location: &ThreadLocation, endpoints: &Endpoints) -> Attachments {
        let mut out = Attachments::default();
        let mut seen = HashSet::new();

        for post in &self.posts {
            let Some(tim) = post.tim else {
                continue;
            };
            let Some(ext) = post.ext.as_deref() else {
                out.skipped.push(SkippedPost::MissingExtension { no: post.no, tim });
                continue;
            };

            let file_name = format!("{tim}{ext}");
            if !seen.insert(file_name.clone()) {
                out.skipped.push(SkippedPost::DuplicateName {
                    no: post.no,
                    file_name,
                });
                continue;
            }

            out.descriptors.push(AttachmentDescriptor {
                source_url: endpoints.media_url(location.board(), tim, ext),
                file_name,
            });
        }

        out
    }
}
