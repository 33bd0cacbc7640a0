//! Recorded media fragments and the finalized artifact

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

/// Content type used when no fragment declares one
pub const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

/// One chunk of encoded media pushed by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFragment {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl MediaFragment {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Default)]
struct SinkInner {
    fragments: Vec<MediaFragment>,
    closed: bool,
}

/// Append-only fragment buffer shared with the device while recording.
///
/// Empty fragments are dropped on arrival. Once closed, further pushes are
/// ignored so a late callback cannot alter a finalized recording.
#[derive(Debug, Clone, Default)]
pub struct FragmentSink {
    inner: Arc<Mutex<SinkInner>>,
}

impl FragmentSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SinkInner> {
        // A panicking pusher cannot leave the Vec half-written; keep going
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a fragment. Returns whether it was kept.
    pub fn push(&self, fragment: MediaFragment) -> bool {
        if fragment.data.is_empty() {
            return false;
        }
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        inner.fragments.push(fragment);
        true
    }

    /// Stop accepting fragments
    pub fn close(&self) {
        self.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of fragments held
    pub fn len(&self) -> usize {
        self.lock().fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes held
    pub fn total_bytes(&self) -> usize {
        self.lock().fragments.iter().map(MediaFragment::size).sum()
    }

    /// Drain all fragments in arrival order
    pub fn take(&self) -> Vec<MediaFragment> {
        std::mem::take(&mut self.lock().fragments)
    }
}

/// Finalized, immutable recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    data: Arc<[u8]>,
    content_type: String,
    captured_at: DateTime<Utc>,
}

impl Artifact {
    /// Concatenate fragments in order.
    ///
    /// The content type is that of the first non-empty fragment, or
    /// [`DEFAULT_CONTENT_TYPE`] when there is none (or it declares none).
    pub fn from_fragments(fragments: &[MediaFragment], captured_at: DateTime<Utc>) -> Self {
        let content_type = fragments
            .iter()
            .find(|fragment| !fragment.data.is_empty())
            .map(|fragment| fragment.content_type.trim())
            .filter(|content_type| !content_type.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let data: Vec<u8> = fragments
            .iter()
            .flat_map(|fragment| fragment.data.iter().copied())
            .collect();

        Self {
            data: data.into(),
            content_type,
            captured_at,
        }
    }

    /// Wrap an existing recording (e.g. a file on disk)
    pub fn from_bytes(data: Vec<u8>, content_type: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        let content_type = content_type.into();
        let content_type = if content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE.to_string()
        } else {
            content_type
        };
        Self {
            data: data.into(),
            content_type,
            captured_at,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}
