//! In-memory stand-ins for the platform media layer and the backend
//!
//! Every fake counts what was done to it so tests can assert on acquisition
//! and release bookkeeping.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sprout_common::model::ChildSnapshot;
use sprout_common::{ChildId, MilestoneId};
use sprout_studio::capture::{
    Artifact, FragmentSink, MediaConstraints, MediaDevices, MediaFragment, MediaStream,
    PreviewSurface, RecordingTap,
};
use sprout_studio::error::{ApiError, DeviceError, UploadError};
use sprout_studio::upload::EvidenceTransport;
use sprout_studio::SnapshotSource;

/// Shared counters observed by tests
#[derive(Debug, Default)]
pub struct Counters {
    pub opens: AtomicUsize,
    pub releases: AtomicUsize,
    pub recordings: AtomicUsize,
    pub taps_stopped: AtomicUsize,
    pub attaches: AtomicUsize,
    pub detaches: AtomicUsize,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Scripted response to one `open` call
#[derive(Debug, Clone)]
pub enum DeviceOutcome {
    Grant,
    Fail(DeviceError),
    /// Never resolves (permission prompt left open)
    Hang,
}

pub struct FakeDevices {
    outcomes: Mutex<VecDeque<DeviceOutcome>>,
    requests: Mutex<Vec<MediaConstraints>>,
    fragments: Vec<MediaFragment>,
    pub counters: Arc<Counters>,
}

impl FakeDevices {
    /// Grants every request; recordings deliver `fragments` as soon as they start
    pub fn granting(fragments: Vec<MediaFragment>) -> Arc<Self> {
        Self::scripted(vec![], fragments)
    }

    /// Replays `outcomes` in order, then grants
    pub fn scripted(outcomes: Vec<DeviceOutcome>, fragments: Vec<MediaFragment>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
            fragments,
            counters: Arc::new(Counters::default()),
        })
    }

    pub fn requests(&self) -> Vec<MediaConstraints> {
        self.requests.lock().unwrap().clone()
    }

    pub fn opens(&self) -> usize {
        Counters::get(&self.counters.opens)
    }

    pub fn releases(&self) -> usize {
        Counters::get(&self.counters.releases)
    }
}

#[async_trait]
impl MediaDevices for FakeDevices {
    async fn open(&self, constraints: &MediaConstraints) -> Result<Box<dyn MediaStream>, DeviceError> {
        self.requests.lock().unwrap().push(*constraints);
        self.counters.opens.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DeviceOutcome::Grant);

        match outcome {
            DeviceOutcome::Grant => Ok(Box::new(FakeStream {
                label: format!("fake camera ({:?})", constraints.video),
                fragments: self.fragments.clone(),
                counters: self.counters.clone(),
            })),
            DeviceOutcome::Fail(e) => Err(e),
            DeviceOutcome::Hang => std::future::pending().await,
        }
    }
}

struct FakeStream {
    label: String,
    fragments: Vec<MediaFragment>,
    counters: Arc<Counters>,
}

impl MediaStream for FakeStream {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn start_recording(&self, sink: FragmentSink) -> Result<Box<dyn RecordingTap>, DeviceError> {
        self.counters.recordings.fetch_add(1, Ordering::SeqCst);
        for fragment in &self.fragments {
            sink.push(fragment.clone());
        }
        Ok(Box::new(FakeTap {
            counters: self.counters.clone(),
        }))
    }

    fn stop_tracks(&self) {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeTap {
    counters: Arc<Counters>,
}

impl RecordingTap for FakeTap {
    fn stop(self: Box<Self>) {
        self.counters.taps_stopped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Preview that only counts attach/detach calls
pub struct CountingPreview {
    counters: Arc<Counters>,
}

impl CountingPreview {
    pub fn boxed(counters: &Arc<Counters>) -> Box<dyn PreviewSurface> {
        Box::new(Self {
            counters: counters.clone(),
        })
    }
}

impl PreviewSurface for CountingPreview {
    fn attach(&mut self, _stream: &dyn MediaStream) {
        self.counters.attaches.fetch_add(1, Ordering::SeqCst);
    }

    fn detach(&mut self) {
        self.counters.detaches.fetch_add(1, Ordering::SeqCst);
    }
}

/// Scripted response to one upload
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Accept,
    Fail(UploadError),
    /// Never resolves (stalled network)
    Hang,
}

#[derive(Default)]
pub struct FakeTransport {
    outcomes: Mutex<VecDeque<UploadOutcome>>,
    uploads: Mutex<Vec<(MilestoneId, Artifact)>>,
}

impl FakeTransport {
    /// Replays `outcomes` in order, then accepts
    pub fn scripted(outcomes: Vec<UploadOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::default()
    }

    /// Every upload attempted, including failed ones
    pub fn uploads(&self) -> Vec<(MilestoneId, Artifact)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvidenceTransport for FakeTransport {
    async fn upload(&self, milestone_id: MilestoneId, artifact: &Artifact) -> Result<(), UploadError> {
        self.uploads
            .lock()
            .unwrap()
            .push((milestone_id, artifact.clone()));

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(UploadOutcome::Accept);

        match outcome {
            UploadOutcome::Accept => Ok(()),
            UploadOutcome::Fail(e) => Err(e),
            UploadOutcome::Hang => std::future::pending().await,
        }
    }
}

/// Serves snapshots from a queue; the last one repeats
pub struct FakeSnapshots {
    snapshots: Mutex<VecDeque<Result<ChildSnapshot, ApiError>>>,
    pub fetches: AtomicUsize,
}

impl FakeSnapshots {
    pub fn new(snapshots: Vec<Result<ChildSnapshot, ApiError>>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for FakeSnapshots {
    async fn fetch_snapshot(&self, child_id: ChildId) -> Result<ChildSnapshot, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut snapshots = self.snapshots.lock().unwrap();
        let next = if snapshots.len() > 1 {
            snapshots.pop_front()
        } else {
            snapshots.front().cloned()
        };
        next.unwrap_or_else(|| Err(ApiError::NotFound(format!("child {}", child_id))))
    }
}

/// Parse a snapshot from the backend's JSON shape
pub fn snapshot(json: serde_json::Value) -> ChildSnapshot {
    serde_json::from_value(json).expect("valid snapshot json")
}

pub fn fragment(size: usize, content_type: &str) -> MediaFragment {
    MediaFragment::new(vec![0xAB; size], content_type)
}
