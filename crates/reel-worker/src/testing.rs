//! Hand-written collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use reel_models::{JobHandle, RenderResult, Script, VideoBrief};
use reel_storage::{AssetStore, StorageError, StorageResult};

use crate::backend::{PollStatus, RenderBackend, RenderRequest};
use crate::clock::ManualClock;
use crate::collaborators::{AssetRepository, ScriptWriter, VoiceoverProvider};
use crate::error::{WorkerError, WorkerResult};

/// Backend that replays a fixed sequence of poll results.
///
/// Once the sequence is used up every poll reports 50% progress.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<PollStatus>>,
    reject: bool,
    failing_polls: AtomicU32,
    latency: Option<(Arc<ManualClock>, Duration)>,
    submit_latency: Option<(Arc<ManualClock>, Duration)>,
    submits: AtomicU32,
    polls: AtomicU32,
    requests: Mutex<Vec<RenderRequest>>,
}

impl ScriptedBackend {
    pub const OUTPUT_BYTES: &'static [u8] = b"\x00\x00\x00\x18ftypmp42";

    pub fn new(script: Vec<PollStatus>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            reject: false,
            failing_polls: AtomicU32::new(0),
            latency: None,
            submit_latency: None,
            submits: AtomicU32::new(0),
            polls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Backend that rejects every submission.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::new(vec![])
        }
    }

    /// Fail the first `count` polls at the transport level.
    pub fn with_failing_polls(self, count: u32) -> Self {
        self.failing_polls.store(count, Ordering::SeqCst);
        self
    }

    /// Advance `clock` by `secs` on every poll.
    pub fn with_poll_latency(mut self, clock: Arc<ManualClock>, secs: u64) -> Self {
        self.latency = Some((clock, Duration::from_secs(secs)));
        self
    }

    /// Advance `clock` by `secs` when the job is submitted.
    pub fn with_submit_latency(mut self, clock: Arc<ManualClock>, secs: u64) -> Self {
        self.submit_latency = Some((clock, Duration::from_secs(secs)));
        self
    }

    pub fn submit_count(&self) -> u32 {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderBackend for ScriptedBackend {
    async fn submit(&self, request: &RenderRequest) -> WorkerResult<JobHandle> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some((clock, latency)) = &self.submit_latency {
            clock.advance(*latency);
        }
        if self.reject {
            return Err(WorkerError::submission_failed("400 Bad Request: invalid props"));
        }
        Ok(JobHandle {
            render_id: "render-1".to_string(),
            bucket_name: "renders".to_string(),
        })
    }

    async fn poll(&self, _handle: &JobHandle) -> WorkerResult<PollStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if let Some((clock, latency)) = &self.latency {
            clock.advance(*latency);
        }
        let remaining = self.failing_polls.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_polls.store(remaining - 1, Ordering::SeqCst);
            return Err(WorkerError::poll_failed("connection reset by peer"));
        }
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| PollStatus::in_progress(0.5)))
    }

    async fn fetch_output(&self, _output_ref: &str) -> WorkerResult<Vec<u8>> {
        Ok(Self::OUTPUT_BYTES.to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub path: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub upsert: bool,
}

/// In-memory asset store.
pub struct MemoryStore {
    base_url: String,
    uploads: Mutex<Vec<Upload>>,
}

impl MemoryStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> StorageResult<()> {
        let mut uploads = self.uploads.lock().unwrap();
        if !upsert && uploads.iter().any(|u| u.path == path) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        uploads.push(Upload {
            path: path.to_string(),
            bytes,
            content_type: content_type.to_string(),
            upsert,
        });
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Store whose uploads always fail.
pub struct FailingStore;

#[async_trait]
impl AssetStore for FailingStore {
    async fn upload(&self, _: &str, _: Vec<u8>, _: &str, _: bool) -> StorageResult<()> {
        Err(StorageError::upload_failed("connection reset"))
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://unused.example/{}", path)
    }
}

/// Store whose uploads never finish in test time.
pub struct StalledStore;

#[async_trait]
impl AssetStore for StalledStore {
    async fn upload(&self, _: &str, _: Vec<u8>, _: &str, _: bool) -> StorageResult<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://unused.example/{}", path)
    }
}

/// Script writer returning a fixed script, or failing.
pub struct StaticScriptWriter {
    script: Option<Script>,
}

impl StaticScriptWriter {
    pub fn new(script: Script) -> Self {
        Self {
            script: Some(script),
        }
    }

    pub fn failing() -> Self {
        Self { script: None }
    }
}

#[async_trait]
impl ScriptWriter for StaticScriptWriter {
    async fn write_script(&self, _brief: &VideoBrief) -> WorkerResult<Script> {
        self.script
            .clone()
            .ok_or_else(|| WorkerError::script_failed("model returned no scenes"))
    }
}

/// Voiceover provider returning a fixed URL, or failing.
pub struct StaticVoiceover {
    url: Option<String>,
    calls: AtomicU32,
}

impl StaticVoiceover {
    pub fn new(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceoverProvider for StaticVoiceover {
    async fn synthesize(&self, _business_id: &str, _narration: &str) -> WorkerResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.url
            .clone()
            .ok_or_else(|| WorkerError::synthesis_unavailable("TTS quota exceeded"))
    }
}

/// Repository that remembers saved assets, optionally failing.
#[derive(Default)]
pub struct RecordingRepository {
    fail: bool,
    saved: Mutex<Vec<(String, RenderResult)>>,
}

impl RecordingRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn saved(&self) -> Vec<(String, RenderResult)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetRepository for RecordingRepository {
    async fn save_video_asset(&self, business_id: &str, result: &RenderResult) -> WorkerResult<()> {
        if self.fail {
            return Err(WorkerError::persistence_failed("database unavailable"));
        }
        self.saved
            .lock()
            .unwrap()
            .push((business_id.to_string(), result.clone()));
        Ok(())
    }
}
