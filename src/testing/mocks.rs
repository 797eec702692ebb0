//! In-memory host collaborators
//!
//! Every mock is cheap to clone and clones share state, so a test can hand
//! one copy to the controller and keep another to inspect what happened.

use crate::errors::CameraError;
use crate::platform::{
    AudioCue, Canvas, DeviceDirectory, DrawingContext, MediaStream, MediaTrack, StreamHandle,
    StreamProvider, Viewport, FOCUS_MODE_CONSTRAINT,
};
use crate::types::{CameraFrame, CaptureDevice, MediaConstraints, Rect, SnapshotFormat};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct DirectoryState {
    devices: Vec<CaptureDevice>,
    supported: HashSet<String>,
    failure: Option<CameraError>,
    calls: usize,
}

/// Directory returning a fixed device list
#[derive(Debug, Clone)]
pub struct MockDeviceDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl MockDeviceDirectory {
    /// Directory that reports `devices` and supports focus modes
    pub fn new(devices: Vec<CaptureDevice>) -> Self {
        let supported = [FOCUS_MODE_CONSTRAINT, "aspectRatio", "deviceId", "facingMode"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            state: Arc::new(Mutex::new(DirectoryState {
                devices,
                supported,
                failure: None,
                calls: 0,
            })),
        }
    }

    pub fn set_devices(&self, devices: Vec<CaptureDevice>) {
        lock(&self.state).devices = devices;
    }

    pub fn set_supported_constraints(&self, names: &[&str]) {
        lock(&self.state).supported = names.iter().map(|s| s.to_string()).collect();
    }

    pub fn fail_with(&self, error: CameraError) {
        lock(&self.state).failure = Some(error);
    }

    pub fn enumerate_calls(&self) -> usize {
        lock(&self.state).calls
    }
}

impl DeviceDirectory for MockDeviceDirectory {
    async fn enumerate(&self) -> Result<Vec<CaptureDevice>, CameraError> {
        tokio::task::yield_now().await;
        let mut state = lock(&self.state);
        state.calls += 1;
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(state.devices.clone()),
        }
    }

    fn supported_constraints(&self) -> HashSet<String> {
        lock(&self.state).supported.clone()
    }
}

/// Track whose liveness can be observed after the controller stops it
#[derive(Debug)]
pub struct MockTrack {
    id: String,
    live: AtomicBool,
    stop_calls: AtomicUsize,
}

impl MockTrack {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            live: AtomicBool::new(true),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTrack for MockTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockStream {
    id: String,
    tracks: Vec<Arc<MockTrack>>,
    constraints: MediaConstraints,
}

impl MockStream {
    pub fn new(track_count: usize, constraints: MediaConstraints) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks: (0..track_count).map(|_| Arc::new(MockTrack::new())).collect(),
            constraints,
        }
    }

    pub fn mock_tracks(&self) -> &[Arc<MockTrack>] {
        &self.tracks
    }

    /// Constraints this stream was acquired with
    pub fn constraints(&self) -> &MediaConstraints {
        &self.constraints
    }

    pub fn is_stopped(&self) -> bool {
        self.tracks.iter().all(|t| !t.is_live())
    }
}

impl MediaStream for MockStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn MediaTrack>)
            .collect()
    }
}

#[derive(Debug)]
struct ProviderState {
    requests: Vec<MediaConstraints>,
    streams: Vec<Arc<MockStream>>,
    tracks_per_stream: usize,
    /// Acquisitions at or after this index fail
    fail_from: Option<(usize, CameraError)>,
}

/// Stream provider that hands out mock streams and records every request
#[derive(Debug, Clone)]
pub struct MockStreamProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockStreamProvider {
    pub fn new(tracks_per_stream: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState {
                requests: Vec::new(),
                streams: Vec::new(),
                tracks_per_stream,
                fail_from: None,
            })),
        }
    }

    /// Every acquisition fails with `error`
    pub fn fail_with(&self, error: CameraError) {
        self.fail_after(0, error);
    }

    /// The first `successes` acquisitions succeed, later ones fail
    pub fn fail_after(&self, successes: usize, error: CameraError) {
        lock(&self.state).fail_from = Some((successes, error));
    }

    pub fn recover(&self) {
        lock(&self.state).fail_from = None;
    }

    pub fn requests(&self) -> Vec<MediaConstraints> {
        lock(&self.state).requests.clone()
    }

    pub fn acquire_calls(&self) -> usize {
        lock(&self.state).requests.len()
    }

    /// Streams handed out so far, in acquisition order
    pub fn streams(&self) -> Vec<Arc<MockStream>> {
        lock(&self.state).streams.clone()
    }
}

impl Default for MockStreamProvider {
    fn default() -> Self {
        Self::new(1)
    }
}

impl StreamProvider for MockStreamProvider {
    async fn acquire(&self, constraints: &MediaConstraints) -> Result<StreamHandle, CameraError> {
        tokio::task::yield_now().await;
        let mut state = lock(&self.state);
        let attempt = state.requests.len();
        state.requests.push(constraints.clone());

        if let Some((from, error)) = &state.fail_from {
            if attempt >= *from {
                return Err(error.clone());
            }
        }

        let stream = Arc::new(MockStream::new(state.tracks_per_stream, constraints.clone()));
        state.streams.push(Arc::clone(&stream));
        Ok(stream as StreamHandle)
    }
}

/// Viewport that records what was done to it
#[derive(Debug, Clone)]
pub struct MockViewport {
    pub attached: Vec<String>,
    pub mirrored: bool,
    pub play_calls: usize,
    pub intrinsic_size: (u32, u32),
    pub displayed_width: f64,
    pub pixel_size: Option<(u32, u32)>,
    pub left_offset: Option<f64>,
    pub window_inner_width: Option<f64>,
    pub frame: Option<CameraFrame>,
}

impl MockViewport {
    pub fn new(intrinsic_width: u32, intrinsic_height: u32, displayed_width: f64) -> Self {
        Self {
            attached: Vec::new(),
            mirrored: false,
            play_calls: 0,
            intrinsic_size: (intrinsic_width, intrinsic_height),
            displayed_width,
            pixel_size: None,
            left_offset: None,
            window_inner_width: Some(1280.0),
            frame: None,
        }
    }
}

impl Default for MockViewport {
    fn default() -> Self {
        Self::new(1280, 720, 640.0)
    }
}

impl Viewport for MockViewport {
    fn attach(&mut self, stream: StreamHandle) {
        self.attached.push(stream.id().to_string());
    }

    fn play(&mut self) {
        self.play_calls += 1;
    }

    fn set_mirror(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    fn intrinsic_size(&self) -> (u32, u32) {
        self.intrinsic_size
    }

    fn displayed_width(&self) -> f64 {
        self.displayed_width
    }

    fn pixel_width(&self) -> Option<u32> {
        self.pixel_size.map(|(w, _)| w)
    }

    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.pixel_size = Some((width, height));
    }

    fn set_left_offset(&mut self, px: f64) {
        self.left_offset = Some(px);
    }

    fn window_inner_width(&self) -> Option<f64> {
        self.window_inner_width
    }

    fn current_frame(&self) -> Option<CameraFrame> {
        self.frame.clone()
    }
}

/// Operation recorded by [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    SetPixelSize(u32, u32),
    Translate(f64, f64),
    Scale(f64, f64),
    DrawImage { source: Rect, destination: Rect },
    Encode(SnapshotFormat),
}

/// Canvas that only records calls and returns a fixed data URI
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    ops: Arc<Mutex<Vec<CanvasOp>>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<CanvasOp> {
        lock(&self.ops).clone()
    }

    fn record(&self, op: CanvasOp) {
        lock(&self.ops).push(op);
    }
}

impl DrawingContext for RecordingCanvas {
    fn translate(&mut self, x: f64, y: f64) {
        self.record(CanvasOp::Translate(x, y));
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.record(CanvasOp::Scale(x, y));
    }

    fn draw_image(
        &mut self,
        _source: &dyn Viewport,
        source_rect: Rect,
        destination: Rect,
    ) -> Result<(), CameraError> {
        self.record(CanvasOp::DrawImage {
            source: source_rect,
            destination,
        });
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.record(CanvasOp::SetPixelSize(width, height));
    }

    fn context(&mut self) -> &mut dyn DrawingContext {
        self
    }

    fn encode(&self, format: SnapshotFormat) -> Result<String, CameraError> {
        self.record(CanvasOp::Encode(format));
        Ok(format!("data:{};base64,c25hcA==", format.mime_type()))
    }
}

/// Shutter sound that counts plays and can be told to fail
#[derive(Debug, Clone, Default)]
pub struct MockAudioCue {
    plays: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MockAudioCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let cue = Self::default();
        cue.failing.store(true, Ordering::SeqCst);
        cue
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl AudioCue for MockAudioCue {
    fn play(&self) -> Result<(), CameraError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CameraError::Configuration(
                "audio element cannot play".to_string(),
            ));
        }
        Ok(())
    }
}
