//! Camera selection and stream lifecycle
//!
//! [`CameraController`] owns the facing-mode preference, the device
//! inventory, the selected device id and every stream it has acquired.
//! Starting a camera is a two-phase protocol:
//!
//! 1. [`negotiate`](CameraController::negotiate) tears down any previous
//!    streams, acquires a first stream to obtain permission (many hosts
//!    redact device labels until then), refreshes the device list and picks
//!    a device.
//! 2. [`attach`](CameraController::attach) acquires a second stream with
//!    the refreshed constraints, renders it into the viewport, persists the
//!    choice and schedules the layout fix-up.
//!
//! [`start`](CameraController::start) runs both phases. None of the host
//! calls can be cancelled or time out; wrap the future in
//! `tokio::time::timeout` if a hung permission prompt must be bounded.

mod layout;
mod selection;
mod snapshot;

pub use layout::ViewportLayout;
pub use snapshot::{SnapshotGeometry, MAX_CANVAS_DIMENSION};

use crate::config::ControllerConfig;
use crate::errors::CameraError;
use crate::permissions::PermissionStatus;
use crate::platform::{
    AudioCue, Canvas, DeviceDirectory, MemoryPreferenceStore, PreferenceStore, StreamHandle,
    StreamProvider, Viewport, FOCUS_MODE_CONSTRAINT,
};
use crate::types::{
    AdvancedConstraint, CaptureDevice, FacingMode, FocusMode, MediaConstraints, Status,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// What a successful `start` resolved with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A stream is attached and playing
    Streaming(FacingMode),
    /// Permission obtained and a device chosen, nothing attached
    Negotiated(String),
}

pub struct CameraController<D, S, V> {
    directory: D,
    provider: S,
    viewport: Arc<Mutex<V>>,
    canvas: Option<Box<dyn Canvas>>,
    audio_cue: Option<Box<dyn AudioCue>>,
    preferences: Arc<dyn PreferenceStore>,
    config: ControllerConfig,
    facing_mode: FacingMode,
    webcam_list: Vec<CaptureDevice>,
    selected_device_id: String,
    streams: Vec<StreamHandle>,
    status: Status,
    permission: PermissionStatus,
    layout_task: Option<JoinHandle<()>>,
}

pub(crate) fn lock_viewport<V>(viewport: &Mutex<V>) -> MutexGuard<'_, V> {
    viewport.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<D, S, V> CameraController<D, S, V>
where
    D: DeviceDirectory,
    S: StreamProvider,
    V: Viewport + 'static,
{
    /// Create a controller rendering into `viewport`.
    ///
    /// The preference store defaults to an in-memory one; use
    /// [`with_preferences`](Self::with_preferences) to persist across runs.
    pub fn new(
        directory: D,
        provider: S,
        viewport: V,
        config: ControllerConfig,
    ) -> Result<Self, CameraError> {
        config.validate().map_err(CameraError::Configuration)?;

        Ok(Self {
            directory,
            provider,
            viewport: Arc::new(Mutex::new(viewport)),
            canvas: None,
            audio_cue: None,
            preferences: Arc::new(MemoryPreferenceStore::new()),
            facing_mode: config.facing_mode,
            config,
            webcam_list: Vec::new(),
            selected_device_id: String::new(),
            streams: Vec::new(),
            status: Status::Off,
            permission: PermissionStatus::NotDetermined,
            layout_task: None,
        })
    }

    pub fn with_canvas(mut self, canvas: impl Canvas + 'static) -> Self {
        self.canvas = Some(Box::new(canvas));
        self
    }

    pub fn with_audio_cue(mut self, cue: impl AudioCue + 'static) -> Self {
        self.audio_cue = Some(Box::new(cue));
        self
    }

    pub fn with_preferences(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = store;
        self
    }

    /// Negotiate and, when `start_stream` is set, attach.
    ///
    /// With `start_stream == false` this resolves with the selected device
    /// id (possibly empty) and leaves the viewport untouched.
    pub async fn start(&mut self, start_stream: bool) -> Result<StartOutcome, CameraError> {
        let selected = self.negotiate().await?;
        if !start_stream {
            log::info!("Camera negotiated without streaming: {:?}", selected);
            return Ok(StartOutcome::Negotiated(selected));
        }

        let facing_mode = self.attach().await?;
        Ok(StartOutcome::Streaming(facing_mode))
    }

    /// First phase of `start`: stop, acquire for permission, refresh devices,
    /// select. Resolves with the selected device id.
    pub async fn negotiate(&mut self) -> Result<String, CameraError> {
        self.stop();

        let constraints = self.acquisition_constraints();
        log::debug!("Requesting camera permission with {:?}", constraints);
        let stream = self.acquire(&constraints).await?;
        self.streams.push(stream);

        let devices = self.get_info_video_inputs().await?;
        self.update_device_list(&devices);
        self.select_camera();

        Ok(self.selected_device_id.clone())
    }

    /// Second phase of `start`: stream into the viewport, persist the choice
    /// and schedule the layout fix-up.
    pub async fn attach(&mut self) -> Result<FacingMode, CameraError> {
        let facing_mode = self.stream().await?;
        self.status = Status::On;
        if self.config.remember_choice {
            self.persist_selection();
        }
        self.schedule_layout();

        log::info!(
            "Camera started: facing={}, device={:?}",
            facing_mode,
            self.selected_device_id
        );
        Ok(facing_mode)
    }

    /// Acquire a stream with the current constraints and render it.
    pub async fn stream(&mut self) -> Result<FacingMode, CameraError> {
        let constraints = self.acquisition_constraints();
        let stream = self.acquire(&constraints).await?;
        self.streams.push(Arc::clone(&stream));

        {
            let mut viewport = lock_viewport(&self.viewport);
            viewport.attach(stream);
            viewport.set_mirror(self.facing_mode.is_mirrored());
            viewport.play();
        }

        self.status = Status::On;
        log::debug!("Stream attached ({} retained)", self.streams.len());
        Ok(self.facing_mode)
    }

    /// Stop every track of every retained stream and forget the streams.
    /// Also cancels a pending layout fix-up.
    pub fn stop(&mut self) {
        if let Some(task) = self.layout_task.take() {
            task.abort();
        }

        let count = self.streams.len();
        for stream in self.streams.drain(..) {
            for track in stream.tracks() {
                track.stop();
            }
        }
        self.status = Status::Off;

        if count > 0 {
            log::info!("Stopped {} stream(s)", count);
        }
    }

    /// Switch between front and rear.
    ///
    /// The previous explicit choice is dropped so the label heuristic can
    /// pick a device for the new facing mode; without a match the
    /// constraints fall back to the facing mode. The stored choice is only
    /// removed when remember-choice is on. Streaming is not restarted.
    pub fn flip(&mut self) {
        self.facing_mode = self.facing_mode.toggled();
        lock_viewport(&self.viewport).set_mirror(false);
        if self.config.remember_choice {
            self.clear_selected_device_id();
        } else {
            self.selected_device_id.clear();
        }
        self.select_by_label();
        log::info!("Flipped camera to {}", self.facing_mode);
    }

    /// Wait for the scheduled layout fix-up, if any
    pub async fn settle_layout(&mut self) {
        if let Some(task) = self.layout_task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::warn!("Layout fix-up task failed: {}", e);
                }
            }
        }
    }

    /// Build the constraints for an acquisition, adding continuous focus
    /// when requested and supported by the host.
    pub fn acquisition_constraints(&self) -> MediaConstraints {
        let mut constraints = self.build_constraints();
        if self.config.autofocus
            && self
                .directory
                .supported_constraints()
                .contains(FOCUS_MODE_CONSTRAINT)
        {
            constraints
                .video
                .advanced
                .push(AdvancedConstraint::FocusMode(FocusMode::Continuous));
        }
        constraints
    }

    async fn acquire(
        &mut self,
        constraints: &MediaConstraints,
    ) -> Result<StreamHandle, CameraError> {
        let outcome = self.provider.acquire(constraints).await;
        self.permission = self.permission.after_acquisition(&outcome);
        if let Err(e) = &outcome {
            log::error!("Failed to acquire camera stream: {}", e);
        }
        outcome
    }

    fn schedule_layout(&mut self) {
        let viewport = Arc::clone(&self.viewport);
        let default_width = self.config.default_width;
        let ratio = self.config.capture_ratio;
        let delay = Duration::from_millis(self.config.layout_delay_ms);

        if let Some(previous) = self.layout_task.take() {
            previous.abort();
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.layout_task = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    layout::set_position(&viewport, default_width, ratio);
                }));
            }
            Err(_) => {
                log::debug!("No runtime for deferred layout, applying immediately");
                layout::set_position(&viewport, default_width, ratio);
            }
        }
    }

    /// Apply the layout fix-up now
    pub fn set_position(&self) {
        layout::set_position(
            &self.viewport,
            self.config.default_width,
            self.config.capture_ratio,
        );
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.facing_mode
    }

    pub fn set_facing_mode(&mut self, facing_mode: FacingMode) {
        self.facing_mode = facing_mode;
    }

    pub fn selected_device_id(&self) -> &str {
        &self.selected_device_id
    }

    /// Select a device explicitly; persisted when remember-choice is on.
    /// An empty id falls back to facing-mode constraints.
    pub fn set_selected_device_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id.is_empty() && self.config.remember_choice {
            self.clear_selected_device_id();
            return;
        }

        self.selected_device_id = id;
        if self.config.remember_choice {
            self.persist_selection();
        }
    }

    /// Drop the explicit device choice, in memory and in the store
    pub fn clear_selected_device_id(&mut self) {
        self.selected_device_id.clear();
        if let Err(e) = self.preferences.remove(&self.config.preference_key) {
            log::warn!("Failed to clear remembered camera: {}", e);
        }
    }

    pub fn webcam_list(&self) -> &[CaptureDevice] {
        &self.webcam_list
    }

    pub fn webcam_count(&self) -> usize {
        self.webcam_list.len()
    }

    pub fn stream_list(&self) -> &[StreamHandle] {
        &self.streams
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    pub fn capture_ratio(&self) -> f64 {
        self.config.capture_ratio
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Shared handle to the display surface
    pub fn viewport(&self) -> Arc<Mutex<V>> {
        Arc::clone(&self.viewport)
    }
}

impl<D, S, V> Drop for CameraController<D, S, V> {
    fn drop(&mut self) {
        if let Some(task) = self.layout_task.take() {
            task.abort();
        }
    }
}
