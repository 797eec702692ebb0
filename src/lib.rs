//! camswitch: camera selection and stream lifecycle for media-capture hosts
//!
//! This crate sits between an application and a host's camera API (a
//! browser's media devices, a webview bridge, a native capture service).
//! It tracks the available cameras, decides which one to open, builds the
//! acquisition constraints, runs the start/stop/flip lifecycle and turns the
//! live frame into an encoded still image.
//!
//! # Features
//! - Facing-mode aware device selection with a remembered choice
//! - Two-phase start: permission negotiation, then attach
//! - Orderly teardown of every acquired track
//! - Mirror-aware, letterbox-aware still capture
//! - Pluggable host collaborators with in-memory test doubles
//!
//! # Usage
//! ```rust,ignore
//! use camswitch::{CameraController, ControllerConfig, StartOutcome};
//!
//! let mut camera = CameraController::new(directory, provider, viewport, ControllerConfig::default())?
//!     .with_canvas(camswitch::platform::ImageCanvas::new());
//!
//! if let StartOutcome::Streaming(facing) = camera.start(true).await? {
//!     println!("streaming from the {} camera", facing);
//! }
//! let picture = camera.snap()?;
//! camera.stop();
//! ```
pub mod config;
pub mod controller;
pub mod errors;
pub mod permissions;
pub mod platform;
pub mod types;

// Testing utilities - in-memory host collaborators for offline testing
pub mod testing;

// Re-exports for convenience
pub use config::ControllerConfig;
pub use controller::{
    CameraController, SnapshotGeometry, StartOutcome, ViewportLayout, MAX_CANVAS_DIMENSION,
};
pub use errors::{CameraError, MediaAccessKind};
pub use permissions::PermissionStatus;
pub use platform::{
    AudioCue, Canvas, DeviceDirectory, DrawingContext, MediaStream, MediaTrack, PreferenceStore,
    StreamHandle, StreamProvider, Viewport,
};
pub use types::{CaptureDevice, DeviceKind, FacingMode, MediaConstraints, SnapshotFormat, Status};

/// Initialize logging for the camera controller
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "camswitch=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
