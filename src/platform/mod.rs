//! Host collaborator interfaces
//!
//! The controller never talks to camera hardware directly. Everything it
//! needs from the host (device listing, stream acquisition, the display
//! surface, the drawing surface, persistence and an optional shutter sound)
//! comes through the traits in this module.

pub mod canvas;
pub mod storage;

pub use canvas::ImageCanvas;
pub use storage::{FilePreferenceStore, MemoryPreferenceStore};

use crate::errors::CameraError;
use crate::types::{CameraFrame, CaptureDevice, MediaConstraints, Rect, SnapshotFormat};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

/// Constraint name a host reports when it understands focus modes
pub const FOCUS_MODE_CONSTRAINT: &str = "focusMode";

/// One media channel inside a stream
pub trait MediaTrack: Send + Sync {
    fn id(&self) -> &str;
    /// Release the underlying hardware. Stopping twice is a no-op.
    fn stop(&self);
    fn is_live(&self) -> bool;
}

/// Live stream handed out by a [`StreamProvider`]
pub trait MediaStream: Send + Sync {
    fn id(&self) -> &str;
    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>>;
}

pub type StreamHandle = Arc<dyn MediaStream>;

/// Lists the host's media devices
pub trait DeviceDirectory: Send + Sync {
    /// Every media device the host reports, in host order.
    /// Labels may be empty until a stream has been granted.
    fn enumerate(
        &self,
    ) -> impl Future<Output = Result<Vec<CaptureDevice>, CameraError>> + Send;

    /// Names of the constraints the host understands
    fn supported_constraints(&self) -> HashSet<String>;
}

/// Acquires live streams.
///
/// Acquisition may block on a user-facing permission prompt and has no
/// timeout; callers that need one should race the controller operation
/// against `tokio::time::timeout`.
pub trait StreamProvider: Send + Sync {
    fn acquire(
        &self,
        constraints: &MediaConstraints,
    ) -> impl Future<Output = Result<StreamHandle, CameraError>> + Send;
}

/// Surface that renders the live stream
pub trait Viewport: Send {
    /// Replace the rendered source. Safe to call after a previous stop.
    fn attach(&mut self, stream: StreamHandle);
    fn play(&mut self);
    fn set_mirror(&mut self, mirrored: bool);
    /// Native size of the current video frame, `(0, 0)` before the first frame
    fn intrinsic_size(&self) -> (u32, u32);
    /// Width the surface currently occupies on screen
    fn displayed_width(&self) -> f64;
    /// Explicit pixel width, if one has been set
    fn pixel_width(&self) -> Option<u32>;
    fn set_pixel_size(&mut self, width: u32, height: u32);
    fn set_left_offset(&mut self, px: f64);
    /// Inner width of the hosting window, if the host has one
    fn window_inner_width(&self) -> Option<f64>;

    /// Pixels of the frame currently shown, for software drawing surfaces
    fn current_frame(&self) -> Option<CameraFrame> {
        None
    }
}

/// 2D context of a drawing surface
pub trait DrawingContext {
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, x: f64, y: f64);
    /// Draw the `source` rectangle of the viewport's frame into `destination`
    fn draw_image(
        &mut self,
        source: &dyn Viewport,
        source_rect: Rect,
        destination: Rect,
    ) -> Result<(), CameraError>;
}

/// Surface used to rasterize a still frame
pub trait Canvas: Send + Sync {
    /// Resize the surface; this also resets the context transform.
    fn set_pixel_size(&mut self, width: u32, height: u32);
    fn context(&mut self) -> &mut dyn DrawingContext;
    /// Encode the surface as a `data:` URI
    fn encode(&self, format: SnapshotFormat) -> Result<String, CameraError>;
}

/// Small key/value store that outlives the controller
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CameraError>;
    fn remove(&self, key: &str) -> Result<(), CameraError>;
}

/// Shutter sound played on capture
pub trait AudioCue: Send + Sync {
    fn play(&self) -> Result<(), CameraError>;
}
