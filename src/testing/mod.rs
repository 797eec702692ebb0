//! Testing utilities for camswitch
//!
//! In-memory host collaborators and synthetic data, so the controller can
//! be exercised without camera hardware or a browser.

pub mod mocks;
pub mod synthetic_data;

pub use mocks::{
    CanvasOp, MockAudioCue, MockDeviceDirectory, MockStream, MockStreamProvider, MockTrack,
    MockViewport, RecordingCanvas,
};
pub use synthetic_data::{
    laptop_devices, phone_devices, redacted_phone_devices, synthetic_video_frame,
};
