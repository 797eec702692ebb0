use super::{lock_viewport, CameraController};
use crate::errors::CameraError;
use crate::platform::{DeviceDirectory, StreamProvider, Viewport};
use crate::types::Rect;

/// Largest side, in pixels, of a snapshot surface
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

/// Placement of a still frame on the drawing surface.
///
/// The surface takes the viewport's displayed width and a height derived
/// from the frame's own aspect ratio, so a letterboxed viewport still yields
/// an image with the source proportions. The frame is scaled to fit the
/// width and centred vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotGeometry {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub source: Rect,
    pub destination: Rect,
}

impl SnapshotGeometry {
    pub fn compute(
        intrinsic_width: u32,
        intrinsic_height: u32,
        displayed_width: f64,
    ) -> Result<Self, CameraError> {
        if intrinsic_width == 0 || intrinsic_height == 0 {
            return Err(CameraError::Layout(
                "viewport has not received a video frame".to_string(),
            ));
        }
        if !displayed_width.is_finite() || displayed_width < 0.0 {
            return Err(CameraError::Layout(format!(
                "invalid displayed width {}",
                displayed_width
            )));
        }

        if displayed_width >= MAX_CANVAS_DIMENSION as f64 + 1.0 {
            return Err(CameraError::Layout(format!(
                "displayed width {} exceeds {} px",
                displayed_width, MAX_CANVAS_DIMENSION
            )));
        }

        let iw = intrinsic_width as f64;
        let ih = intrinsic_height as f64;
        let ratio = iw / ih;

        // pixel dimensions truncate, as host canvases do
        let canvas_width = displayed_width as u32;
        let canvas_height = (canvas_width as f64 / ratio) as u32;
        if canvas_height > MAX_CANVAS_DIMENSION {
            return Err(CameraError::Layout(format!(
                "snapshot height {} exceeds {} px",
                canvas_height, MAX_CANVAS_DIMENSION
            )));
        }

        let scale = canvas_width as f64 / iw;
        let scaled_height = ih * scale;
        let offset = (canvas_height as f64 - scaled_height) / 2.0;

        Ok(Self {
            canvas_width,
            canvas_height,
            source: Rect::new(0.0, 0.0, iw, ih),
            destination: Rect::new(0.0, offset, canvas_width as f64, scaled_height),
        })
    }
}

impl<D, S, V> CameraController<D, S, V>
where
    D: DeviceDirectory,
    S: StreamProvider,
    V: Viewport + 'static,
{
    /// Capture the current viewport frame as a `data:` URI.
    ///
    /// Front-facing captures are mirrored to match the live preview.
    pub fn snap(&mut self) -> Result<String, CameraError> {
        let canvas = self.canvas.as_mut().ok_or_else(CameraError::missing_canvas)?;

        if let Some(cue) = &self.audio_cue {
            if let Err(e) = cue.play() {
                log::warn!("Shutter sound failed: {}", e);
            }
        }

        let viewport = lock_viewport(&self.viewport);
        let (intrinsic_width, intrinsic_height) = viewport.intrinsic_size();
        let geometry = SnapshotGeometry::compute(
            intrinsic_width,
            intrinsic_height,
            viewport.displayed_width(),
        )?;

        canvas.set_pixel_size(geometry.canvas_width, geometry.canvas_height);
        let context = canvas.context();
        if self.facing_mode.is_mirrored() {
            context.translate(geometry.canvas_width as f64, 0.0);
            context.scale(-1.0, 1.0);
        }
        context.draw_image(&*viewport, geometry.source, geometry.destination)?;

        let image = canvas.encode(self.config.snapshot_format)?;
        log::info!(
            "Captured {}x{} snapshot",
            geometry.canvas_width,
            geometry.canvas_height
        );
        Ok(image)
    }
}
