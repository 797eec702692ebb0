//! Software drawing surface backed by the `image` crate

use super::{Canvas, DrawingContext, Viewport};
use crate::errors::CameraError;
use crate::types::{Rect, SnapshotFormat};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Axis-aligned affine transform: `device = user * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform {
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Transform {
    fn to_user(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.offset_x) / self.scale_x,
            (y - self.offset_y) / self.scale_y,
        )
    }
}

/// In-memory canvas that samples viewport frames with nearest-neighbour
/// scaling and encodes to PNG or JPEG data URIs.
#[derive(Debug, Clone)]
pub struct ImageCanvas {
    buffer: RgbaImage,
    transform: Transform,
}

impl Default for ImageCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCanvas {
    pub fn new() -> Self {
        Self {
            buffer: RgbaImage::new(0, 0),
            transform: Transform::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.buffer.get_pixel_checked(x, y).map(|p| p.0)
    }
}

impl DrawingContext for ImageCanvas {
    fn translate(&mut self, x: f64, y: f64) {
        self.transform.offset_x += self.transform.scale_x * x;
        self.transform.offset_y += self.transform.scale_y * y;
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.transform.scale_x *= x;
        self.transform.scale_y *= y;
    }

    fn draw_image(
        &mut self,
        source: &dyn Viewport,
        source_rect: Rect,
        destination: Rect,
    ) -> Result<(), CameraError> {
        let frame = source.current_frame().ok_or_else(|| {
            CameraError::Configuration("viewport has no frame to draw".to_string())
        })?;
        if !frame.is_valid() {
            return Err(CameraError::Encoding(format!(
                "frame buffer does not match {}x{} RGB",
                frame.width, frame.height
            )));
        }
        if destination.width <= 0.0 || destination.height <= 0.0 {
            return Ok(());
        }

        let transform = self.transform;
        for (x, y, pixel) in self.buffer.enumerate_pixels_mut() {
            let (ux, uy) = transform.to_user(x as f64 + 0.5, y as f64 + 0.5);
            let rel_x = (ux - destination.x) / destination.width;
            let rel_y = (uy - destination.y) / destination.height;
            if !(0.0..1.0).contains(&rel_x) || !(0.0..1.0).contains(&rel_y) {
                continue;
            }

            let sx = (source_rect.x + rel_x * source_rect.width).floor();
            let sy = (source_rect.y + rel_y * source_rect.height).floor();
            if sx < 0.0 || sy < 0.0 || sx >= frame.width as f64 || sy >= frame.height as f64 {
                continue;
            }

            let idx = ((sy as usize) * frame.width as usize + sx as usize) * 3;
            *pixel = Rgba([frame.data[idx], frame.data[idx + 1], frame.data[idx + 2], 255]);
        }

        Ok(())
    }
}

impl Canvas for ImageCanvas {
    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.buffer = RgbaImage::new(width, height);
        self.transform = Transform::default();
    }

    fn context(&mut self) -> &mut dyn DrawingContext {
        self
    }

    fn encode(&self, format: SnapshotFormat) -> Result<String, CameraError> {
        // Hosts return this for zero-area canvases
        if self.buffer.width() == 0 || self.buffer.height() == 0 {
            return Ok("data:,".to_string());
        }

        let image = DynamicImage::ImageRgba8(self.buffer.clone());
        let mut bytes = Cursor::new(Vec::new());
        match format {
            SnapshotFormat::Png => image.write_to(&mut bytes, ImageFormat::Png),
            SnapshotFormat::Jpeg => {
                DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut bytes, ImageFormat::Jpeg)
            }
        }
        .map_err(|e| CameraError::Encoding(format!("Failed to encode snapshot: {}", e)))?;

        Ok(format!(
            "data:{};base64,{}",
            format.mime_type(),
            STANDARD.encode(bytes.into_inner())
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{synthetic_video_frame, MockViewport};

    fn striped_viewport() -> MockViewport {
        // left half red, right half blue
        let mut data = Vec::new();
        for _y in 0..2 {
            for x in 0..4 {
                if x < 2 {
                    data.extend_from_slice(&[255, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 0, 255]);
                }
            }
        }
        let mut viewport = MockViewport::new(4, 2, 4.0);
        viewport.frame = Some(crate::types::CameraFrame::new(data, 4, 2, "cam".to_string()));
        viewport
    }

    #[test]
    fn test_draw_scales_to_destination() {
        let viewport = striped_viewport();
        let mut canvas = ImageCanvas::new();
        canvas.set_pixel_size(8, 4);
        canvas
            .context()
            .draw_image(&viewport, Rect::new(0.0, 0.0, 4.0, 2.0), Rect::new(0.0, 0.0, 8.0, 4.0))
            .unwrap();

        assert_eq!(canvas.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(7, 3), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_horizontal_flip_mirrors_output() {
        let viewport = striped_viewport();
        let mut canvas = ImageCanvas::new();
        canvas.set_pixel_size(4, 2);
        let ctx = canvas.context();
        ctx.translate(4.0, 0.0);
        ctx.scale(-1.0, 1.0);
        ctx.draw_image(&viewport, Rect::new(0.0, 0.0, 4.0, 2.0), Rect::new(0.0, 0.0, 4.0, 2.0))
            .unwrap();

        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(3, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_vertical_offset_leaves_bars_transparent() {
        let viewport = striped_viewport();
        let mut canvas = ImageCanvas::new();
        canvas.set_pixel_size(4, 4);
        canvas
            .context()
            .draw_image(&viewport, Rect::new(0.0, 0.0, 4.0, 2.0), Rect::new(0.0, 1.0, 4.0, 2.0))
            .unwrap();

        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(0, 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(0, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_resize_resets_transform() {
        let mut canvas = ImageCanvas::new();
        canvas.set_pixel_size(2, 2);
        canvas.context().scale(-1.0, 1.0);
        canvas.set_pixel_size(2, 2);
        assert_eq!(canvas.transform, Transform::default());
    }

    #[test]
    fn test_encode_png_and_jpeg_data_uris() {
        let mut viewport = MockViewport::new(16, 9, 16.0);
        viewport.frame = Some(synthetic_video_frame(1, 16, 9));
        let mut canvas = ImageCanvas::new();
        canvas.set_pixel_size(16, 9);
        canvas
            .context()
            .draw_image(&viewport, Rect::new(0.0, 0.0, 16.0, 9.0), Rect::new(0.0, 0.0, 16.0, 9.0))
            .unwrap();

        let png = canvas.encode(SnapshotFormat::Png).unwrap();
        assert!(png.starts_with("data:image/png;base64,"));
        let jpeg = canvas.encode(SnapshotFormat::Jpeg).unwrap();
        assert!(jpeg.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_empty_canvas_encodes_placeholder() {
        let canvas = ImageCanvas::new();
        assert_eq!(canvas.encode(SnapshotFormat::Png).unwrap(), "data:,");
    }

    #[test]
    fn test_draw_without_frame_fails() {
        let viewport = MockViewport::new(4, 2, 4.0);
        let mut canvas = ImageCanvas::new();
        canvas.set_pixel_size(4, 2);
        let result = canvas.context().draw_image(
            &viewport,
            Rect::new(0.0, 0.0, 4.0, 2.0),
            Rect::new(0.0, 0.0, 4.0, 2.0),
        );
        assert!(matches!(result, Err(CameraError::Configuration(_))));
    }
}
