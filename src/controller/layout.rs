use super::lock_viewport;
use crate::errors::CameraError;
use crate::platform::Viewport;
use std::sync::Mutex;

/// Pixel size and horizontal placement of the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    pub width: u32,
    pub height: u32,
    pub left: Option<f64>,
}

impl ViewportLayout {
    /// Size the viewport to `ratio` and centre it in the window.
    ///
    /// `left` is `None` when the host has no usable window width.
    pub fn compute(
        current_width: Option<u32>,
        default_width: u32,
        ratio: f64,
        window_inner_width: Option<f64>,
    ) -> Result<Self, CameraError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(CameraError::Layout(format!("invalid capture ratio {}", ratio)));
        }

        let width = current_width.filter(|w| *w > 0).unwrap_or(default_width);
        let height = (width as f64 / ratio) as u32;
        let left = window_inner_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .map(|w| (w - width as f64) / 2.0);

        Ok(Self {
            width,
            height,
            left,
        })
    }
}

/// Post-attach layout fix-up. Cosmetic only: failures are logged.
pub(crate) fn set_position<V: Viewport>(viewport: &Mutex<V>, default_width: u32, ratio: f64) {
    let mut viewport = lock_viewport(viewport);
    let layout = match ViewportLayout::compute(
        viewport.pixel_width(),
        default_width,
        ratio,
        viewport.window_inner_width(),
    ) {
        Ok(layout) => layout,
        Err(e) => {
            log::warn!("Skipping viewport layout: {}", e);
            return;
        }
    };

    viewport.set_pixel_size(layout.width, layout.height);
    match layout.left {
        Some(left) => viewport.set_left_offset(left),
        None => log::warn!("Window width unavailable, viewport left uncentred"),
    }
    log::debug!("Viewport laid out at {}x{}", layout.width, layout.height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockViewport;

    #[test]
    fn test_default_width_when_unset() {
        let layout = ViewportLayout::compute(None, 640, 16.0 / 9.0, Some(1280.0)).unwrap();
        assert_eq!((layout.width, layout.height), (640, 360));
        assert_eq!(layout.left, Some(320.0));
    }

    #[test]
    fn test_keeps_explicit_width() {
        let layout = ViewportLayout::compute(Some(800), 640, 4.0 / 3.0, Some(800.0)).unwrap();
        assert_eq!((layout.width, layout.height), (800, 600));
        assert_eq!(layout.left, Some(0.0));
    }

    #[test]
    fn test_missing_window_is_not_fatal() {
        let mut viewport = MockViewport::default();
        viewport.window_inner_width = None;
        let viewport = Mutex::new(viewport);

        set_position(&viewport, 640, 16.0 / 9.0);

        let viewport = viewport.into_inner().unwrap();
        assert_eq!(viewport.pixel_size, Some((640, 360)));
        assert_eq!(viewport.left_offset, None);
    }

    #[test]
    fn test_bad_ratio_leaves_viewport_untouched() {
        let viewport = Mutex::new(MockViewport::default());
        set_position(&viewport, 640, 0.0);
        assert_eq!(viewport.into_inner().unwrap().pixel_size, None);
    }
}
