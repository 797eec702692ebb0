//! Synthetic frames and device inventories for offline testing

use crate::types::{CameraFrame, CaptureDevice, DeviceKind};

/// Create a synthetic RGB frame whose content varies with `frame_number`
pub fn synthetic_video_frame(frame_number: u64, width: u32, height: u32) -> CameraFrame {
    let mut data = vec![0u8; (width * height * 3) as usize];

    let base = (frame_number % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }

    CameraFrame::new(data, width, height, "synthetic".to_string())
}

/// Typical phone inventory: front and rear camera plus a microphone
pub fn phone_devices() -> Vec<CaptureDevice> {
    vec![
        CaptureDevice::new("mic-0", "g-0", DeviceKind::AudioInput, "Built-in Microphone"),
        CaptureDevice::new("cam-front", "g-1", DeviceKind::VideoInput, "Front Camera"),
        CaptureDevice::new("cam-back", "g-2", DeviceKind::VideoInput, "Back Camera"),
    ]
}

/// Same inventory before permission is granted: labels redacted
pub fn redacted_phone_devices() -> Vec<CaptureDevice> {
    phone_devices()
        .into_iter()
        .map(|mut d| {
            d.label.clear();
            d
        })
        .collect()
}

/// Laptop with a single built-in camera
pub fn laptop_devices() -> Vec<CaptureDevice> {
    vec![
        CaptureDevice::new("cam-0", "g-0", DeviceKind::VideoInput, "Integrated Webcam"),
        CaptureDevice::new("spk-0", "g-1", DeviceKind::AudioOutput, "Speakers"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_video_frame_correct_size() {
        let frame = synthetic_video_frame(0, 640, 360);
        assert_eq!(frame.width, 640);
        assert_eq!(frame.height, 360);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_synthetic_video_frames_differ() {
        let frame0 = synthetic_video_frame(0, 32, 24);
        let frame1 = synthetic_video_frame(1, 32, 24);
        assert_ne!(frame0.data[0], frame1.data[0]);
    }

    #[test]
    fn test_redacted_devices_keep_ids() {
        let devices = redacted_phone_devices();
        assert!(devices.iter().all(|d| d.label.is_empty()));
        assert_eq!(devices[1].id, "cam-front");
    }
}
