use super::CameraController;
use crate::errors::CameraError;
use crate::platform::{DeviceDirectory, StreamProvider, Viewport};
use crate::types::{CaptureDevice, DeviceSelector, FacingMode, MediaConstraints, VideoConstraints};

impl<D, S, V> CameraController<D, S, V>
where
    D: DeviceDirectory,
    S: StreamProvider,
    V: Viewport + 'static,
{
    /// Every video input the host currently reports
    pub async fn get_info_video_inputs(&self) -> Result<Vec<CaptureDevice>, CameraError> {
        let devices = self.directory.enumerate().await.map_err(|e| {
            log::error!("Failed to enumerate media devices: {}", e);
            e
        })?;

        Ok(devices.into_iter().filter(|d| d.is_video_input()).collect())
    }

    /// Replace the held device list with the video inputs in `all_devices`.
    ///
    /// A host with a single camera has no meaningful front/rear split, so the
    /// facing mode is forced to front in that case.
    pub fn update_device_list(&mut self, all_devices: &[CaptureDevice]) -> &[CaptureDevice] {
        self.webcam_list = all_devices
            .iter()
            .filter(|d| d.is_video_input())
            .cloned()
            .collect();

        if self.webcam_list.len() == 1 {
            self.facing_mode = FacingMode::Front;
        }

        log::debug!("Device list updated: {} video input(s)", self.webcam_list.len());
        &self.webcam_list
    }

    /// Constraint descriptor for the current state: an exact device when one
    /// is selected, the facing mode otherwise. Audio is never requested.
    pub fn build_constraints(&self) -> MediaConstraints {
        let device = if self.selected_device_id.is_empty() {
            DeviceSelector::FacingMode(self.facing_mode)
        } else {
            DeviceSelector::Exact(self.selected_device_id.clone())
        };

        MediaConstraints {
            video: VideoConstraints {
                device,
                aspect_ratio: self.config.capture_ratio,
                advanced: Vec::new(),
            },
            audio: false,
        }
    }

    /// Resolve the selected device id.
    ///
    /// A remembered id wins verbatim, even when no listed device carries it.
    /// Otherwise the first device whose label mentions the facing direction
    /// is taken. Labels are vendor free text, so no match is normal and
    /// leaves the selection as it was.
    pub fn select_camera(&mut self) {
        let remembered = self
            .preferences
            .get(&self.config.preference_key)
            .filter(|id| !id.is_empty());
        if let Some(id) = remembered {
            log::debug!("Using remembered camera {:?}", id);
            self.selected_device_id = id;
            return;
        }

        self.select_by_label();
    }

    /// Take the first device whose label mentions the facing direction
    pub(crate) fn select_by_label(&mut self) {
        let facing_mode = self.facing_mode;
        match self
            .webcam_list
            .iter()
            .find(|d| d.label_suggests(facing_mode))
        {
            Some(device) => {
                log::debug!("Label {:?} matches {}", device.label, facing_mode);
                self.selected_device_id = device.id.clone();
            }
            None => log::debug!("No device label matches {}", facing_mode),
        }
    }

    /// Best-effort write of the selected device id to the preference store
    pub(crate) fn persist_selection(&self) {
        if self.selected_device_id.is_empty() {
            return;
        }
        match self
            .preferences
            .set(&self.config.preference_key, &self.selected_device_id)
        {
            Ok(()) => log::info!("Remembered camera {:?}", self.selected_device_id),
            Err(e) => log::warn!("Failed to remember camera choice: {}", e),
        }
    }
}
