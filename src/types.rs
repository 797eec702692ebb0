use serde::{Deserialize, Serialize};

/// Which way the active camera points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FacingMode {
    /// Faces the user ("selfie" camera)
    #[default]
    #[serde(rename = "user")]
    Front,
    /// Faces away from the user
    #[serde(rename = "environment")]
    Rear,
}

impl FacingMode {
    /// Host constraint value for this facing mode
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Front => "user",
            FacingMode::Rear => "environment",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Rear,
            FacingMode::Rear => FacingMode::Front,
        }
    }

    /// Label fragment the selection heuristic looks for
    pub fn label_hint(&self) -> &'static str {
        match self {
            FacingMode::Front => "front",
            FacingMode::Rear => "back",
        }
    }

    pub fn is_mirrored(&self) -> bool {
        matches!(self, FacingMode::Front)
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "front" => Ok(FacingMode::Front),
            "environment" | "rear" | "back" => Ok(FacingMode::Rear),
            other => Err(format!("unknown facing mode: {}", other)),
        }
    }
}

/// Media device kind as reported by the host directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    #[serde(rename = "videoinput")]
    VideoInput,
    #[serde(rename = "audioinput")]
    AudioInput,
    #[serde(rename = "audiooutput")]
    AudioOutput,
}

/// Snapshot of one device entry from the host directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDevice {
    pub id: String,
    pub group_id: String,
    pub kind: DeviceKind,
    pub label: String,
}

impl CaptureDevice {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        kind: DeviceKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            kind,
            label: label.into(),
        }
    }

    /// Shorthand for a video input with its own group
    pub fn video_input(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let group_id = format!("group-{}", id);
        Self::new(id, group_id, DeviceKind::VideoInput, label)
    }

    pub fn is_video_input(&self) -> bool {
        self.kind == DeviceKind::VideoInput
    }

    /// Case-insensitive label match for the facing-mode heuristic
    pub fn label_suggests(&self, facing_mode: FacingMode) -> bool {
        self.label
            .to_lowercase()
            .contains(facing_mode.label_hint())
    }
}

/// Streaming status of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    On,
    #[default]
    Off,
}

/// How the video track picks its device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceSelector {
    FacingMode(FacingMode),
    /// `deviceId: { exact: .. }`
    Exact(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    Continuous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvancedConstraint {
    FocusMode(FocusMode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    pub device: DeviceSelector,
    pub aspect_ratio: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advanced: Vec<AdvancedConstraint>,
}

/// Constraint descriptor handed to the stream provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub video: VideoConstraints,
    pub audio: bool,
}

impl MediaConstraints {
    pub fn exact_device_id(&self) -> Option<&str> {
        match &self.video.device {
            DeviceSelector::Exact(id) => Some(id.as_str()),
            DeviceSelector::FacingMode(_) => None,
        }
    }

    pub fn facing_mode(&self) -> Option<FacingMode> {
        match &self.video.device {
            DeviceSelector::FacingMode(mode) => Some(*mode),
            DeviceSelector::Exact(_) => None,
        }
    }

    pub fn requests_continuous_focus(&self) -> bool {
        self.video
            .advanced
            .contains(&AdvancedConstraint::FocusMode(FocusMode::Continuous))
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Encoded image format for still captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Png,
    Jpeg,
}

impl SnapshotFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            SnapshotFormat::Png => "image/png",
            SnapshotFormat::Jpeg => "image/jpeg",
        }
    }
}

/// One RGB8 video frame held by a viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub device_id: String,
}

impl CameraFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, device_id: String) -> Self {
        Self {
            data,
            width,
            height,
            device_id,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width as usize) * (self.height as usize) * 3
    }
}
