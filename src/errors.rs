use thiserror::Error;

/// Why a stream acquisition was refused by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MediaAccessKind {
    /// The user refused camera access
    PermissionDenied,
    /// Camera access is disabled by host policy, no prompt was shown
    PolicyBlocked,
    /// No device satisfies the request
    NotFound,
    /// The constraints cannot be satisfied by any device
    Overconstrained,
    /// Anything else the host reports
    Other,
}

impl std::fmt::Display for MediaAccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaAccessKind::PermissionDenied => write!(f, "permission denied"),
            MediaAccessKind::PolicyBlocked => write!(f, "blocked by policy"),
            MediaAccessKind::NotFound => write!(f, "no matching device"),
            MediaAccessKind::Overconstrained => write!(f, "overconstrained"),
            MediaAccessKind::Other => write!(f, "host error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("Device enumeration error: {0}")]
    Enumeration(String),
    #[error("Media access error ({kind}): {message}")]
    MediaAccess {
        kind: MediaAccessKind,
        message: String,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Layout error: {0}")]
    Layout(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CameraError {
    pub fn media_access(kind: MediaAccessKind, message: impl Into<String>) -> Self {
        CameraError::MediaAccess {
            kind,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::media_access(MediaAccessKind::PermissionDenied, message)
    }

    pub fn missing_canvas() -> Self {
        CameraError::Configuration("canvas element is missing".to_string())
    }

    /// True when access is disabled by host policy
    pub fn is_policy_blocked(&self) -> bool {
        matches!(
            self,
            CameraError::MediaAccess {
                kind: MediaAccessKind::PolicyBlocked,
                ..
            }
        )
    }

    /// True when the host refused access outright
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            CameraError::MediaAccess {
                kind: MediaAccessKind::PermissionDenied,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_access_display() {
        let error = CameraError::permission_denied("user dismissed prompt");
        assert_eq!(
            error.to_string(),
            "Media access error (permission denied): user dismissed prompt"
        );
        assert!(error.is_permission_denied());
    }

    #[test]
    fn test_missing_canvas_message() {
        let error = CameraError::missing_canvas();
        assert!(error.to_string().contains("canvas element is missing"));
        assert!(!error.is_permission_denied());
    }
}
