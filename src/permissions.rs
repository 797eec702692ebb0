use crate::errors::CameraError;

/// Permission status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PermissionStatus {
    /// Permission granted
    Granted,
    /// Permission denied
    Denied,
    /// Permission not determined (no acquisition attempted yet)
    #[default]
    NotDetermined,
    /// Permission restricted by host policy
    Restricted,
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionStatus::Granted => write!(f, "granted"),
            PermissionStatus::Denied => write!(f, "denied"),
            PermissionStatus::NotDetermined => write!(f, "not_determined"),
            PermissionStatus::Restricted => write!(f, "restricted"),
        }
    }
}

impl PermissionStatus {
    /// Status implied by the outcome of a stream acquisition.
    ///
    /// Failures that are not a refusal (no device, overconstrained) say
    /// nothing about permission, so the previous status is kept.
    pub fn after_acquisition<T>(self, outcome: &Result<T, CameraError>) -> Self {
        match outcome {
            Ok(_) => PermissionStatus::Granted,
            Err(e) if e.is_permission_denied() => PermissionStatus::Denied,
            Err(e) if e.is_policy_blocked() => PermissionStatus::Restricted,
            Err(_) => self,
        }
    }
}
