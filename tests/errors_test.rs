#[cfg(test)]
mod error_tests {
    use camswitch::errors::{CameraError, MediaAccessKind};
    use std::error::Error;

    #[test]
    fn test_camera_error_enumeration() {
        let error = CameraError::Enumeration("Test enumeration error".to_string());
        assert!(error.to_string().contains("Device enumeration error"));
        assert!(error.to_string().contains("Test enumeration error"));
    }

    #[test]
    fn test_camera_error_media_access_kinds() {
        let cases = [
            (MediaAccessKind::PermissionDenied, "permission denied"),
            (MediaAccessKind::PolicyBlocked, "blocked by policy"),
            (MediaAccessKind::NotFound, "no matching device"),
            (MediaAccessKind::Overconstrained, "overconstrained"),
            (MediaAccessKind::Other, "host error"),
        ];
        for (kind, text) in cases {
            let error = CameraError::media_access(kind, "details");
            assert_eq!(
                error.to_string(),
                format!("Media access error ({}): details", text)
            );
            assert_eq!(
                error.is_permission_denied(),
                kind == MediaAccessKind::PermissionDenied
            );
            assert_eq!(
                error.is_policy_blocked(),
                kind == MediaAccessKind::PolicyBlocked
            );
        }
    }

    #[test]
    fn test_camera_error_configuration_display() {
        let error = CameraError::missing_canvas();
        assert_eq!(
            format!("{}", error),
            "Configuration error: canvas element is missing"
        );
    }

    #[test]
    fn test_camera_error_debug_format() {
        let error = CameraError::Layout("Debug test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("Layout"));
        assert!(debug_str.contains("Debug test"));
    }

    #[test]
    fn test_camera_error_implements_error_trait() {
        let error = CameraError::Storage("Error trait test".to_string());
        let _error_trait: &dyn Error = &error;
        assert!(error.source().is_none());
    }

    #[test]
    fn test_camera_error_is_clone_and_eq() {
        let error = CameraError::Encoding("png".to_string());
        assert_eq!(error.clone(), error);
    }

    #[test]
    fn test_media_access_kind_serializes() {
        let json = serde_json::to_string(&MediaAccessKind::Overconstrained).unwrap();
        assert_eq!(json, "\"Overconstrained\"");
    }
}
