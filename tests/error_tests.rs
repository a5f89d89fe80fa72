//! Tests for error handling
//!
//! Covers ReportError variants, their messages, conversions and the Result
//! alias.

use cafereport::error::{ReportError, Result};

// ============================================================================
// ReportError Variant Tests
// ============================================================================

mod error_variant_tests {
    use super::*;

    #[test]
    fn test_surface_blocked_is_actionable() {
        let err = ReportError::SurfaceBlocked("pop-up blocked".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("pop-up blocked"));
        assert!(msg.contains("Allow pop-ups"));
        assert!(msg.contains("config set browser"));
    }

    #[test]
    fn test_chart_unavailable_error() {
        let err = ReportError::ChartUnavailable {
            chart: "pie".to_string(),
            reason: "non-finite value for 'cash'".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Chart unavailable"));
        assert!(msg.contains("pie"));
        assert!(msg.contains("cash"));
    }

    #[test]
    fn test_invalid_payload_error() {
        let err = ReportError::InvalidPayload("day.json: expected value".to_string());
        assert!(err.to_string().starts_with("Invalid payload"));
    }

    #[test]
    fn test_config_errors() {
        let err = ReportError::UnknownConfigKey("colour".to_string());
        assert_eq!(err.to_string(), "Unknown config key: colour");

        let err = ReportError::InvalidConfigValue {
            key: "settle_delay_ms".to_string(),
            value: "soon".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for settle_delay_ms: soon");
    }
}

// ============================================================================
// Conversion Tests
// ============================================================================

mod error_from_tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReportError = io_err.into();
        assert!(matches!(err, ReportError::IoError(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(matches!(err, ReportError::JsonError(_)));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [1, 2").unwrap_err();
        let err: ReportError = yaml_err.into();
        assert!(matches!(err, ReportError::YamlError(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here/payload.json")?)
        }
        assert!(matches!(read_missing(), Err(ReportError::IoError(_))));
    }
}

// ============================================================================
// Trait Tests
// ============================================================================

mod error_traits_tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReportError>();
    }

    #[test]
    fn test_error_has_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err = ReportError::IoError(io_err);
        assert!(err.source().is_some());

        let err = ReportError::InvalidPayload("x".to_string());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error = ReportError::SurfaceBlocked("denied".to_string()).into();
        assert!(err.downcast_ref::<ReportError>().is_some());
    }
}
