//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;

#[test]
fn test_core_error_display() {
    let error = CoreError::InvalidIdentifier("abc".to_string());
    let display = format!("{}", error);

    assert!(display.contains("Invalid identifier"));
}

#[test]
fn test_port_error_unexpected_status_display() {
    let error = PortError::UnexpectedStatus {
        service: "claims-api".to_string(),
        status: 503,
    };

    assert_eq!(error.to_string(), "Unexpected HTTP 503 from claims-api");
    assert!(!error.is_transient());
    assert!(!error.is_decode());
}

#[test]
fn test_port_error_connection_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = PortError::connection_with_source("claims-api unreachable", io);

    assert!(error.is_transient());
    assert!(std::error::Error::source(&error).is_some());
}
