//! Error types for memscan

use super::value::ScalarType;
use std::fmt;
use thiserror::Error;

/// Main error type for memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Failed to write memory at {address}: {reason}")]
    WriteFailed { address: String, reason: String },

    #[error("Failed to allocate {size} bytes for a scan buffer")]
    AllocationFailed { size: usize },

    #[error("Scan aborted after {elapsed_ms} ms: deadline exceeded")]
    ScanTimedOut { elapsed_ms: u128 },

    #[error("Scalar type mismatch: results hold {expected}, got {actual}")]
    TypeMismatch {
        expected: ScalarType,
        actual: ScalarType,
    },

    #[error("Result index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] windows::core::Error),

    #[error("Windows API: {0}")]
    WindowsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a new Windows API error with the last error code
    #[cfg(windows)]
    pub fn last_os_error() -> Self {
        MemoryError::WindowsApiError(windows::core::Error::from_win32())
    }

    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a write failed error
    pub fn write_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::WriteFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a type mismatch error
    pub fn type_mismatch(expected: ScalarType, actual: ScalarType) -> Self {
        MemoryError::TypeMismatch { expected, actual }
    }

    /// Creates an index out of bounds error
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        MemoryError::IndexOutOfBounds { index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::InvalidAddress("0xDEADBEEF".to_string());
        assert_eq!(err.to_string(), "Invalid memory address: 0xDEADBEEF");

        let err = MemoryError::type_mismatch(ScalarType::Int32, ScalarType::Float64);
        assert_eq!(
            err.to_string(),
            "Scalar type mismatch: results hold i32, got f64"
        );
    }

    #[test]
    fn test_all_error_variants() {
        let errors: Vec<(MemoryError, &str)> = vec![
            (
                MemoryError::ProcessNotFound("game.exe".to_string()),
                "Process not found: game.exe",
            ),
            (
                MemoryError::read_failed("0x1000", "page fault"),
                "Failed to read memory at 0x1000: page fault",
            ),
            (
                MemoryError::write_failed("0x2000", "write protected"),
                "Failed to write memory at 0x2000: write protected",
            ),
            (
                MemoryError::AllocationFailed { size: 4096 },
                "Failed to allocate 4096 bytes for a scan buffer",
            ),
            (
                MemoryError::ScanTimedOut { elapsed_ms: 250 },
                "Scan aborted after 250 ms: deadline exceeded",
            ),
            (
                MemoryError::index_out_of_bounds(7, 3),
                "Result index 7 out of bounds (len 3)",
            ),
            (
                MemoryError::InvalidHandle("null".to_string()),
                "Invalid handle: null",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let mem_err: MemoryError = io_err.into();
        assert!(matches!(mem_err, MemoryError::IoError(_)));
    }
}
