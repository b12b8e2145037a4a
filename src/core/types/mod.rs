//! Core type definitions for memscan
//!
//! Remote addresses, scalar value types, process information and the error
//! type shared by every module.

mod address;
mod error;
mod process_info;
mod value;

// Re-export all public types
pub use address::{parse_address, Address};
pub use error::{MemoryError, MemoryResult};
pub use process_info::ProcessInfo;
pub use value::{Scalar, ScalarType, ScanValue};

// Common type aliases
pub type ProcessId = u32;
