//! Windows API layer
//!
//! Safe wrappers around the Windows API functions the process backend needs.
//! All unsafe FFI calls are contained within this module.

pub mod bindings;
pub mod types;

pub use bindings::kernel32;
pub use types::{Handle, MemoryBasicInfo};
