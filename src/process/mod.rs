//! Windows process backend
//!
//! Finds a target process by executable name and opens a handle to it. The
//! handle implements [`RemoteMemory`](crate::memory::RemoteMemory), so every
//! scan in [`crate::memory`] runs against it unchanged.

pub mod enumerator;
pub mod handle;

pub use enumerator::{enumerate_processes, find_process_by_name, pid_by_name, ProcessEnumerator};
pub use handle::{ProcessAccess, ProcessHandle};

use crate::core::types::MemoryResult;

/// Looks up a process by executable name and opens it with all access
pub fn open_by_name(name: &str) -> MemoryResult<ProcessHandle> {
    ProcessHandle::open_all_access(pid_by_name(name)?)
}
