//! Process handle with RAII semantics

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::{RegionInfo, RemoteMemory};
use crate::windows::bindings::kernel32;
use crate::windows::types::{Handle, MemoryBasicInfo};
use std::fmt;
use tracing::debug;
use winapi::um::winnt::HANDLE;

/// Access rights for process handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    pub const ALL_ACCESS: Self = Self { value: 0x1FFFFF };
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    pub const VM_READ: Self = Self { value: 0x0010 };
    pub const VM_WRITE: Self = Self { value: 0x0020 };
    pub const VM_OPERATION: Self = Self { value: 0x0008 };

    /// What scanning, reading and writing results needs
    pub const SCAN: Self = Self {
        value: 0x0400 | 0x0010 | 0x0020 | 0x0008,
    };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        Self {
            value: rights.iter().fold(0, |acc, right| acc | right.value),
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

/// An open handle to another process, closed on drop
pub struct ProcessHandle {
    handle: Handle,
    pid: ProcessId,
    access: ProcessAccess,
}

impl ProcessHandle {
    /// Open a process with specified access rights
    pub fn open(pid: ProcessId, access: ProcessAccess) -> MemoryResult<Self> {
        let raw = kernel32::open_process(pid, access.value())?;
        let handle = Handle::from_raw(raw)
            .ok_or_else(|| MemoryError::InvalidHandle(format!("OpenProcess({})", pid)))?;

        debug!(target: "memscan::process", pid, access = access.value(), "opened process");
        Ok(ProcessHandle {
            handle,
            pid,
            access,
        })
    }

    /// Open a process with all access rights
    pub fn open_all_access(pid: ProcessId) -> MemoryResult<Self> {
        Self::open(pid, ProcessAccess::ALL_ACCESS)
    }

    /// Open a process with just the rights a scan session uses
    pub fn open_for_read_write(pid: ProcessId) -> MemoryResult<Self> {
        Self::open(pid, ProcessAccess::SCAN)
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn access(&self) -> ProcessAccess {
        self.access
    }

    /// Borrow the raw handle. Valid only while `self` is alive.
    pub fn raw(&self) -> HANDLE {
        self.handle.raw()
    }

    pub fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    /// Close now rather than on drop
    pub fn close(self) -> MemoryResult<()> {
        let raw = self.handle.into_raw();
        unsafe { kernel32::close_handle(raw) }
    }

    fn ensure_valid(&self) -> MemoryResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MemoryError::InvalidHandle(
                "Process handle is null".to_string(),
            ))
        }
    }
}

impl RemoteMemory for ProcessHandle {
    fn query_region(&self, address: Address) -> Option<RegionInfo> {
        self.ensure_valid().ok()?;
        let mbi = unsafe { kernel32::virtual_query_ex(self.handle.raw(), address) }.ok()?;
        Some(MemoryBasicInfo::from(mbi).into())
    }

    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        self.ensure_valid()?;
        unsafe { kernel32::read_process_memory(self.handle.raw(), address, buffer) }
    }

    fn write_memory(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        self.ensure_valid()?;
        unsafe { kernel32::write_process_memory(self.handle.raw(), address, data) }
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .field("access", &format!("0x{:X}", self.access.value()))
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessHandle(pid={}, valid={})",
            self.pid,
            self.is_valid()
        )
    }
}
