//! Process discovery using the ToolHelp32 API

use crate::core::types::{MemoryError, MemoryResult, ProcessId, ProcessInfo};
use crate::windows::types::Handle;
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32First, Process32Next, PROCESSENTRY32, TH32CS_SNAPPROCESS,
};

/// Walks a snapshot of the running processes
pub struct ProcessEnumerator {
    snapshot: Handle,
    first_called: bool,
}

impl ProcessEnumerator {
    /// Takes a snapshot of the running processes
    pub fn new() -> MemoryResult<Self> {
        let raw = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        let snapshot = Handle::from_raw(raw).ok_or_else(MemoryError::last_os_error)?;

        Ok(ProcessEnumerator {
            snapshot,
            first_called: false,
        })
    }

    fn next_process(&mut self) -> Option<ProcessInfo> {
        let mut entry: PROCESSENTRY32 = unsafe { mem::zeroed() };
        entry.dwSize = mem::size_of::<PROCESSENTRY32>() as u32;

        let success = unsafe {
            if self.first_called {
                Process32Next(self.snapshot.raw(), &mut entry)
            } else {
                self.first_called = true;
                Process32First(self.snapshot.raw(), &mut entry)
            }
        };

        if success == FALSE {
            return None;
        }

        Some(ProcessInfo {
            pid: entry.th32ProcessID,
            name: exe_name(&entry.szExeFile),
            parent_pid: Some(entry.th32ParentProcessID),
            thread_count: entry.cntThreads,
        })
    }
}

impl Iterator for ProcessEnumerator {
    type Item = ProcessInfo;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_process()
    }
}

/// Converts the fixed-size, NUL-terminated ANSI name from a snapshot entry
fn exe_name(raw: &[i8]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Enumerate all running processes
pub fn enumerate_processes() -> MemoryResult<Vec<ProcessInfo>> {
    Ok(ProcessEnumerator::new()?.collect())
}

/// First process whose executable name equals `name`, ignoring ASCII case
pub fn find_process_by_name(name: &str) -> MemoryResult<Option<ProcessInfo>> {
    Ok(ProcessEnumerator::new()?.find(|p| p.name_matches(name)))
}

/// Process ID for an executable name, or `ProcessNotFound`
pub fn pid_by_name(name: &str) -> MemoryResult<ProcessId> {
    find_process_by_name(name)?
        .map(|p| p.pid)
        .ok_or_else(|| MemoryError::ProcessNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exe_name() {
        let mut raw = [0i8; 16];
        for (slot, byte) in raw.iter_mut().zip(b"game.exe") {
            *slot = *byte as i8;
        }
        assert_eq!(exe_name(&raw), "game.exe");
        assert_eq!(exe_name(&[0i8; 4]), "");
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_enumerate_processes() {
        let processes = enumerate_processes().unwrap();
        assert!(processes.iter().any(|p| p.pid == std::process::id()));
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_find_process_by_name() {
        assert!(find_process_by_name("System").unwrap().is_some());
        assert!(find_process_by_name("NonExistentProcess123456.exe")
            .unwrap()
            .is_none());
        assert!(matches!(
            pid_by_name("NonExistentProcess123456.exe"),
            Err(MemoryError::ProcessNotFound(_))
        ));
    }
}
