//! Owned kernel handle closed on drop

use crate::windows::bindings::kernel32;
use std::ptr;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::winnt::HANDLE;

/// A kernel object handle owned by this process.
///
/// Process handles and ToolHelp snapshots both use it, so neither can leak on
/// an early return.
pub struct Handle {
    handle: HANDLE,
}

impl Handle {
    /// Takes ownership of `handle`, or returns `None` for null and
    /// `INVALID_HANDLE_VALUE`
    pub fn from_raw(handle: HANDLE) -> Option<Self> {
        if handle.is_null() || handle == INVALID_HANDLE_VALUE {
            None
        } else {
            Some(Handle { handle })
        }
    }

    /// A handle that refers to nothing and closes nothing
    pub fn null() -> Self {
        Handle {
            handle: ptr::null_mut(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    /// Borrow the raw handle. Valid only while `self` is alive.
    pub fn raw(&self) -> HANDLE {
        self.handle
    }

    /// Give up ownership without closing
    pub fn into_raw(mut self) -> HANDLE {
        std::mem::replace(&mut self.handle, ptr::null_mut())
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            // Nothing useful to do with a close failure during drop
            unsafe {
                let _ = kernel32::close_handle(self.handle);
            }
        }
    }
}

// Kernel handles are valid from any thread of the owning process
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}
