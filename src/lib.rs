//! memscan: typed value scanning over another process's memory
//!
//! Scan a target for every aligned `i32`, `f32` or `f64` equal to a value,
//! then narrow the results by re-checking them against new values until only
//! the interesting addresses remain.
//!
//! ```
//! use memscan::memory::{refine_int, scan_int, ProtectionFlags, SimulatedProcess};
//! use memscan::Address;
//!
//! let mut process = SimulatedProcess::new();
//! let values: Vec<u8> = [5i32, 7, 5, 9].iter().flat_map(|v| v.to_ne_bytes()).collect();
//! process.add_region(0x1000, values, ProtectionFlags::READ_WRITE);
//!
//! let mut results = scan_int(&process, 5).unwrap();
//! assert_eq!(results.as_slice(), &[Address::new(0x1000), Address::new(0x1008)]);
//!
//! process.poke(0x1008, 3i32).unwrap();
//! refine_int(&process, &mut results, 5);
//! assert_eq!(results.as_slice(), &[Address::new(0x1000)]);
//! ```
//!
//! On Windows, [`process::ProcessHandle`] provides the same interface for a
//! live process.

pub mod config;
pub mod core;
pub mod logging;
pub mod memory;
#[cfg(windows)]
pub mod process;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use crate::core::types::{
    parse_address, Address, MemoryError, MemoryResult, ProcessId, ProcessInfo, Scalar, ScalarType,
    ScanValue,
};

pub use crate::memory::{AddressSet, RemoteMemory, ScanOptions, ScanResults, ScanSession};

#[cfg(windows)]
pub use crate::process::{find_process_by_name, ProcessHandle};
