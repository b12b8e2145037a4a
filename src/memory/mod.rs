//! Memory operations for scanning another process
//!
//! This module provides:
//! - The [`RemoteMemory`] seam every scan goes through
//! - Region enumeration and the scannable-region policy
//! - Typed initial and refinement scans over an [`AddressSet`]
//! - Scan sessions with read/write of results and a polling monitor

pub mod address_set;
pub mod reader;
pub mod regions;
pub mod scanner;
pub mod session;
pub mod simulated;
pub mod writer;

pub use address_set::{create_address_set, release_address_set, AddressSet, ScanResults};
pub use reader::MemoryReader;
pub use regions::{scannable_regions, ProtectionFlags, RegionEnumerator, RegionInfo, RegionState};
pub use scanner::{
    refine_double, refine_float, refine_int, refine_value, scan_double, scan_float, scan_int,
    scan_value, ScanOptions, ValueScanner,
};
pub use session::{MonitorAction, ScanSession, ValueHistogram};
pub use simulated::SimulatedProcess;
pub use writer::MemoryWriter;

use crate::core::types::{Address, MemoryResult, Scalar};

/// Access to the address space of one target process.
///
/// Implementations borrow an already-open target; nothing in this crate
/// closes it. Failures are reported per call and never leave state behind.
pub trait RemoteMemory {
    /// Describes the region containing `address`.
    ///
    /// Returns `None` past the end of the address space or when the query
    /// itself fails.
    fn query_region(&self, address: Address) -> Option<RegionInfo>;

    /// Copies bytes starting at `address` into `buffer`, returning how many
    /// were copied.
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize>;

    /// Copies `data` to `address`, returning how many bytes were written.
    fn write_memory(&self, address: Address, data: &[u8]) -> MemoryResult<usize>;

    /// Reads one scalar. A short read is a failure.
    fn read_value<T: Scalar>(&self, address: Address) -> MemoryResult<T>
    where
        Self: Sized,
    {
        MemoryReader::new(self).read(address)
    }

    /// Writes one scalar. A short write is a failure.
    fn write_value<T: Scalar>(&self, address: Address, value: T) -> MemoryResult<()>
    where
        Self: Sized,
    {
        MemoryWriter::new(self).write(address, value)
    }
}

impl<M: RemoteMemory + ?Sized> RemoteMemory for &M {
    fn query_region(&self, address: Address) -> Option<RegionInfo> {
        (**self).query_region(address)
    }

    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        (**self).read_memory(address, buffer)
    }

    fn write_memory(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        (**self).write_memory(address, data)
    }
}
