//! Memory region enumeration functionality

use crate::core::types::Address;
use crate::memory::regions::{ProtectionFlags, RegionState};
use crate::memory::RemoteMemory;

/// Information about a memory region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    /// Base address of the region
    pub base_address: Address,
    /// Size of the region in bytes
    pub size: usize,
    /// Current state of the region
    pub state: RegionState,
    /// Protection flags for the region
    pub protection: ProtectionFlags,
}

impl RegionInfo {
    pub fn new(
        base_address: Address,
        size: usize,
        state: RegionState,
        protection: ProtectionFlags,
    ) -> Self {
        RegionInfo {
            base_address,
            size,
            state,
            protection,
        }
    }

    /// Get the end address of the region, `None` if it would overflow
    pub fn end_address(&self) -> Option<Address> {
        self.base_address.checked_add(self.size)
    }

    /// Check if an address is within this region
    pub fn contains(&self, address: Address) -> bool {
        address >= self.base_address
            && self.end_address().map_or(true, |end| address < end)
    }

    /// Whether the scanner should read this region.
    ///
    /// Committed, not a guard page, and either read-write (with or without
    /// execute) or copy-on-write.
    pub fn is_scannable(&self) -> bool {
        self.state == RegionState::Committed
            && !self.protection.is_guard()
            && (self.protection.contains(ProtectionFlags::READ_WRITE)
                || self.protection.contains(ProtectionFlags::COPY_ON_WRITE))
    }
}

/// Walks the address space of a process one region at a time.
///
/// Starts at address zero and advances by each region's size. The sequence
/// ends when the query reports no region at the next address, or when the
/// next address would overflow. Nothing is held in the target process, so a
/// new enumerator (or [`RegionEnumerator::restart`]) begins a fresh walk.
pub struct RegionEnumerator<'a, M: RemoteMemory + ?Sized> {
    memory: &'a M,
    next_address: Option<Address>,
}

impl<'a, M: RemoteMemory + ?Sized> RegionEnumerator<'a, M> {
    /// Create a new region enumerator for a process
    pub fn new(memory: &'a M) -> Self {
        RegionEnumerator {
            memory,
            next_address: Some(Address::null()),
        }
    }

    /// Begin again from address zero
    pub fn restart(&mut self) {
        self.next_address = Some(Address::null());
    }

    /// Get the next memory region
    pub fn next_region(&mut self) -> Option<RegionInfo> {
        let address = self.next_address.take()?;
        let region = self.memory.query_region(address)?;

        // A zero-sized answer would never advance
        if region.size != 0 {
            self.next_address = region.end_address();
        }

        Some(region)
    }
}

impl<M: RemoteMemory + ?Sized> Iterator for RegionEnumerator<'_, M> {
    type Item = RegionInfo;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_region()
    }
}

/// Regions of `memory` that pass [`RegionInfo::is_scannable`], in address order
pub fn scannable_regions<M: RemoteMemory + ?Sized>(
    memory: &M,
) -> impl Iterator<Item = RegionInfo> + '_ {
    RegionEnumerator::new(memory).filter(RegionInfo::is_scannable)
}
