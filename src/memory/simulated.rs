//! In-memory stand-in for a remote process
//!
//! [`SimulatedProcess`] answers region queries and reads/writes from a set of
//! byte buffers laid out at fixed addresses. It lets the scanner be exercised
//! without a live target and without platform APIs.

use crate::core::types::{Address, MemoryError, MemoryResult, Scalar};
use crate::memory::regions::{ProtectionFlags, RegionInfo, RegionState};
use crate::memory::RemoteMemory;
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct SimRegion {
    base: usize,
    size: usize,
    state: RegionState,
    protection: ProtectionFlags,
    /// `None` for regions whose contents can never be copied
    bytes: Option<Vec<u8>>,
    readable: bool,
}

impl SimRegion {
    fn end(&self) -> usize {
        self.base.saturating_add(self.size)
    }

    fn info(&self) -> RegionInfo {
        RegionInfo::new(
            Address::new(self.base),
            self.size,
            self.state,
            self.protection,
        )
    }

    /// Byte range inside this region, or `None` if `[address, address + len)` leaves it
    fn span(&self, address: usize, len: usize) -> Option<std::ops::Range<usize>> {
        let start = address.checked_sub(self.base)?;
        let end = start.checked_add(len)?;
        (end <= self.size).then_some(start..end)
    }
}

/// A synthetic process address space
#[derive(Debug, Default)]
pub struct SimulatedProcess {
    regions: RefCell<Vec<SimRegion>>,
}

impl SimulatedProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a committed region holding `bytes`.
    ///
    /// # Panics
    /// Panics if the region overlaps one already added.
    pub fn add_region(
        &mut self,
        base: usize,
        bytes: Vec<u8>,
        protection: ProtectionFlags,
    ) -> &mut Self {
        self.add_region_with_state(base, bytes, RegionState::Committed, protection)
    }

    /// Adds a region in an arbitrary state.
    ///
    /// # Panics
    /// Panics if the region overlaps one already added.
    pub fn add_region_with_state(
        &mut self,
        base: usize,
        bytes: Vec<u8>,
        state: RegionState,
        protection: ProtectionFlags,
    ) -> &mut Self {
        let size = bytes.len();
        self.insert(SimRegion {
            base,
            size,
            state,
            protection,
            bytes: Some(bytes),
            readable: true,
        })
    }

    /// Adds a committed region of `size` bytes whose contents cannot be read.
    ///
    /// # Panics
    /// Panics if the region overlaps one already added.
    pub fn add_unbacked_region(
        &mut self,
        base: usize,
        size: usize,
        protection: ProtectionFlags,
    ) -> &mut Self {
        self.insert(SimRegion {
            base,
            size,
            state: RegionState::Committed,
            protection,
            bytes: None,
            readable: false,
        })
    }

    /// Makes every read touching the region at `base` fail from now on
    pub fn revoke_reads(&self, base: usize) {
        let mut regions = self.regions.borrow_mut();
        if let Some(region) = regions.iter_mut().find(|r| r.base == base) {
            region.readable = false;
        }
    }

    /// Overwrites a value in place, regardless of the region's protection
    pub fn poke<T: Scalar>(&self, address: usize, value: T) -> MemoryResult<()> {
        let data = value.to_ne_vec();
        let mut regions = self.regions.borrow_mut();
        let (region, span) = Self::locate_mut(&mut regions, address, data.len())?;
        match region.bytes.as_mut() {
            Some(bytes) => {
                bytes[span].copy_from_slice(&data);
                Ok(())
            }
            None => Err(MemoryError::write_failed(
                Address::new(address),
                "region has no backing bytes",
            )),
        }
    }

    fn insert(&mut self, region: SimRegion) -> &mut Self {
        let regions = self.regions.get_mut();
        let overlaps = regions
            .iter()
            .any(|r| region.base < r.end() && r.base < region.end());
        assert!(
            !overlaps,
            "simulated region at {:#x} overlaps an existing region",
            region.base
        );

        let index = regions.partition_point(|r| r.base < region.base);
        regions.insert(index, region);
        self
    }

    fn locate_mut(
        regions: &mut [SimRegion],
        address: usize,
        len: usize,
    ) -> MemoryResult<(&mut SimRegion, std::ops::Range<usize>)> {
        regions
            .iter_mut()
            .find_map(|region| region.span(address, len).map(|span| (region, span)))
            .ok_or_else(|| MemoryError::InvalidAddress(format!("{:#x}", address)))
    }
}

impl RemoteMemory for SimulatedProcess {
    fn query_region(&self, address: Address) -> Option<RegionInfo> {
        let address = address.as_usize();
        let regions = self.regions.borrow();

        if let Some(region) = regions.iter().find(|r| r.base <= address && address < r.end()) {
            return Some(region.info());
        }

        // Unmapped gap up to the next region; nothing past the last one
        regions.iter().find(|r| r.base > address).map(|next| {
            RegionInfo::new(
                Address::new(address),
                next.base - address,
                RegionState::Free,
                ProtectionFlags::NONE,
            )
        })
    }

    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        let regions = self.regions.borrow();
        let found = regions.iter().find_map(|region| {
            region
                .span(address.as_usize(), buffer.len())
                .map(|span| (region, span))
        });

        let (region, span) = match found {
            Some(found) => found,
            None => return Err(MemoryError::read_failed(address, "address not mapped")),
        };

        let readable = region.readable
            && region.state == RegionState::Committed
            && region.protection.is_readable();
        match region.bytes.as_ref() {
            Some(bytes) if readable => {
                buffer.copy_from_slice(&bytes[span]);
                Ok(buffer.len())
            }
            _ => Err(MemoryError::read_failed(address, "access denied")),
        }
    }

    fn write_memory(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        let mut regions = self.regions.borrow_mut();
        let (region, span) = Self::locate_mut(&mut regions, address.as_usize(), data.len())
            .map_err(|_| MemoryError::write_failed(address, "address not mapped"))?;

        let writable = region.state == RegionState::Committed && region.protection.is_writable();
        match region.bytes.as_mut() {
            Some(bytes) if writable => {
                bytes[span].copy_from_slice(data);
                Ok(data.len())
            }
            _ => Err(MemoryError::write_failed(address, "access denied")),
        }
    }
}
