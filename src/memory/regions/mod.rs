//! Memory region enumeration for a remote process
//!
//! Regions are discovered one at a time through
//! [`RemoteMemory::query_region`](crate::memory::RemoteMemory::query_region),
//! starting at address zero. Only committed, writable regions are worth
//! scanning; see [`RegionInfo::is_scannable`].

pub mod enumerator;
pub mod protection;

pub use enumerator::{scannable_regions, RegionEnumerator, RegionInfo};
pub use protection::ProtectionFlags;

/// State of a memory region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionState {
    /// Memory is committed and accessible
    Committed,
    /// Memory is reserved but not committed
    Reserved,
    /// Memory is free/unallocated
    Free,
}

impl RegionState {
    pub const MEM_COMMIT: u32 = 0x1000;
    pub const MEM_RESERVE: u32 = 0x2000;
    pub const MEM_FREE: u32 = 0x10000;

    /// Translates a Windows `MEM_*` state value
    pub fn from_mem_state(state: u32) -> Self {
        match state {
            Self::MEM_COMMIT => RegionState::Committed,
            Self::MEM_RESERVE => RegionState::Reserved,
            _ => RegionState::Free,
        }
    }
}
