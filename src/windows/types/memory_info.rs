//! Memory region information wrapper

use crate::core::types::Address;
use crate::memory::regions::{ProtectionFlags, RegionInfo, RegionState};
use winapi::um::winnt::MEMORY_BASIC_INFORMATION;

/// Wrapper for MEMORY_BASIC_INFORMATION
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBasicInfo {
    pub base_address: Address,
    pub allocation_base: Address,
    pub region_size: usize,
    pub state: u32,
    pub protect: u32,
    pub type_flags: u32,
}

impl From<MEMORY_BASIC_INFORMATION> for MemoryBasicInfo {
    fn from(mbi: MEMORY_BASIC_INFORMATION) -> Self {
        MemoryBasicInfo {
            base_address: Address::new(mbi.BaseAddress as usize),
            allocation_base: Address::new(mbi.AllocationBase as usize),
            region_size: mbi.RegionSize,
            state: mbi.State,
            protect: mbi.Protect,
            type_flags: mbi.Type,
        }
    }
}

impl From<MemoryBasicInfo> for RegionInfo {
    fn from(info: MemoryBasicInfo) -> Self {
        RegionInfo::new(
            info.base_address,
            info.region_size,
            RegionState::from_mem_state(info.state),
            ProtectionFlags::from_page_protection(info.protect),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_memory_basic_information() {
        use std::mem;

        let mut mbi: MEMORY_BASIC_INFORMATION = unsafe { mem::zeroed() };
        mbi.BaseAddress = 0x2000 as *mut _;
        mbi.AllocationBase = 0x1000 as *mut _;
        mbi.RegionSize = 8192;
        mbi.State = 0x2000; // MEM_RESERVE
        mbi.Protect = 0x01; // PAGE_NOACCESS
        mbi.Type = 0x40000;

        let info = MemoryBasicInfo::from(mbi);
        assert_eq!(info.base_address, Address::new(0x2000));
        assert_eq!(info.allocation_base, Address::new(0x1000));
        assert_eq!(info.region_size, 8192);
        assert_eq!(info.type_flags, 0x40000);
    }

    #[test]
    fn test_into_region_info() {
        let info = MemoryBasicInfo {
            base_address: Address::new(0x1000),
            allocation_base: Address::new(0x1000),
            region_size: 4096,
            state: 0x1000, // MEM_COMMIT
            protect: 0x04, // PAGE_READWRITE
            type_flags: 0x20000,
        };

        let region = RegionInfo::from(info);
        assert_eq!(region.state, RegionState::Committed);
        assert_eq!(region.protection, ProtectionFlags::READ_WRITE);
        assert!(region.is_scannable());
    }

    #[test]
    fn test_guarded_region_not_scannable() {
        let info = MemoryBasicInfo {
            base_address: Address::new(0x1000),
            allocation_base: Address::new(0x1000),
            region_size: 4096,
            state: 0x1000,
            protect: 0x04 | 0x100, // PAGE_READWRITE | PAGE_GUARD
            type_flags: 0x20000,
        };

        assert!(!RegionInfo::from(info).is_scannable());
    }
}
