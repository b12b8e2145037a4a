//! Page protection as a platform-neutral bitset

use std::fmt;

/// Access rights of a memory region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProtectionFlags {
    bits: u32,
}

impl ProtectionFlags {
    pub const NONE: Self = Self { bits: 0 };
    pub const READ: Self = Self { bits: 0x01 };
    pub const WRITE: Self = Self { bits: 0x02 };
    pub const EXECUTE: Self = Self { bits: 0x04 };
    pub const COPY_ON_WRITE: Self = Self { bits: 0x08 };
    pub const GUARD: Self = Self { bits: 0x10 };

    pub const READ_WRITE: Self = Self::READ.union(Self::WRITE);
    pub const EXECUTE_READ: Self = Self::READ.union(Self::EXECUTE);
    pub const EXECUTE_READ_WRITE: Self = Self::READ_WRITE.union(Self::EXECUTE);
    pub const WRITE_COPY: Self = Self::READ.union(Self::COPY_ON_WRITE);

    // Windows PAGE_* constants
    pub const PAGE_NOACCESS: u32 = 0x01;
    pub const PAGE_READONLY: u32 = 0x02;
    pub const PAGE_READWRITE: u32 = 0x04;
    pub const PAGE_WRITECOPY: u32 = 0x08;
    pub const PAGE_EXECUTE: u32 = 0x10;
    pub const PAGE_EXECUTE_READ: u32 = 0x20;
    pub const PAGE_EXECUTE_READWRITE: u32 = 0x40;
    pub const PAGE_EXECUTE_WRITECOPY: u32 = 0x80;
    pub const PAGE_GUARD: u32 = 0x100;

    /// Combines two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether every flag in `other` is set
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Raw bit value
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Translates a Windows `PAGE_*` protection value
    pub fn from_page_protection(protect: u32) -> Self {
        let base = match protect & 0xFF {
            Self::PAGE_READONLY => Self::READ,
            Self::PAGE_READWRITE => Self::READ_WRITE,
            Self::PAGE_WRITECOPY => Self::WRITE_COPY,
            Self::PAGE_EXECUTE => Self::EXECUTE,
            Self::PAGE_EXECUTE_READ => Self::EXECUTE_READ,
            Self::PAGE_EXECUTE_READWRITE => Self::EXECUTE_READ_WRITE,
            Self::PAGE_EXECUTE_WRITECOPY => Self::WRITE_COPY.union(Self::EXECUTE),
            _ => Self::NONE,
        };

        if protect & Self::PAGE_GUARD != 0 {
            base.union(Self::GUARD)
        } else {
            base
        }
    }

    pub fn is_readable(&self) -> bool {
        self.contains(Self::READ) && !self.is_guard()
    }

    /// Writable directly or through copy-on-write
    pub fn is_writable(&self) -> bool {
        self.contains(Self::WRITE) || self.contains(Self::COPY_ON_WRITE)
    }

    pub fn is_executable(&self) -> bool {
        self.contains(Self::EXECUTE)
    }

    pub fn is_guard(&self) -> bool {
        self.contains(Self::GUARD)
    }
}

impl std::ops::BitOr for ProtectionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for ProtectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.contains(Self::READ), 'r'),
            flag(self.contains(Self::WRITE), 'w'),
            flag(self.contains(Self::EXECUTE), 'x'),
            flag(self.contains(Self::COPY_ON_WRITE), 'c'),
        )?;
        if self.is_guard() {
            f.write_str("+G")?;
        }
        Ok(())
    }
}
