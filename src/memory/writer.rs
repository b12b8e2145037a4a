//! Typed writes into a remote address space

use crate::core::types::{Address, MemoryError, MemoryResult, Scalar, ScanValue};
use crate::memory::RemoteMemory;

/// Memory writer for type-safe write operations
pub struct MemoryWriter<'a, M: RemoteMemory + ?Sized> {
    memory: &'a M,
}

impl<'a, M: RemoteMemory + ?Sized> MemoryWriter<'a, M> {
    /// Create a new memory writer
    pub fn new(memory: &'a M) -> Self {
        MemoryWriter { memory }
    }

    /// Write raw bytes to memory
    pub fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        let bytes_written = self.memory.write_memory(address, data)?;

        if bytes_written != data.len() {
            return Err(MemoryError::write_failed(
                address,
                format!(
                    "Partial write: expected {} bytes, wrote {} bytes",
                    data.len(),
                    bytes_written
                ),
            ));
        }

        Ok(())
    }

    /// Write a typed value to memory
    pub fn write<T: Scalar>(&self, address: Address, value: T) -> MemoryResult<()> {
        self.write_bytes(address, &value.to_ne_vec())
    }

    /// Write a value whose type is only known at run time
    pub fn write_value(&self, address: Address, value: ScanValue) -> MemoryResult<()> {
        match value {
            ScanValue::Int32(v) => self.write(address, v),
            ScanValue::Float32(v) => self.write(address, v),
            ScanValue::Float64(v) => self.write(address, v),
        }
    }

    /// Write the same value to every address, stopping at the first failure
    pub fn write_all<T: Scalar>(&self, addresses: &[Address], value: T) -> MemoryResult<()> {
        let data = value.to_ne_vec();
        addresses
            .iter()
            .try_for_each(|&address| self.write_bytes(address, &data))
    }
}
