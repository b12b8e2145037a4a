//! Typed reads from a remote address space

use crate::core::types::{Address, MemoryError, MemoryResult, Scalar, ScalarType, ScanValue};
use crate::memory::RemoteMemory;

/// Memory reader with type-safe operations
pub struct MemoryReader<'a, M: RemoteMemory + ?Sized> {
    memory: &'a M,
}

impl<'a, M: RemoteMemory + ?Sized> MemoryReader<'a, M> {
    /// Create a new memory reader
    pub fn new(memory: &'a M) -> Self {
        MemoryReader { memory }
    }

    /// Read exactly `size` bytes from memory
    pub fn read_bytes(&self, address: Address, size: usize) -> MemoryResult<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        let bytes_read = self.memory.read_memory(address, &mut buffer)?;

        if bytes_read != size {
            return Err(MemoryError::read_failed(
                address,
                format!(
                    "Partial read: expected {} bytes, read {} bytes",
                    size, bytes_read
                ),
            ));
        }

        Ok(buffer)
    }

    /// Read a typed value from memory
    pub fn read<T: Scalar>(&self, address: Address) -> MemoryResult<T> {
        let bytes = self.read_bytes(address, T::SIZE)?;
        T::from_ne_slice(&bytes)
            .ok_or_else(|| MemoryError::read_failed(address, "short value buffer"))
    }

    /// Read a value whose type is only known at run time
    pub fn read_value(
        &self,
        address: Address,
        scalar_type: ScalarType,
    ) -> MemoryResult<ScanValue> {
        match scalar_type {
            ScalarType::Int32 => self.read::<i32>(address).map(ScanValue::Int32),
            ScalarType::Float32 => self.read::<f32>(address).map(ScanValue::Float32),
            ScalarType::Float64 => self.read::<f64>(address).map(ScanValue::Float64),
        }
    }

    /// Read multiple values in a batch
    pub fn read_batch<T: Scalar>(&self, addresses: &[Address]) -> Vec<MemoryResult<T>> {
        addresses.iter().map(|&addr| self.read(addr)).collect()
    }
}
