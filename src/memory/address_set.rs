//! Result container for scans
//!
//! An [`AddressSet`] is the ordered list of remote addresses produced by an
//! initial scan and pruned in place by every refinement. The element type of
//! the scan is part of the set's type, so results of an `i32` scan can never
//! be refined as `f64`:
//!
//! ```compile_fail
//! use memscan::memory::{refine_double, AddressSet, SimulatedProcess};
//!
//! let process = SimulatedProcess::new();
//! let mut ints: AddressSet<i32> = AddressSet::new();
//! refine_double(&process, &mut ints, 1.0);
//! ```
//!
//! [`ScanResults`] erases the type for callers that only learn it at run
//! time and checks it on every use instead.

use crate::core::types::{Address, MemoryError, MemoryResult, Scalar, ScalarType, ScanValue};
use crate::memory::reader::MemoryReader;
use crate::memory::writer::MemoryWriter;
use crate::memory::RemoteMemory;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

/// Ordered, index-addressable remote addresses for one scalar type
#[derive(Clone, PartialEq, Eq)]
pub struct AddressSet<T: Scalar> {
    addresses: Vec<Address>,
    _scalar: PhantomData<T>,
}

impl<T: Scalar> AddressSet<T> {
    /// Capacity reserved by [`AddressSet::new`]
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Empty set with room for [`Self::DEFAULT_CAPACITY`] addresses
    pub fn new() -> Self {
        AddressSet {
            addresses: Vec::with_capacity(Self::DEFAULT_CAPACITY),
            _scalar: PhantomData,
        }
    }

    /// Empty set with room for at least `capacity` addresses (minimum one).
    ///
    /// Fails with `AllocationFailed` instead of aborting when the storage
    /// cannot be reserved.
    pub fn try_with_capacity(capacity: usize) -> MemoryResult<Self> {
        let capacity = capacity.max(1);
        let mut addresses = Vec::new();
        addresses
            .try_reserve_exact(capacity)
            .map_err(|_| MemoryError::AllocationFailed {
                size: capacity.saturating_mul(mem::size_of::<Address>()),
            })?;

        Ok(AddressSet {
            addresses,
            _scalar: PhantomData,
        })
    }

    /// Adds an address at the end. Amortised constant time.
    pub fn append(&mut self, address: Address) {
        self.addresses.push(address);
    }

    /// Removes the address at `index`, shifting later ones down by one.
    ///
    /// Returns `None` and leaves the set untouched when `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Option<Address> {
        (index < self.addresses.len()).then(|| self.addresses.remove(index))
    }

    /// Keeps only the addresses for which `keep` returns true, in order
    pub fn retain(&mut self, keep: impl FnMut(&Address) -> bool) {
        self.addresses.retain(keep);
    }

    /// Shrinks storage to the current length
    pub fn compact(&mut self) {
        self.addresses.shrink_to_fit();
    }

    /// Releases the set and its storage
    pub fn release(self) {}

    /// Number of addresses held
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Address at `index`, if in range
    pub fn get(&self, index: usize) -> Option<Address> {
        self.addresses.get(index).copied()
    }

    /// Addresses in ascending scan order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Address> + '_ {
        self.addresses.iter().copied()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.addresses
    }

    /// Scalar type the addresses were matched as
    pub fn scalar_type(&self) -> ScalarType {
        T::SCALAR_TYPE
    }
}

impl<T: Scalar> Default for AddressSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> fmt::Debug for AddressSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSet")
            .field("scalar_type", &T::SCALAR_TYPE)
            .field("addresses", &self.addresses)
            .finish()
    }
}

impl<T: Scalar> FromIterator<Address> for AddressSet<T> {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        let mut set = Self::new();
        set.addresses.extend(iter);
        set
    }
}

impl<'a, T: Scalar> IntoIterator for &'a AddressSet<T> {
    type Item = Address;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Address>>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter().copied()
    }
}

/// Creates an empty set with nonzero initial capacity
pub fn create_address_set<T: Scalar>() -> AddressSet<T> {
    AddressSet::new()
}

/// Releases a set and its storage
pub fn release_address_set<T: Scalar>(set: AddressSet<T>) {
    set.release();
}

/// Scan results whose scalar type is known only at run time
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResults {
    Int32(AddressSet<i32>),
    Float32(AddressSet<f32>),
    Float64(AddressSet<f64>),
}

impl ScanResults {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ScanResults::Int32(_) => ScalarType::Int32,
            ScanResults::Float32(_) => ScalarType::Float32,
            ScanResults::Float64(_) => ScalarType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn as_slice(&self) -> &[Address] {
        match self {
            ScanResults::Int32(set) => set.as_slice(),
            ScanResults::Float32(set) => set.as_slice(),
            ScanResults::Float64(set) => set.as_slice(),
        }
    }

    /// Current value behind every result, tagged with the results' scalar type
    pub fn read_values<M: RemoteMemory + ?Sized>(
        &self,
        memory: &M,
    ) -> MemoryResult<Vec<ScanValue>> {
        let reader = MemoryReader::new(memory);
        let scalar_type = self.scalar_type();
        self.as_slice()
            .iter()
            .map(|&address| reader.read_value(address, scalar_type))
            .collect()
    }

    /// Writes `value` to every result, stopping at the first failure.
    ///
    /// A value of another scalar type is rejected before anything is written.
    pub fn write_all<M: RemoteMemory + ?Sized>(
        &self,
        memory: &M,
        value: ScanValue,
    ) -> MemoryResult<()> {
        if value.scalar_type() != self.scalar_type() {
            return Err(MemoryError::type_mismatch(
                self.scalar_type(),
                value.scalar_type(),
            ));
        }

        let writer = MemoryWriter::new(memory);
        self.as_slice()
            .iter()
            .try_for_each(|&address| writer.write_value(address, value))
    }
}

impl From<AddressSet<i32>> for ScanResults {
    fn from(set: AddressSet<i32>) -> Self {
        ScanResults::Int32(set)
    }
}

impl From<AddressSet<f32>> for ScanResults {
    fn from(set: AddressSet<f32>) -> Self {
        ScanResults::Float32(set)
    }
}

impl From<AddressSet<f64>> for ScanResults {
    fn from(set: AddressSet<f64>) -> Self {
        ScanResults::Float64(set)
    }
}
