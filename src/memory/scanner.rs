//! Typed value scanning
//!
//! An initial scan reads every scannable region of the target whole and
//! records each aligned offset holding the target value. A refinement re-reads
//! only the recorded addresses and drops those that no longer match.
//!
//! Both are best-effort over a live process: a region that cannot be copied is
//! skipped, and an address that cannot be re-read is dropped as if it no
//! longer matched. Only a failed buffer allocation or an exceeded deadline
//! aborts a scan.

use crate::config::ScannerConfig;
use crate::core::types::{MemoryError, MemoryResult, Scalar, ScanValue};
use crate::memory::address_set::{AddressSet, ScanResults};
use crate::memory::reader::MemoryReader;
use crate::memory::regions::{scannable_regions, RegionInfo};
use crate::memory::RemoteMemory;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Options for value scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Addresses reserved up front in a new result set
    pub initial_capacity: usize,
    /// Abort an initial scan once this much time has passed, checked between regions
    pub deadline: Option<Duration>,
    /// Pause between polls of [`ScanSession::watch`](crate::memory::ScanSession::watch)
    pub monitor_interval: Duration,
    /// `watch` stops once a refinement leaves fewer results than this
    pub min_monitor_addresses: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions::from(&ScannerConfig::default())
    }
}

impl From<&ScannerConfig> for ScanOptions {
    fn from(config: &ScannerConfig) -> Self {
        ScanOptions {
            initial_capacity: config.initial_capacity,
            deadline: (config.scan_timeout_ms > 0)
                .then(|| Duration::from_millis(config.scan_timeout_ms)),
            monitor_interval: config.monitor_interval(),
            min_monitor_addresses: config.min_monitor_addresses,
        }
    }
}

/// Scanner for typed values in one target
pub struct ValueScanner<'a, M: RemoteMemory + ?Sized> {
    memory: &'a M,
    options: ScanOptions,
}

impl<'a, M: RemoteMemory + ?Sized> ValueScanner<'a, M> {
    /// Create a new scanner with default options
    pub fn new(memory: &'a M) -> Self {
        Self::with_options(memory, ScanOptions::default())
    }

    pub fn with_options(memory: &'a M, options: ScanOptions) -> Self {
        ValueScanner { memory, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Initial scan: every aligned address in a scannable region that holds `target`.
    ///
    /// Results are ascending and duplicate-free. On error no partial set is
    /// returned.
    pub fn scan<T: Scalar>(&self, target: T) -> MemoryResult<AddressSet<T>> {
        let started = Instant::now();
        let mut results = AddressSet::try_with_capacity(self.options.initial_capacity)?;
        let mut buffer = Vec::new();
        let mut regions_scanned = 0usize;
        let mut bytes_scanned = 0usize;

        for region in scannable_regions(self.memory) {
            self.check_deadline(started)?;

            let bytes_read = match self.copy_region(&region, &mut buffer)? {
                Some(bytes_read) => bytes_read,
                None => continue,
            };

            let base = region.base_address;
            for (index, chunk) in buffer[..bytes_read].chunks_exact(T::SIZE).enumerate() {
                if T::from_ne_slice(chunk) == Some(target) {
                    if let Some(address) = base.checked_add(index * T::SIZE) {
                        results.append(address);
                    }
                }
            }

            regions_scanned += 1;
            bytes_scanned += bytes_read;
        }

        results.compact();
        debug!(
            target: "memscan::scanner",
            scalar = %T::SCALAR_TYPE,
            value = %target,
            regions = regions_scanned,
            bytes = bytes_scanned,
            matches = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "initial scan complete"
        );
        Ok(results)
    }

    /// Refinement: keeps the addresses that still hold `target`, in order.
    ///
    /// Never adds addresses. One that can no longer be read is dropped.
    pub fn refine<T: Scalar>(&self, results: &mut AddressSet<T>, target: T) {
        let before = results.len();
        let reader = MemoryReader::new(self.memory);

        results.retain(|&address| match reader.read::<T>(address) {
            Ok(value) => value == target,
            Err(err) => {
                trace!(
                    target: "memscan::scanner",
                    %address,
                    error = %err,
                    "dropping unreadable address"
                );
                false
            }
        });

        debug!(
            target: "memscan::scanner",
            scalar = %T::SCALAR_TYPE,
            value = %target,
            before,
            after = results.len(),
            "refinement complete"
        );
    }

    /// Initial scan for a value whose type is chosen at run time
    pub fn scan_value(&self, target: ScanValue) -> MemoryResult<ScanResults> {
        Ok(match target {
            ScanValue::Int32(v) => self.scan(v)?.into(),
            ScanValue::Float32(v) => self.scan(v)?.into(),
            ScanValue::Float64(v) => self.scan(v)?.into(),
        })
    }

    /// Refinement for type-erased results.
    ///
    /// A target of another scalar type is rejected and the set is left untouched.
    pub fn refine_value(&self, results: &mut ScanResults, target: ScanValue) -> MemoryResult<()> {
        match (results, target) {
            (ScanResults::Int32(set), ScanValue::Int32(v)) => self.refine(set, v),
            (ScanResults::Float32(set), ScanValue::Float32(v)) => self.refine(set, v),
            (ScanResults::Float64(set), ScanValue::Float64(v)) => self.refine(set, v),
            (results, target) => {
                return Err(MemoryError::type_mismatch(
                    results.scalar_type(),
                    target.scalar_type(),
                ))
            }
        }
        Ok(())
    }

    fn check_deadline(&self, started: Instant) -> MemoryResult<()> {
        let deadline = match self.options.deadline {
            Some(deadline) => deadline,
            None => return Ok(()),
        };

        let elapsed = started.elapsed();
        if elapsed >= deadline {
            warn!(
                target: "memscan::scanner",
                elapsed_ms = elapsed.as_millis() as u64,
                "scan deadline exceeded"
            );
            return Err(MemoryError::ScanTimedOut {
                elapsed_ms: elapsed.as_millis(),
            });
        }
        Ok(())
    }

    /// Copies one region into `buffer`, reusing its storage.
    ///
    /// Returns the number of bytes copied, or `None` when the region could not
    /// be read and should be skipped.
    fn copy_region(
        &self,
        region: &RegionInfo,
        buffer: &mut Vec<u8>,
    ) -> MemoryResult<Option<usize>> {
        buffer.clear();
        if buffer.try_reserve_exact(region.size).is_err() {
            warn!(
                target: "memscan::scanner",
                base = %region.base_address,
                size = region.size,
                "cannot allocate scan buffer"
            );
            return Err(MemoryError::AllocationFailed { size: region.size });
        }
        buffer.resize(region.size, 0);

        match self.memory.read_memory(region.base_address, buffer) {
            Ok(bytes_read) => Ok(Some(bytes_read.min(region.size))),
            Err(err) => {
                trace!(
                    target: "memscan::scanner",
                    base = %region.base_address,
                    size = region.size,
                    error = %err,
                    "skipping unreadable region"
                );
                Ok(None)
            }
        }
    }
}

/// Initial scan for an `i32`
pub fn scan_int<M: RemoteMemory + ?Sized>(
    memory: &M,
    target: i32,
) -> MemoryResult<AddressSet<i32>> {
    ValueScanner::new(memory).scan(target)
}

/// Initial scan for an `f32`
pub fn scan_float<M: RemoteMemory + ?Sized>(
    memory: &M,
    target: f32,
) -> MemoryResult<AddressSet<f32>> {
    ValueScanner::new(memory).scan(target)
}

/// Initial scan for an `f64`
pub fn scan_double<M: RemoteMemory + ?Sized>(
    memory: &M,
    target: f64,
) -> MemoryResult<AddressSet<f64>> {
    ValueScanner::new(memory).scan(target)
}

/// Refinement of `i32` results
pub fn refine_int<M: RemoteMemory + ?Sized>(
    memory: &M,
    results: &mut AddressSet<i32>,
    target: i32,
) {
    ValueScanner::new(memory).refine(results, target)
}

/// Refinement of `f32` results
pub fn refine_float<M: RemoteMemory + ?Sized>(
    memory: &M,
    results: &mut AddressSet<f32>,
    target: f32,
) {
    ValueScanner::new(memory).refine(results, target)
}

/// Refinement of `f64` results
pub fn refine_double<M: RemoteMemory + ?Sized>(
    memory: &M,
    results: &mut AddressSet<f64>,
    target: f64,
) {
    ValueScanner::new(memory).refine(results, target)
}

/// Initial scan for a run-time typed value
pub fn scan_value<M: RemoteMemory + ?Sized>(
    memory: &M,
    target: ScanValue,
) -> MemoryResult<ScanResults> {
    ValueScanner::new(memory).scan_value(target)
}

/// Refinement for run-time typed results
pub fn refine_value<M: RemoteMemory + ?Sized>(
    memory: &M,
    results: &mut ScanResults,
    target: ScanValue,
) -> MemoryResult<()> {
    ValueScanner::new(memory).refine_value(results, target)
}
