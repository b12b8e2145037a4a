//! Scan sessions over one target
//!
//! A [`ScanSession`] pairs a borrowed target with the result set of one
//! initial scan. It narrows the set with further scans, reads and writes the
//! values behind the results, and can poll them until a caller-supplied
//! callback has seen enough.

use crate::core::types::{MemoryError, MemoryResult, Scalar};
use crate::memory::address_set::AddressSet;
use crate::memory::reader::MemoryReader;
use crate::memory::scanner::{ScanOptions, ValueScanner};
use crate::memory::writer::MemoryWriter;
use crate::memory::RemoteMemory;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// What [`ScanSession::monitor`] does after reporting a change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorAction<T> {
    /// Keep polling
    Continue,
    /// Refine the results against this value, then keep polling
    Refine(T),
    /// Stop polling
    Stop,
}

/// Occurrence count of each distinct value.
///
/// Values are bucketed by bit pattern, so two NaNs with the same payload share
/// a bucket while `0.0` and `-0.0` do not.
#[derive(Debug, Clone)]
pub struct ValueHistogram<T: Scalar> {
    counts: BTreeMap<u64, (T, usize)>,
}

impl<T: Scalar> ValueHistogram<T> {
    pub fn from_values(values: &[T]) -> Self {
        let mut counts = BTreeMap::new();
        for &value in values {
            counts.entry(value.to_bits_u64()).or_insert((value, 0)).1 += 1;
        }
        ValueHistogram { counts }
    }

    /// Times `value` was seen
    pub fn count(&self, value: T) -> usize {
        self.counts
            .get(&value.to_bits_u64())
            .map_or(0, |&(_, count)| count)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of values counted
    pub fn total(&self) -> usize {
        self.counts.values().map(|&(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, usize)> + '_ {
        self.counts.values().copied()
    }

    /// The value seen most often
    pub fn most_common(&self) -> Option<(T, usize)> {
        self.iter().max_by_key(|&(_, count)| count)
    }
}

impl<T: Scalar> PartialEq for ValueHistogram<T> {
    fn eq(&self, other: &Self) -> bool {
        self.counts.len() == other.counts.len()
            && self
                .counts
                .iter()
                .zip(other.counts.iter())
                .all(|((a, (_, ca)), (b, (_, cb)))| a == b && ca == cb)
    }
}

/// Results of one initial scan, bound to the target they came from
pub struct ScanSession<'h, M: RemoteMemory + ?Sized, T: Scalar> {
    memory: &'h M,
    results: AddressSet<T>,
    options: ScanOptions,
}

impl<'h, M: RemoteMemory + ?Sized, T: Scalar> ScanSession<'h, M, T> {
    /// Runs an initial scan for `target`
    pub fn new_scan(memory: &'h M, target: T, options: ScanOptions) -> MemoryResult<Self> {
        let results = ValueScanner::with_options(memory, options.clone()).scan(target)?;
        info!(
            target: "memscan::session",
            scalar = %T::SCALAR_TYPE,
            matches = results.len(),
            "new scan"
        );
        Ok(ScanSession {
            memory,
            results,
            options,
        })
    }

    /// Resumes from results of an earlier scan of the same target
    pub fn from_results(memory: &'h M, results: AddressSet<T>) -> Self {
        ScanSession {
            memory,
            results,
            options: ScanOptions::default(),
        }
    }

    /// Narrows the results to addresses now holding `target`; returns how many remain
    pub fn next_scan(&mut self, target: T) -> usize {
        ValueScanner::with_options(self.memory, self.options.clone())
            .refine(&mut self.results, target);
        self.results.len()
    }

    /// Options the session scans and watches with
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn results(&self) -> &AddressSet<T> {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result addresses as `0x…` lowercase hex strings
    pub fn address_list(&self) -> Vec<String> {
        self.results.iter().map(|address| address.to_hex_string()).collect()
    }

    /// Current value behind the result at `index`
    pub fn read_value(&self, index: usize) -> MemoryResult<T> {
        let address = self.address_at(index)?;
        MemoryReader::new(self.memory).read(address)
    }

    /// Current values behind every result, in order. Fails on the first unreadable one.
    pub fn read_all(&self) -> MemoryResult<Vec<T>> {
        MemoryReader::new(self.memory)
            .read_batch(self.results.as_slice())
            .into_iter()
            .collect()
    }

    /// Writes `value` to the result at `index`
    pub fn write_value(&self, index: usize, value: T) -> MemoryResult<()> {
        let address = self.address_at(index)?;
        MemoryWriter::new(self.memory).write(address, value)
    }

    /// Writes `value` to every result, stopping at the first failure
    pub fn write_all(&self, value: T) -> MemoryResult<()> {
        MemoryWriter::new(self.memory).write_all(self.results.as_slice(), value)
    }

    /// Polls the results every `interval` until told to stop.
    ///
    /// See [`ScanSession::monitor_with`].
    pub fn monitor<F>(
        &mut self,
        on_change: F,
        min_addresses: usize,
        interval: Duration,
    ) -> MemoryResult<()>
    where
        F: FnMut(&[T], &ValueHistogram<T>) -> MonitorAction<T>,
    {
        self.monitor_with(on_change, min_addresses, interval, std::thread::sleep)
    }

    /// [`ScanSession::monitor`] with the interval and minimum from the session's options
    pub fn watch<F>(&mut self, on_change: F) -> MemoryResult<()>
    where
        F: FnMut(&[T], &ValueHistogram<T>) -> MonitorAction<T>,
    {
        self.watch_with(on_change, std::thread::sleep)
    }

    /// [`ScanSession::watch`] with a caller-supplied `sleep`
    pub fn watch_with<F, S>(&mut self, on_change: F, sleep: S) -> MemoryResult<()>
    where
        F: FnMut(&[T], &ValueHistogram<T>) -> MonitorAction<T>,
        S: FnMut(Duration),
    {
        let min_addresses = self.options.min_monitor_addresses;
        let interval = self.options.monitor_interval;
        self.monitor_with(on_change, min_addresses, interval, sleep)
    }

    /// Polls the results, calling `sleep(interval)` between polls.
    ///
    /// The first poll only records a baseline histogram. Each later poll whose
    /// histogram differs from the last recorded one calls `on_change` with the
    /// values and their histogram. After a [`MonitorAction::Refine`] the loop
    /// ends once fewer than `min_addresses` results remain. Returns at once if
    /// there is nothing to watch; any read failure ends the loop with an error.
    pub fn monitor_with<F, S>(
        &mut self,
        mut on_change: F,
        min_addresses: usize,
        interval: Duration,
        mut sleep: S,
    ) -> MemoryResult<()>
    where
        F: FnMut(&[T], &ValueHistogram<T>) -> MonitorAction<T>,
        S: FnMut(Duration),
    {
        let mut previous: Option<ValueHistogram<T>> = None;

        while !self.results.is_empty() {
            let values = self.read_all()?;
            let histogram = ValueHistogram::from_values(&values);

            match previous {
                Some(ref last) if *last == histogram => {}
                Some(_) => {
                    debug!(
                        target: "memscan::session",
                        distinct = histogram.len(),
                        most_common = ?histogram.most_common(),
                        "monitored values changed"
                    );
                    match on_change(&values, &histogram) {
                        MonitorAction::Continue => {}
                        MonitorAction::Refine(target) => {
                            let remaining = self.next_scan(target);
                            if remaining < min_addresses {
                                info!(
                                    target: "memscan::session",
                                    remaining,
                                    min_addresses,
                                    "monitor finished"
                                );
                                return Ok(());
                            }
                        }
                        MonitorAction::Stop => return Ok(()),
                    }
                    previous = Some(histogram);
                }
                None => previous = Some(histogram),
            }

            sleep(interval);
        }

        Ok(())
    }

    /// Ends the session, keeping the results
    pub fn into_results(self) -> AddressSet<T> {
        self.results
    }

    /// Ends the session and drops the results
    pub fn release(self) {
        self.results.release();
    }

    fn address_at(&self, index: usize) -> MemoryResult<crate::core::types::Address> {
        self.results
            .get(index)
            .ok_or_else(|| MemoryError::index_out_of_bounds(index, self.results.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts() {
        let histogram = ValueHistogram::from_values(&[5, 7, 5, 9, 5]);
        assert_eq!(histogram.count(5), 3);
        assert_eq!(histogram.count(7), 1);
        assert_eq!(histogram.count(8), 0);
        assert_eq!(histogram.len(), 3);
        assert_eq!(histogram.total(), 5);
        assert_eq!(histogram.most_common(), Some((5, 3)));
    }

    #[test]
    fn test_histogram_equality_ignores_order() {
        let a = ValueHistogram::from_values(&[1.5f32, 2.5, 1.5]);
        let b = ValueHistogram::from_values(&[2.5f32, 1.5, 1.5]);
        let c = ValueHistogram::from_values(&[2.5f32, 2.5, 1.5]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_histogram_nan_is_stable() {
        let a = ValueHistogram::from_values(&[f64::NAN, 1.0]);
        let b = ValueHistogram::from_values(&[f64::NAN, 1.0]);
        assert_eq!(a, b);
        assert!(ValueHistogram::<f64>::from_values(&[]).is_empty());
    }
}
