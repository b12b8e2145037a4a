//! Initial and refinement scans against a simulated target

use memscan::config::{validate_config, Config, ConfigError, MAX_INITIAL_CAPACITY};
use memscan::core::types::{Address, MemoryError, ScalarType, ScanValue};
use memscan::memory::{
    create_address_set, refine_double, refine_float, refine_int, refine_value, release_address_set,
    scan_double, scan_float, scan_int, scan_value, ProtectionFlags, RegionState, RemoteMemory,
    ScanOptions, ScanResults, SimulatedProcess, ValueScanner,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn floats(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn doubles(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn addrs(values: &[usize]) -> Vec<Address> {
    values.iter().copied().map(Address::new).collect()
}

#[test]
fn test_scan_then_refine_scenario() {
    let base = 0x10_0000;
    let mut process = SimulatedProcess::new();
    process.add_region(base, ints(&[5, 7, 5, 9]), ProtectionFlags::READ_WRITE);

    let mut results = scan_int(&process, 5).unwrap();
    assert_eq!(results.as_slice(), addrs(&[base, base + 8]).as_slice());

    process.poke(base + 8, 3i32).unwrap();
    refine_int(&process, &mut results, 5);
    assert_eq!(results.as_slice(), addrs(&[base]).as_slice());

    release_address_set(results);
}

#[test]
fn test_scan_finds_only_scannable_matches() {
    let mut process = SimulatedProcess::new();
    // Scannable: 2 + 1 + 1 matches
    process
        .add_region(0x1000, ints(&[42, 0, 42]), ProtectionFlags::READ_WRITE)
        .add_region(0x2000, ints(&[42]), ProtectionFlags::EXECUTE_READ_WRITE)
        .add_region(0x3000, ints(&[1, 42]), ProtectionFlags::WRITE_COPY);
    // Not scannable
    process
        .add_region(0x4000, ints(&[42, 42]), ProtectionFlags::READ)
        .add_region(0x5000, ints(&[42]), ProtectionFlags::EXECUTE_READ)
        .add_region(
            0x6000,
            ints(&[42]),
            ProtectionFlags::READ_WRITE | ProtectionFlags::GUARD,
        )
        .add_region_with_state(
            0x7000,
            ints(&[42]),
            RegionState::Reserved,
            ProtectionFlags::READ_WRITE,
        );

    let results = scan_int(&process, 42).unwrap();
    assert_eq!(
        results.as_slice(),
        addrs(&[0x1000, 0x1008, 0x2000, 0x3004]).as_slice()
    );
}

#[test]
fn test_results_are_ascending_and_unique() {
    let mut process = SimulatedProcess::new();
    process
        .add_region(0x8000, ints(&[1, 1]), ProtectionFlags::READ_WRITE)
        .add_region(0x1000, ints(&[1, 2, 1]), ProtectionFlags::READ_WRITE);

    let results = scan_int(&process, 1).unwrap();
    let slice = results.as_slice();
    assert!(slice.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(slice.len(), 4);
}

#[test]
fn test_unreadable_region_is_skipped() {
    let mut process = SimulatedProcess::new();
    process
        .add_unbacked_region(0x1000, 0x100, ProtectionFlags::READ_WRITE)
        .add_region(0x2000, ints(&[8]), ProtectionFlags::READ_WRITE);

    let results = scan_int(&process, 8).unwrap();
    assert_eq!(results.as_slice(), addrs(&[0x2000]).as_slice());
}

#[test]
fn test_allocation_failure_aborts_scan() {
    let mut process = SimulatedProcess::new();
    process
        .add_region(0x1000, ints(&[8, 8]), ProtectionFlags::READ_WRITE)
        .add_unbacked_region(0x10_0000, isize::MAX as usize + 1, ProtectionFlags::READ_WRITE);

    let result = scan_int(&process, 8);
    match result {
        Err(MemoryError::AllocationFailed { size }) => assert_eq!(size, isize::MAX as usize + 1),
        other => panic!("expected AllocationFailed, got {:?}", other),
    }
}

#[test]
fn test_oversized_initial_capacity_aborts_scan() {
    let mut process = SimulatedProcess::new();
    process.add_region(0x1000, ints(&[5, 5]), ProtectionFlags::READ_WRITE);

    let mut config = Config::default();
    config.scanner.initial_capacity = usize::MAX / 4;
    assert!(matches!(validate_config(&config), Err(ConfigError::Invalid(_))));

    // Options built without validation still fail cleanly
    let options = ScanOptions::from(&config.scanner);
    let result = ValueScanner::with_options(&process, options).scan(5i32);
    assert!(matches!(result, Err(MemoryError::AllocationFailed { .. })));

    config.scanner.initial_capacity = MAX_INITIAL_CAPACITY;
    validate_config(&config).unwrap();
}

#[test]
fn test_deadline_aborts_scan() {
    let mut process = SimulatedProcess::new();
    process.add_region(0x1000, ints(&[8]), ProtectionFlags::READ_WRITE);

    let options = ScanOptions {
        deadline: Some(Duration::ZERO),
        ..ScanOptions::default()
    };
    let result = ValueScanner::with_options(&process, options).scan(8i32);
    assert!(matches!(result, Err(MemoryError::ScanTimedOut { .. })));

    // Without a deadline the same scan succeeds
    assert_eq!(scan_int(&process, 8).unwrap().len(), 1);
}

#[test]
fn test_empty_address_space() {
    let process = SimulatedProcess::new();
    assert!(scan_double(&process, 1.0).unwrap().is_empty());
}

#[test]
fn test_refine_drops_unreadable_addresses() {
    let mut process = SimulatedProcess::new();
    process
        .add_region(0x1000, ints(&[4, 4]), ProtectionFlags::READ_WRITE)
        .add_region(0x2000, ints(&[4]), ProtectionFlags::READ_WRITE);

    let mut results = scan_int(&process, 4).unwrap();
    assert_eq!(results.len(), 3);

    process.revoke_reads(0x1000);
    refine_int(&process, &mut results, 4);
    assert_eq!(results.as_slice(), addrs(&[0x2000]).as_slice());
}

#[test]
fn test_refine_is_idempotent_and_never_grows() {
    let mut process = SimulatedProcess::new();
    process.add_region(0x1000, ints(&[2, 3, 2, 2, 3]), ProtectionFlags::READ_WRITE);

    let mut results = scan_int(&process, 2).unwrap();
    let initial = results.len();

    // Only 0x1008 still holds 2 afterwards
    for offset in [0, 8, 12] {
        process.poke(0x1000 + offset, 3i32).unwrap();
    }
    process.poke(0x1000 + 8, 2i32).unwrap();

    refine_int(&process, &mut results, 2);
    let once = results.clone();
    refine_int(&process, &mut results, 2);

    assert!(once.len() <= initial);
    assert_eq!(results, once);
    assert_eq!(results.as_slice(), addrs(&[0x1008]).as_slice());
}

#[test]
fn test_refine_on_empty_set() {
    let process = SimulatedProcess::new();
    let mut results = create_address_set::<i32>();
    refine_int(&process, &mut results, 1);
    assert!(results.is_empty());
}

#[test]
fn test_float_scans_use_native_equality() {
    let mut process = SimulatedProcess::new();
    process.add_region(
        0x1000,
        floats(&[1.5, f32::NAN, -0.0, 1.5]),
        ProtectionFlags::READ_WRITE,
    );

    let mut results = scan_float(&process, 1.5).unwrap();
    assert_eq!(results.as_slice(), addrs(&[0x1000, 0x100C]).as_slice());

    assert!(scan_float(&process, f32::NAN).unwrap().is_empty());
    assert_eq!(
        scan_float(&process, 0.0).unwrap().as_slice(),
        addrs(&[0x1008]).as_slice()
    );

    process.poke(0x1000, 2.5f32).unwrap();
    refine_float(&process, &mut results, 1.5);
    assert_eq!(results.as_slice(), addrs(&[0x100C]).as_slice());
}

#[test]
fn test_double_scan_steps_by_eight_bytes() {
    let mut process = SimulatedProcess::new();
    let mut bytes = doubles(&[0.25, 7.0, 0.25]);
    bytes.extend_from_slice(&[0; 4]);
    process.add_region(0x1000, bytes, ProtectionFlags::READ_WRITE);

    let mut results = scan_double(&process, 0.25).unwrap();
    assert_eq!(results.as_slice(), addrs(&[0x1000, 0x1010]).as_slice());

    process.poke(0x1010, 0.5f64).unwrap();
    refine_double(&process, &mut results, 0.25);
    assert_eq!(results.as_slice(), addrs(&[0x1000]).as_slice());
}

#[test]
fn test_type_erased_results() {
    let mut process = SimulatedProcess::new();
    process.add_region(0x1000, doubles(&[9.0, 9.0]), ProtectionFlags::READ_WRITE);

    let mut results = scan_value(&process, ScanValue::Float64(9.0)).unwrap();
    assert_eq!(results.scalar_type(), ScalarType::Float64);
    assert_eq!(results.len(), 2);

    let err = refine_value(&process, &mut results, ScanValue::Int32(9)).unwrap_err();
    assert!(matches!(
        err,
        MemoryError::TypeMismatch {
            expected: ScalarType::Float64,
            actual: ScalarType::Int32,
        }
    ));
    assert_eq!(results.len(), 2);

    process.poke(0x1008, 1.0f64).unwrap();
    refine_value(&process, &mut results, ScanValue::Float64(9.0)).unwrap();
    match results {
        ScanResults::Float64(set) => assert_eq!(set.as_slice(), addrs(&[0x1000]).as_slice()),
        other => panic!("unexpected results {:?}", other),
    }
}

#[test]
fn test_type_erased_read_and_write() {
    let mut process = SimulatedProcess::new();
    process.add_region(0x1000, ints(&[4, 7, 4]), ProtectionFlags::READ_WRITE);

    let results = scan_value(&process, ScanValue::Int32(4)).unwrap();
    assert_eq!(
        results.read_values(&process).unwrap(),
        vec![ScanValue::Int32(4), ScanValue::Int32(4)]
    );

    let err = results.write_all(&process, ScanValue::Float32(1.0)).unwrap_err();
    assert!(matches!(err, MemoryError::TypeMismatch { .. }));
    assert_eq!(process.read_value::<i32>(Address::new(0x1000)).unwrap(), 4);

    results.write_all(&process, ScanValue::Int32(12)).unwrap();
    assert_eq!(
        results.read_values(&process).unwrap(),
        vec![ScanValue::Int32(12), ScanValue::Int32(12)]
    );
    assert_eq!(process.read_value::<i32>(Address::new(0x1004)).unwrap(), 7);
}
