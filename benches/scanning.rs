use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use memscan::memory::{refine_int, scan_double, scan_int, ProtectionFlags, SimulatedProcess};

const REGION_SIZE: usize = 1 << 20;
const REGIONS: usize = 8;

/// Eight 1 MiB writable regions, every 64th `i32` set to 1337
fn simulated_image() -> SimulatedProcess {
    let mut process = SimulatedProcess::new();
    for region in 0..REGIONS {
        let mut bytes = vec![0u8; REGION_SIZE];
        for offset in (0..REGION_SIZE).step_by(256) {
            bytes[offset..offset + 4].copy_from_slice(&1337i32.to_ne_bytes());
        }
        let protection = if region % 4 == 3 {
            ProtectionFlags::READ
        } else {
            ProtectionFlags::READ_WRITE
        };
        process.add_region(0x1000_0000 + region * 2 * REGION_SIZE, bytes, protection);
    }
    process
}

fn benchmark_initial_scan(c: &mut Criterion) {
    let process = simulated_image();

    c.bench_function("initial_scan_i32", |b| {
        b.iter(|| scan_int(&process, black_box(1337)).map(|set| set.len()))
    });

    c.bench_function("initial_scan_f64_no_match", |b| {
        b.iter(|| scan_double(&process, black_box(0.5)).map(|set| set.len()))
    });
}

fn benchmark_refinement(c: &mut Criterion) {
    let process = simulated_image();
    let results = match scan_int(&process, 1337) {
        Ok(results) => results,
        Err(err) => panic!("initial scan failed: {}", err),
    };

    c.bench_function("refine_i32", |b| {
        b.iter_batched(
            || results.clone(),
            |mut set| {
                refine_int(&process, &mut set, black_box(1337));
                set.len()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, benchmark_initial_scan, benchmark_refinement);
criterion_main!(benches);
