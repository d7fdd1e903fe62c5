// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_debounce::Debouncer;

fn bench_bursts(c: &mut Criterion) {
    let mut group = c.benchmark_group("debounce/burst");

    // One key per sticky element, each hammered by a scroll burst.
    for keys in [1_u32, 16, 256] {
        let events = 64_u64;
        group.throughput(Throughput::Elements(u64::from(keys) * events));
        group.bench_with_input(BenchmarkId::from_parameter(keys), &keys, |b, &keys| {
            b.iter_batched(
                Debouncer::<u32, u64>::new,
                |mut queue| {
                    for t in 0..events {
                        for key in 0..keys {
                            queue.schedule(key, t, 16, t);
                        }
                    }
                    black_box(queue.take_due(events + 16));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bursts);
criterion_main!(benches);
