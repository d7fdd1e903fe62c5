// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_sticky::geometry::classify;
use understory_sticky::host::Geometry;
use understory_sticky::{StickyConfig, StickyController};

/// Element `n` has its sentinels at `n * 1000` and `n * 1000 + 800`; the
/// layer is always 100px tall.
struct Column {
    scroll: Cell<f64>,
}

impl Geometry<u32> for Column {
    fn bounding_box(&self, element: &u32) -> Rect {
        let base = f64::from(element / 3) * 1000.0 - self.scroll.get();
        match element % 3 {
            0 => Rect::new(0.0, base, 300.0, base),
            1 => Rect::new(0.0, base, 300.0, base + 100.0),
            _ => Rect::new(0.0, base + 800.0, 300.0, base + 800.0),
        }
    }

    fn viewport_height(&self) -> f64 {
        600.0
    }
}

fn bench_classify(c: &mut Criterion) {
    let rects: Vec<Rect> = (0..1024)
        .map(|i| {
            let y = f64::from(i) - 512.0;
            Rect::new(0.0, y, 10.0, y + 4.0)
        })
        .collect();
    c.bench_function("sticky/classify_1024", |b| {
        b.iter(|| {
            for rect in &rects {
                black_box(classify(*rect, 20.0, 300.0, 600.0));
            }
        });
    });
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("sticky/refresh");

    for count in [1_u32, 32, 512] {
        let column = Rc::new(Column {
            scroll: Cell::new(0.0),
        });
        let mut controllers: Vec<_> = (0..count)
            .map(|n| {
                let mut controller = StickyController::new(
                    StickyConfig::default().with_bottom(Some(0.0)),
                    column.clone(),
                );
                controller.register_top_trigger(n * 3);
                controller.setup_element(n * 3 + 1);
                controller.register_bottom_trigger(n * 3 + 2);
                controller
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut scroll = 0.0;
            b.iter(|| {
                scroll = (scroll + 37.0) % (f64::from(count) * 1000.0);
                column.scroll.set(scroll);
                for controller in &mut controllers {
                    controller.refresh();
                }
                black_box(controllers[0].mode());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_refresh);
criterion_main!(benches);
