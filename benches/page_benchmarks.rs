use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ecucore::calibration::{CalibrationChannel, SharedCalibration};
use ecucore::prelude::*;

fn benchmark_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("ConfigPage");
    let config = ConfigRecordSet::default();

    for page in PageId::ALL {
        let bytes = config.read_page(page);
        group.bench_with_input(BenchmarkId::new("read_page", page.index()), &page, |b, &page| {
            b.iter(|| black_box(config.read_page(black_box(page))));
        });

        group.bench_with_input(BenchmarkId::new("write_page", page.index()), &page, |b, &page| {
            let mut target = ConfigRecordSet::default();
            b.iter(|| target.write_page(black_box(page), black_box(&bytes)));
        });
    }

    group.bench_function("patch", |b| {
        let mut target = ConfigRecordSet::default();
        let data = [7u8; 16];
        b.iter(|| target.patch(PageId::Ignition, black_box(23), black_box(&data)).unwrap());
    });
    group.finish();
}

fn benchmark_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("ConfigImage");
    let image = ConfigRecordSet::default().to_image();

    group.bench_function("validate", |b| {
        b.iter(|| ConfigRecordSet::validate(black_box(&image)).unwrap());
    });

    group.bench_function("to_image", |b| {
        let config = ConfigRecordSet::default();
        b.iter(|| black_box(config.to_image()));
    });

    for burned in [false, true] {
        group.bench_with_input(BenchmarkId::new("burn_all", burned), &burned, |b, &burned| {
            let config = ConfigRecordSet::default();
            let mut store = ConfigStore::new(MemoryStorage::<1024>::new());
            if burned {
                store.burn_all(&config).unwrap();
            }
            b.iter(|| black_box(store.burn_all(black_box(&config)).unwrap()));
        });
    }
    group.finish();
}

fn benchmark_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("Calibration");
    let page = ConfigPage2::default();

    for channel in CalibrationChannel::ALL {
        let curve = channel.curve(&page);
        group.bench_with_input(
            BenchmarkId::new("build", format!("{channel:?}")),
            &curve,
            |b, curve| {
                b.iter(|| black_box(curve.build().unwrap()));
            },
        );
    }

    let table = CalibrationTable::build(page.clt_calibration.points()).unwrap();
    group.bench_function("lookup", |b| {
        b.iter(|| {
            for raw in (0..1024u16).step_by(7) {
                black_box(table.lookup(black_box(raw)));
            }
        });
    });

    let shared = SharedCalibration::new(table);
    group.bench_function("shared_lookup", |b| {
        b.iter(|| black_box(shared.lookup(black_box(600))));
    });
    group.finish();
}

fn benchmark_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("Status");
    let shared = InterruptShared::new();
    let mut live = LiveStatus::new(&shared);
    shared.set_rpm(3_500);
    live.map = 80;

    group.bench_function("snapshot", |b| {
        b.iter(|| black_box(live.snapshot()));
    });

    group.bench_function("to_frame", |b| {
        let snapshot = live.snapshot();
        b.iter(|| black_box(snapshot.to_frame()));
    });

    group.bench_function("squirt_set_clear", |b| {
        b.iter(|| {
            shared.squirt().set(black_box(SquirtBit::Scheduled));
            shared.squirt().clear(black_box(SquirtBit::Scheduled));
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_pages,
    benchmark_image,
    benchmark_calibration,
    benchmark_status
);
criterion_main!(benches);
