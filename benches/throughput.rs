use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use logbook::{
    persist::Logbook,
    qso::{ContactDraft, ContactFilter, ContactPatch},
    reference::{Country, PrefixDraft, StationDraft},
    types::{Continent, ModeId, StationId},
};

fn seeded() -> (Logbook, StationId, ModeId) {
    let mut book = Logbook::open_in_memory().expect("open");
    book.create_country(Country {
        id: 291,
        name: "United States of America".to_string(),
        capital: "Washington".to_string(),
        continent: Continent::NA,
    })
    .expect("country");
    let prefix = book
        .create_prefix(PrefixDraft {
            prefix: "W".to_string(),
            country_id: 291,
        })
        .expect("prefix");
    let station = book
        .create_station(StationDraft {
            prefix_id: prefix.id,
            number: 1,
            suffix: "AW".to_string(),
        })
        .expect("station");
    let mode = book.create_mode("CW").expect("mode");
    (book, station.id, mode.id)
}

fn draft(station_id: StationId, mode_id: ModeId, minute: u32) -> ContactDraft {
    ContactDraft {
        station_id,
        mode_id,
        date: format!("2024-05-01T{:02}:{:02}:00Z", (minute / 60) % 24, minute % 60),
        frequency: 14.050,
        report_r: 5,
        report_s: 9,
        report_t: 9,
        aurora: minute % 7 == 0,
        qsl_received: minute % 3 == 0,
        qsl_sent: false,
        qsl_requested: false,
        comment: String::new(),
    }
}

fn bench_creates(c: &mut Criterion) {
    c.bench_function("create_contact_1k", |b| {
        b.iter(|| {
            let (mut book, station, mode) = seeded();
            for i in 0..1_000u32 {
                let _ = book.create_contact(draft(station, mode, i)).expect("create");
            }
        });
    });
}

fn bench_updates(c: &mut Criterion) {
    c.bench_function("update_contact_1k", |b| {
        b.iter(|| {
            let (mut book, station, mode) = seeded();
            for i in 0..1_000u32 {
                let _ = book.create_contact(draft(station, mode, i)).expect("create");
            }
            for id in 1..=1_000i64 {
                let _ = book
                    .update_contact(
                        id,
                        ContactPatch {
                            qsl_sent: Some(true),
                            ..ContactPatch::default()
                        },
                    )
                    .expect("update");
            }
        });
    });
}

fn bench_filtered_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_contacts");
    let (mut book, station, mode) = seeded();
    for i in 0..10_000u32 {
        let _ = book.create_contact(draft(station, mode, i)).expect("create");
    }

    for n in [10usize, 100usize, 1000usize] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let _ = book.list_contacts(&ContactFilter {
                    qsl_received: Some(true),
                    limit: Some(n),
                    ..ContactFilter::default()
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_creates, bench_updates, bench_filtered_list);
criterion_main!(benches);
