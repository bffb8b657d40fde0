use std::time::Duration;

use logbook::{
    error::LogbookError,
    persist::Logbook,
    qso::{ContactDraft, ContactFilter, ContactPatch},
    reference::{Country, PrefixDraft, StationDraft},
    runtime::{
        events::LogbookEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_logbook},
    },
    types::{Continent, ModeId, StationId},
};

fn seeded() -> (Logbook, StationId, ModeId) {
    let mut book = Logbook::open_in_memory().expect("open");
    book.create_country(Country {
        id: 150,
        name: "Australia".to_string(),
        capital: "Canberra".to_string(),
        continent: Continent::OC,
    })
    .expect("country");
    let prefix = book
        .create_prefix(PrefixDraft {
            prefix: "VK".to_string(),
            country_id: 150,
        })
        .expect("prefix");
    let station = book
        .create_station(StationDraft {
            prefix_id: prefix.id,
            number: 2,
            suffix: "IO".to_string(),
        })
        .expect("station");
    let mode = book.create_mode("CW").expect("mode");
    (book, station.id, mode.id)
}

fn draft(station_id: StationId, mode_id: ModeId) -> ContactDraft {
    ContactDraft {
        station_id,
        mode_id,
        date: "2024-05-01T12:00:00Z".to_string(),
        frequency: 14.025,
        report_r: 5,
        report_s: 9,
        report_t: 9,
        aurora: false,
        qsl_received: false,
        qsl_sent: false,
        qsl_requested: false,
        comment: String::new(),
    }
}

#[tokio::test]
async fn runtime_create_update_query_and_events_ordered() {
    let (book, station, mode) = seeded();
    let handle = spawn_logbook(book, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let created = handle.create_contact(draft(station, mode)).await.expect("create");
    handle
        .update_contact(
            created.id,
            ContactPatch {
                qsl_sent: Some(true),
                ..ContactPatch::default()
            },
        )
        .await
        .expect("update");

    let rec = handle.get_contact(created.id).await.expect("get");
    assert!(rec.qsl_sent);

    let mut seen = Vec::new();
    for _ in 0..2 {
        let evt = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("event")
            .expect("recv");
        seen.push(evt);
    }
    assert_eq!(seen[0], LogbookEvent::ContactCreated { id: created.id });
    assert_eq!(seen[1], LogbookEvent::ContactUpdated { id: created.id });

    handle.delete_contact(created.id).await.expect("delete");
    assert!(handle
        .list_contacts(ContactFilter::default())
        .await
        .expect("list")
        .is_empty());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejected_writes_surface_errors_without_events() {
    let (book, station, mode) = seeded();
    let handle = spawn_logbook(book, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let err = handle
        .create_contact(ContactDraft {
            report_r: 6,
            ..draft(station, mode)
        })
        .await
        .expect_err("invalid");
    assert!(matches!(err, RuntimeError::Logbook(LogbookError::Validation(_))));
    assert!(sub.try_recv().is_err());

    handle.shutdown().await.expect("shutdown");
    let err = handle
        .get_contact(1)
        .await
        .expect_err("worker stopped");
    assert!(matches!(err, RuntimeError::ChannelClosed));
}
