use logbook::{
    error::LogbookError,
    import::{ReferenceData, StationImport},
    persist::Logbook,
    qso::{ContactDraft, ContactFilter},
    reference::{Country, Prefix, PrefixDraft, Station, StationDraft},
    types::Continent,
};

fn country(id: u32, name: &str, continent: Continent) -> Country {
    Country {
        id,
        name: name.to_string(),
        capital: String::new(),
        continent,
    }
}

fn with_station() -> (Logbook, Prefix, Station) {
    let mut book = Logbook::open_in_memory().expect("open");
    book.create_country(country(291, "United States of America", Continent::NA))
        .expect("country");
    let prefix = book
        .create_prefix(PrefixDraft {
            prefix: "k".to_string(),
            country_id: 291,
        })
        .expect("prefix");
    let station = book
        .create_station(StationDraft {
            prefix_id: prefix.id,
            number: 1,
            suffix: "abc".to_string(),
        })
        .expect("station");
    (book, prefix, station)
}

fn contact(book: &mut Logbook, station_id: i64, mode_id: i64) -> i64 {
    book.create_contact(ContactDraft {
        station_id,
        mode_id,
        date: "2024-05-01T12:00:00Z".to_string(),
        frequency: 7.030,
        report_r: 5,
        report_s: 7,
        report_t: 9,
        aurora: false,
        qsl_received: false,
        qsl_sent: false,
        qsl_requested: false,
        comment: "first".to_string(),
    })
    .expect("contact")
    .id
}

#[test]
fn children_require_existing_parents() {
    let (mut book, prefix, _) = with_station();

    let err = book
        .create_prefix(PrefixDraft {
            prefix: "DL".to_string(),
            country_id: 230,
        })
        .expect_err("no country");
    assert!(matches!(err, LogbookError::ReferentialIntegrity(_)));

    let err = book
        .create_station(StationDraft {
            prefix_id: prefix.id + 100,
            number: 2,
            suffix: "XYZ".to_string(),
        })
        .expect_err("no prefix");
    assert!(matches!(err, LogbookError::ReferentialIntegrity(_)));

    let err = book
        .update_station(Station {
            id: 1,
            prefix_id: 77,
            number: 1,
            suffix: "ABC".to_string(),
        })
        .expect_err("no prefix");
    assert!(matches!(err, LogbookError::ReferentialIntegrity(_)));

    let err = book
        .update_prefix(Prefix {
            id: prefix.id,
            prefix: "K".to_string(),
            country_id: 1,
        })
        .expect_err("no country");
    assert!(matches!(err, LogbookError::ReferentialIntegrity(_)));
}

#[test]
fn referenced_rows_cannot_be_deleted() {
    let (mut book, prefix, station) = with_station();
    let mode = book.create_mode("CW").expect("mode");
    let id = contact(&mut book, station.id, mode.id);

    assert!(matches!(
        book.delete_mode(mode.id),
        Err(LogbookError::ReferentialIntegrity(_))
    ));
    assert!(matches!(
        book.delete_station(station.id),
        Err(LogbookError::ReferentialIntegrity(_))
    ));
    assert!(matches!(
        book.delete_prefix(prefix.id),
        Err(LogbookError::ReferentialIntegrity(_))
    ));
    assert!(matches!(
        book.delete_country(291),
        Err(LogbookError::ReferentialIntegrity(_))
    ));

    assert_eq!(book.get_mode(mode.id).expect("mode"), mode);
    assert_eq!(book.get_station(station.id).expect("station"), station);
    assert_eq!(book.get_contact(id).expect("contact").comment, "first");

    book.delete_contact(id).expect("delete contact");
    book.delete_mode(mode.id).expect("delete mode");
    book.delete_station(station.id).expect("delete station");
    book.delete_prefix(prefix.id).expect("delete prefix");
    book.delete_country(291).expect("delete country");
    assert!(book.list_countries().expect("list").is_empty());
}

#[test]
fn deleting_missing_rows_is_not_found() {
    let (mut book, _, _) = with_station();
    assert!(matches!(book.delete_mode(9), Err(LogbookError::NotFound { .. })));
    assert!(matches!(book.delete_station(9), Err(LogbookError::NotFound { .. })));
    assert!(matches!(book.delete_prefix(9), Err(LogbookError::NotFound { .. })));
    assert!(matches!(book.delete_country(9), Err(LogbookError::NotFound { .. })));
}

#[test]
fn station_resolves_from_callsign() {
    let (book, prefix, station) = with_station();

    assert_eq!(prefix.prefix, "K");
    assert_eq!(station.suffix, "ABC");
    assert_eq!(book.callsign_of(station.id).expect("call"), "K1ABC");
    assert_eq!(book.station_by_callsign("k1abc").expect("resolve"), station);
    assert!(matches!(
        book.station_by_callsign("K2ABC"),
        Err(LogbookError::NotFound { entity: "station", .. })
    ));
}

#[test]
fn suffix_with_leading_digit_is_rejected() {
    let (mut book, prefix, station) = with_station();
    let err = book
        .create_station(StationDraft {
            prefix_id: prefix.id,
            number: 1,
            suffix: "2abc".to_string(),
        })
        .expect_err("leading digit");
    assert!(matches!(err, LogbookError::Validation(_)));

    let err = book
        .update_station(Station {
            suffix: "9Z".to_string(),
            ..station.clone()
        })
        .expect_err("leading digit on update");
    assert!(matches!(err, LogbookError::Validation(_)));
    assert_eq!(book.get_station(station.id).expect("unchanged"), station);

    let inner = book
        .create_station(StationDraft {
            prefix_id: prefix.id,
            number: 5,
            suffix: "a2b".to_string(),
        })
        .expect("digit inside suffix");
    assert_eq!(book.callsign_of(inner.id).expect("call"), "K5A2B");
}

#[test]
fn colliding_callsigns_resolve_to_lowest_station_id() {
    let (mut book, k, _) = with_station();
    let k1 = book
        .create_prefix(PrefixDraft {
            prefix: "K1".to_string(),
            country_id: 291,
        })
        .expect("prefix");
    let first = book
        .create_station(StationDraft {
            prefix_id: k.id,
            number: 12,
            suffix: "ABC".to_string(),
        })
        .expect("K + 12 + ABC");
    let second = book
        .create_station(StationDraft {
            prefix_id: k1.id,
            number: 2,
            suffix: "ABC".to_string(),
        })
        .expect("K1 + 2 + ABC");
    assert!(first.id < second.id);
    assert_eq!(book.callsign_of(second.id).expect("call"), "K12ABC");
    assert_eq!(book.station_by_callsign("K12ABC").expect("resolve"), first);
}

#[test]
fn prefixes_are_listed_per_country() {
    let (mut book, _, _) = with_station();
    for p in ["W", "N", "AA"] {
        book.create_prefix(PrefixDraft {
            prefix: p.to_string(),
            country_id: 291,
        })
        .expect("prefix");
    }
    let listed: Vec<String> = book
        .prefixes_for_country(291)
        .expect("list")
        .into_iter()
        .map(|p| p.prefix)
        .collect();
    assert_eq!(listed, ["AA", "K", "N", "W"]);
    assert!(matches!(
        book.prefixes_for_country(1),
        Err(LogbookError::NotFound { .. })
    ));
}

#[test]
fn country_crud_and_duplicate_key() {
    let mut book = Logbook::open_in_memory().expect("open");
    book.create_country(country(230, "Germany", Continent::EU))
        .expect("create");

    let err = book
        .create_country(country(230, "Germany again", Continent::EU))
        .expect_err("duplicate key");
    assert!(matches!(err, LogbookError::Storage(_)));

    let updated = book
        .update_country(Country {
            capital: "Berlin".to_string(),
            ..country(230, "Federal Republic of Germany", Continent::EU)
        })
        .expect("update");
    assert_eq!(book.get_country(230).expect("get"), updated);
    assert!(matches!(
        book.update_country(country(1, "Nowhere", Continent::AN)),
        Err(LogbookError::NotFound { .. })
    ));
    assert!(matches!(
        book.create_country(country(2, "  ", Continent::AF)),
        Err(LogbookError::Validation(_))
    ));
}

#[test]
fn malformed_callsign_parts_are_rejected() {
    let (mut book, prefix, _) = with_station();
    for suffix in ["", "AB-C", "Ä"] {
        let err = book
            .create_station(StationDraft {
                prefix_id: prefix.id,
                number: 3,
                suffix: suffix.to_string(),
            })
            .expect_err("suffix");
        assert!(matches!(err, LogbookError::Validation(_)));
    }
    assert!(matches!(
        "XX".parse::<Continent>(),
        Err(LogbookError::Validation(_))
    ));
}

#[test]
fn mode_catalog_rename_and_lookup() {
    let mut book = Logbook::open_in_memory().expect("open");
    let mode = book.create_mode("PSK").expect("create");
    let renamed = book.rename_mode(mode.id, "PSK31").expect("rename");
    assert_eq!(book.get_mode(mode.id).expect("get"), renamed);
    assert_eq!(book.list_modes().expect("list"), vec![renamed]);
    assert!(matches!(book.get_mode(99), Err(LogbookError::NotFound { .. })));
    assert!(matches!(
        book.rename_mode(99, "X"),
        Err(LogbookError::NotFound { .. })
    ));
}

#[test]
fn import_loads_reference_data_atomically() {
    let mut book = Logbook::open_in_memory().expect("open");
    let data = ReferenceData::from_json_str(
        r#"{
            "countries": [
                {"id": 230, "name": "Germany", "capital": "Berlin", "continent": "EU"},
                {"id": 281, "name": "Spain", "capital": "Madrid", "continent": "EU"}
            ],
            "prefixes": [
                {"prefix": "DL", "country_id": 230},
                {"prefix": "EA", "country_id": 281}
            ],
            "stations": [
                {"prefix": "dl", "number": 1, "suffix": "ABC"},
                {"prefix": "EA", "number": 4, "suffix": "XY"}
            ],
            "modes": ["SSB", "CW", "FT8"]
        }"#,
    )
    .expect("parse");

    let summary = book.import_reference(&data).expect("import");
    assert_eq!(
        (summary.countries, summary.prefixes, summary.stations, summary.modes),
        (2, 2, 2, 3)
    );
    assert_eq!(
        book.callsign_of(book.station_by_callsign("EA4XY").expect("station").id)
            .expect("call"),
        "EA4XY"
    );

    let broken = ReferenceData {
        countries: vec![country(1, "Canada", Continent::NA)],
        stations: vec![StationImport {
            prefix: "VE".to_string(),
            number: 3,
            suffix: "AAA".to_string(),
        }],
        ..ReferenceData::default()
    };
    let err = book.import_reference(&broken).expect_err("unknown prefix");
    assert!(matches!(err, LogbookError::ReferentialIntegrity(_)));
    assert!(matches!(book.get_country(1), Err(LogbookError::NotFound { .. })));
    assert_eq!(book.list_countries().expect("list").len(), 2);
    assert!(book
        .list_contacts(&ContactFilter::default())
        .expect("list")
        .is_empty());
}
