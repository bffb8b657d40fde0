//! Single-operator amateur-radio contact log on SQLite.
//!
//! Reference data (countries, prefixes, stations, modes) is created first;
//! contacts then refer to a station and a mode and pass through the
//! validation engine in the same transaction that stores them.
//!
//! # Examples
//!
//! ```
//! use logbook::{
//!     persist::Logbook,
//!     qso::ContactDraft,
//!     reference::{Country, PrefixDraft, StationDraft},
//!     types::Continent,
//! };
//!
//! let mut book = Logbook::open_in_memory().expect("open");
//! book.create_country(Country {
//!     id: 230,
//!     name: "Federal Republic of Germany".to_string(),
//!     capital: "Berlin".to_string(),
//!     continent: Continent::EU,
//! }).expect("country");
//! let prefix = book.create_prefix(PrefixDraft { prefix: "DL".to_string(), country_id: 230 })
//!     .expect("prefix");
//! let station = book.create_station(StationDraft { prefix_id: prefix.id, number: 1, suffix: "ABC".to_string() })
//!     .expect("station");
//! let mode = book.create_mode("FT8").expect("mode");
//!
//! let contact = book.create_contact(ContactDraft {
//!     station_id: station.id,
//!     mode_id: mode.id,
//!     date: "2024-05-01T12:00:00Z".to_string(),
//!     frequency: 14.074,
//!     report_r: 5,
//!     report_s: 9,
//!     report_t: 9,
//!     aurora: true,
//!     qsl_received: false,
//!     qsl_sent: false,
//!     qsl_requested: false,
//!     comment: String::new(),
//! }).expect("contact");
//! assert_eq!(contact.report_t, -1);
//! assert_eq!(book.callsign_of(station.id).expect("call"), "DL1ABC");
//! ```
//!
//! Async usage through the single-writer runtime:
//! ```no_run
//! use logbook::{
//!     persist::Logbook,
//!     qso::ContactFilter,
//!     runtime::handle::{spawn_logbook, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let book = Logbook::open("logbook.db").expect("open sqlite");
//! let handle = spawn_logbook(book, RuntimeConfig::default());
//! let all = handle.list_contacts(ContactFilter::default()).await.expect("list");
//! println!("{} contacts", all.len());
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Runtime configuration.
pub mod config;
/// Contact validation engine.
pub mod core;
/// Error kinds.
pub mod error;
/// Reference-data import step.
pub mod import;
/// Logger setup.
pub mod logging;
/// SQLite schema and repositories.
pub mod persist;
/// Location-daemon status probe.
pub mod probe;
/// Contact records, patches and filters.
pub mod qso;
/// Country, prefix, station and mode records.
pub mod reference;
/// Single-writer async handle and events.
pub mod runtime;
/// Shared identifiers and enums.
pub mod types;
