//! Global logger setup on top of `env_logger`.

use std::{fs::OpenOptions, io::Write, path::Path};

use chrono::Local;
use log::LevelFilter;

use crate::error::{LogbookError, LogbookResult};

/// Maps a `-v` style count to a level filter.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Installs the global logger.
///
/// Lines look like `2024-05-01 12:00:00,123 INFO message`. `RUST_LOG`
/// overrides the level derived from `verbosity`. Appends to `log_file`
/// when given, otherwise writes to stderr.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> LogbookResult<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for_verbosity(verbosity))
        .parse_env(env_logger::Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        });

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|err| LogbookError::Io(std::io::Error::other(err)))?;
    log::info!("logging initialised at {}", level_for_verbosity(verbosity));
    Ok(())
}
