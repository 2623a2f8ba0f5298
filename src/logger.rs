//! Tracing subscriber setup.

use std::fs::File;

use anyhow::Context;
use time::{
    format_description::{self, parse},
    OffsetDateTime,
};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, FmtSubscriber};

use crate::configuration::Configuration;

/// Install the global tracing subscriber described by `config`.
///
/// Logs go to stdout, or to a timestamped file in the working directory when `config.log` is set.
pub fn init_logger(config: &Configuration) -> anyhow::Result<()> {
    let (writer, ansi) = if config.log {
        let file_name = get_log_file_name()?;
        let file = File::create(&file_name)
            .with_context(|| format!("could not create log file '{file_name}'"))?;
        (BoxMakeWriter::new(file), false)
    } else {
        (BoxMakeWriter::new(std::io::stdout), true)
    };

    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local_offset,
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
            .context("invalid log time format")?,
    );

    let level = if config.verbose {
        Level::TRACE
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(ansi)
        .with_timer(timer)
        .with_thread_names(true)
        .with_writer(writer)
        .finish();

    set_global_default(subscriber).context(
        "could not set global default tracing subscriber, one is probably already installed",
    )
}

fn get_log_file_name() -> anyhow::Result<String> {
    let format = parse("[year]-[month]-[day]_[hour]:[minute]:[second]_log.txt")
        .context("invalid log file name format")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).context("could not format log file name")
}
