use std::{
    fs::File,
    io::{self, IsTerminal},
    path::Path,
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// ANSI color for a level label.
fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// Writes `text` wrapped in `color` when the writer supports ANSI escapes.
fn paint(
    writer: &mut Writer<'_>,
    color: &str,
    text: impl std::fmt::Display,
) -> std::fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{color}{text}{RESET} ")
    } else {
        write!(writer, "{text} ")
    }
}

/// One line per event: local time, level, calculator module, then fields.
///
/// `skatt_core::calculations::dividend` is shortened to `dividend` so the
/// calculator that logged stays readable next to the figures.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        paint(&mut writer, DIM, Local::now().format(TIMESTAMP_FORMAT))?;
        paint(
            &mut writer,
            level_color(*meta.level()),
            format_args!("{:>5}", meta.level()),
        )?;
        if let Some(module) = meta.module_path() {
            paint(&mut writer, CYAN, short_module(module))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Last segment of a module path.
fn short_module(module: &str) -> &str {
    module.rsplit("::").next().unwrap_or(module)
}

/// Picks the filter: an explicit directive, then `RUST_LOG`, then `info`.
fn make_filter(directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter '{directive}'")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when piped. Reports
///   go to stdout, so piping a report never captures log lines.
/// - File: appended to when `log_file` is given.
/// - Level: `directive` if given, else `RUST_LOG`, else `info`.
pub fn init_logging(
    directive: Option<&str>,
    log_file: Option<&Path>,
) -> Result<()> {
    let filter = make_filter(directive)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LocalFmt)
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_directive_is_accepted() {
        assert!(make_filter(Some("skatt_core=debug,info")).is_ok());
    }

    #[test]
    fn module_path_is_shortened_to_last_segment() {
        assert_eq!(short_module("skatt_core::calculations::dividend"), "dividend");
        assert_eq!(short_module("skatt"), "skatt");
    }

    #[test]
    fn every_level_has_its_own_color() {
        let colors = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE]
            .map(level_color);

        for (i, color) in colors.iter().enumerate() {
            assert!(!colors[i + 1..].contains(color), "duplicate color {color:?}");
        }
    }

    #[test]
    fn invalid_directive_is_rejected() {
        let err = make_filter(Some("skatt_core=loud")).expect_err("invalid level");

        assert!(err.to_string().contains("invalid log filter"));
    }
}
