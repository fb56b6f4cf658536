// src/logging.rs

//! Logging setup for `pkglaunch` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `PKGLAUNCH_LOG`, any `EnvFilter` directive (e.g. `debug`,
//!    `pkglaunch::exec=trace`)
//! 3. `info`
//!
//! Each event is one line on STDERR: the message, then every field as
//! `\t<key>=<value>`. Children inherit the launcher's stdout untouched.

use std::fmt::{self, Write as _};

use anyhow::Result;
use tracing::Subscriber;
use tracing::field::Field;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::{Writer, debug_fn};
use tracing_subscriber::layer::Layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Registry, fmt as tracing_fmt};

use crate::cli::LogLevel;

/// Environment variable holding the fallback filter directive.
pub const LOG_ENV: &str = "PKGLAUNCH_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(cli_level, env.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log filter {directive:?}: {e}"))?;

    tracing_subscriber::registry()
        .with(trace_layer::<Registry, _>(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;

    Ok(())
}

/// Pick the filter directive. An unparsable `PKGLAUNCH_LOG` is ignored.
pub fn filter_directive(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_directive(level).to_string();
    }

    match env.map(str::trim) {
        Some(directive) if !directive.is_empty() && EnvFilter::try_new(directive).is_ok() => {
            directive.to_string()
        }
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// The formatting layer: no target, no ANSI, fields as `\t<key>=<value>`.
pub fn trace_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .fmt_fields(debug_fn(write_trace_field))
        .with_writer(writer)
}

fn write_trace_field(
    writer: &mut Writer<'_>,
    field: &Field,
    value: &dyn fmt::Debug,
) -> fmt::Result {
    if field.name() == "message" {
        write!(writer, "{value:?}")
    } else {
        write!(writer, "\t{}={value:?}", field.name())
    }
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
