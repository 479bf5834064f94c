// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    appender::{self, RotationLimits},
    error::{Error, Result},
    LogFormat, LogOutputDest,
};
use std::collections::BTreeMap;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_core::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::Targets,
    fmt::{
        self as tracing_fmt,
        format::Writer,
        time::{FormatTime, SystemTime},
        FmtContext, FormatEvent, FormatFields,
    },
    registry::LookupSpan,
    Layer, Registry,
};

/// Environment variable overriding the logging targets, e.g. `donate_evm=debug,all`.
pub const LOG_ENV_VAR: &str = "DONATE_LOG";

const MAX_LOG_SIZE: usize = 20 * 1024 * 1024;
const MAX_UNCOMPRESSED_LOG_FILES: usize = 10;
const MAX_LOG_FILES: usize = 1000;
// Trace for every crate of ours
const ALL_DONATE_LOGS: &str = "all";
// Debug for every crate of ours
const VERBOSE_DONATE_LOGS: &str = "v";

const DONATE_CRATES: [&str; 3] = ["donate_cli", "donate_evm", "donate_logging"];

/// One line per event: `[time LEVEL module/span] message fields`.
#[derive(Default)]
pub(crate) struct LogFormatter;

impl<S, N> FormatEvent<S, N> for LogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = *event.metadata().level();
        let module = event.metadata().module_path().unwrap_or("<unknown module>");

        write!(writer, "[")?;
        SystemTime.format_time(&mut writer)?;
        write!(writer, " {level} {module}")?;
        ctx.visit_spans(|span| write!(writer, "/{}", span.name()))?;
        write!(writer, "] ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// The layers composed into the global subscriber, and the guard of any file writer.
#[derive(Default)]
pub(crate) struct TracingLayers {
    pub(crate) layers: Vec<Box<dyn Layer<Registry> + Send + Sync>>,
    pub(crate) log_appender_guard: Option<WorkerGuard>,
}

impl TracingLayers {
    pub(crate) fn fmt_layer(
        &mut self,
        default_logging_targets: Vec<(String, Level)>,
        output_dest: &LogOutputDest,
        format: LogFormat,
    ) -> Result<()> {
        let layer = match output_dest {
            LogOutputDest::Stdout => console_layer(format, std::io::stdout),
            LogOutputDest::Stderr => console_layer(format, std::io::stderr),
            LogOutputDest::Path(path) => {
                std::fs::create_dir_all(path)?;
                let (writer, guard) = appender::rotating_writer(
                    path,
                    RotationLimits {
                        max_bytes: MAX_LOG_SIZE,
                        uncompressed_files: MAX_UNCOMPRESSED_LOG_FILES,
                        max_files: MAX_LOG_FILES,
                    },
                );
                self.log_appender_guard = Some(guard);

                match format {
                    LogFormat::Json => tracing_fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_writer(writer)
                        .boxed(),
                    LogFormat::Default => tracing_fmt::layer()
                        .with_ansi(false)
                        .event_format(LogFormatter)
                        .with_writer(writer)
                        .boxed(),
                }
            }
        };

        let targets = match std::env::var(LOG_ENV_VAR) {
            Ok(value) => get_logging_targets(&value)?,
            Err(_) => default_logging_targets,
        };
        let layer = layer.with_filter(Targets::new().with_targets(targets));
        self.layers.push(Box::new(layer));
        Ok(())
    }
}

fn console_layer<W>(format: LogFormat, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> tracing_fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Default => tracing_fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .event_format(LogFormatter)
            .with_writer(writer)
            .boxed(),
    }
}

/// Parse a CSV of `crate=level` pairs, e.g. `alloy_transport_http=debug,all,donate_evm=warn`.
///
/// A crate without a level logs at trace. The `all` and `v` keywords set trace or debug for
/// every donation crate, unless that crate is given explicitly.
pub(crate) fn get_logging_targets(logging_value: &str) -> Result<Vec<(String, Level)>> {
    let mut targets = BTreeMap::new();
    let mut keyword_level = None;

    for crate_log_level in logging_value.split(',').map(str::trim) {
        match crate_log_level {
            "" => continue,
            ALL_DONATE_LOGS => {
                keyword_level = Some(Level::TRACE);
                continue;
            }
            VERBOSE_DONATE_LOGS => {
                keyword_level = keyword_level.or(Some(Level::DEBUG));
                continue;
            }
            _ => {}
        }

        let (crate_name, log_level) = crate_log_level
            .split_once('=')
            .unwrap_or((crate_log_level, "trace"));
        if crate_name.is_empty() {
            return Err(Error::LoggingConfiguration(format!(
                "Could not obtain crate name from {crate_log_level:?}"
            )));
        }
        let _ = targets.insert(crate_name.to_string(), get_log_level_from_str(log_level)?);
    }

    let mut resolved: BTreeMap<String, Level> = match keyword_level {
        Some(level) => DONATE_CRATES
            .iter()
            .map(|name| (name.to_string(), level))
            .collect(),
        None => BTreeMap::new(),
    };
    resolved.extend(targets);
    Ok(resolved.into_iter().collect())
}

fn get_log_level_from_str(log_level: &str) -> Result<Level> {
    match log_level.to_lowercase().as_str() {
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::LoggingConfiguration(format!(
            "Log level {log_level} is not supported"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::Result;

    fn targets(pairs: &[(&str, Level)]) -> Vec<(String, Level)> {
        pairs
            .iter()
            .map(|(name, level)| (name.to_string(), *level))
            .collect()
    }

    #[test]
    fn explicit_targets_are_parsed() -> Result<()> {
        assert_eq!(
            get_logging_targets("alloy_transport_http=DEBUG, donate_evm=warn,tokio")?,
            targets(&[
                ("alloy_transport_http", Level::DEBUG),
                ("donate_evm", Level::WARN),
                ("tokio", Level::TRACE),
            ])
        );
        Ok(())
    }

    #[test]
    fn keywords_cover_every_donation_crate() -> Result<()> {
        assert_eq!(
            get_logging_targets("all")?,
            targets(&[
                ("donate_cli", Level::TRACE),
                ("donate_evm", Level::TRACE),
                ("donate_logging", Level::TRACE),
            ])
        );
        assert_eq!(
            get_logging_targets("v")?,
            targets(&[
                ("donate_cli", Level::DEBUG),
                ("donate_evm", Level::DEBUG),
                ("donate_logging", Level::DEBUG),
            ])
        );
        Ok(())
    }

    #[test]
    fn explicit_targets_win_over_keywords() -> Result<()> {
        assert_eq!(
            get_logging_targets("donate_evm=error,all")?,
            targets(&[
                ("donate_cli", Level::TRACE),
                ("donate_evm", Level::ERROR),
                ("donate_logging", Level::TRACE),
            ])
        );
        Ok(())
    }

    #[test]
    fn unknown_levels_and_missing_names_are_rejected() {
        assert!(matches!(
            get_logging_targets("donate_evm=loud"),
            Err(Error::LoggingConfiguration(_))
        ));
        assert!(matches!(
            get_logging_targets("=info"),
            Err(Error::LoggingConfiguration(_))
        ));
    }
}
