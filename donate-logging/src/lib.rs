// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod appender;
mod error;
mod layers;

use crate::error::Result;
use layers::TracingLayers;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt};

pub use error::Error;
pub use layers::LOG_ENV_VAR;
pub use tracing_appender::non_blocking::WorkerGuard;

// re-exporting the tracing crate's Level as it is used in our public API
pub use tracing_core::Level;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutputDest {
    Stderr,
    Stdout,
    Path(PathBuf),
}

impl LogOutputDest {
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "stdout" => Ok(LogOutputDest::Stdout),
            "stderr" => Ok(LogOutputDest::Stderr),
            "data-dir" => {
                let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
                let dir = dirs_next::data_dir().ok_or_else(|| {
                    Error::LoggingConfiguration("could not obtain data directory path".to_string())
                })?;
                Ok(LogOutputDest::Path(
                    dir.join("donate")
                        .join("logs")
                        .join(format!("log_{timestamp}")),
                ))
            }
            // A directory that need not exist yet; it is created when logging starts.
            value => Ok(LogOutputDest::Path(PathBuf::from(value))),
        }
    }
}

impl std::fmt::Display for LogOutputDest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogOutputDest::Stderr => write!(f, "stderr"),
            LogOutputDest::Stdout => write!(f, "stdout"),
            LogOutputDest::Path(p) => write!(f, "{}", p.to_string_lossy()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Default,
    Json,
}

impl LogFormat {
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            _ => Err(Error::LoggingConfiguration(
                "The only valid values for this argument are \"default\" or \"json\"".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Default => "default",
            LogFormat::Json => "json",
        }
    }
}

pub struct LogBuilder {
    default_logging_targets: Vec<(String, Level)>,
    output_dest: LogOutputDest,
    format: LogFormat,
}

impl LogBuilder {
    /// Create a new builder.
    /// The default targets are used when the `DONATE_LOG` env variable is not set.
    ///
    /// Logs go to stderr in the default format unless told otherwise, keeping stdout for
    /// command output.
    pub fn new(default_logging_targets: Vec<(String, Level)>) -> Self {
        Self {
            default_logging_targets,
            output_dest: LogOutputDest::Stderr,
            format: LogFormat::Default,
        }
    }

    pub fn output_dest(&mut self, output_dest: LogOutputDest) {
        self.output_dest = output_dest;
    }

    pub fn format(&mut self, format: LogFormat) {
        self.format = format
    }

    /// Installs the global subscriber, returning the file writer's guard if there is one.
    /// The guard should be held for the life of the program.
    ///
    /// Logging should be instantiated only once.
    pub fn initialize(self) -> Result<Option<WorkerGuard>> {
        let mut layers = TracingLayers::default();
        layers.fmt_layer(self.default_logging_targets, &self.output_dest, self.format)?;

        if tracing_subscriber::registry()
            .with(layers.layers)
            .try_init()
            .is_err()
        {
            eprintln!("Tried to initialize and set global default subscriber more than once");
        }

        Ok(layers.log_appender_guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LogFormatter;
    use color_eyre::Result;
    use tracing::{debug, info, Level};
    use tracing_subscriber::{filter::Targets, fmt as tracing_fmt, layer::SubscriberExt, Layer};
    use tracing_test::internal::{global_buf, MockWriter};

    #[test]
    fn output_destinations_are_parsed() -> Result<()> {
        assert_eq!(LogOutputDest::parse_from_str("stdout")?, LogOutputDest::Stdout);
        assert_eq!(LogOutputDest::parse_from_str("stderr")?, LogOutputDest::Stderr);
        assert_eq!(
            LogOutputDest::parse_from_str("/tmp/donate-logs")?,
            LogOutputDest::Path(PathBuf::from("/tmp/donate-logs"))
        );
        if let LogOutputDest::Path(dir) = LogOutputDest::parse_from_str("data-dir")? {
            let name = dir.file_name().map(|name| name.to_string_lossy().into_owned());
            assert!(name.is_some_and(|name| name.starts_with("log_")));
            assert!(dir.parent().is_some_and(|logs| logs.ends_with("donate/logs")));
        }
        Ok(())
    }

    #[test]
    fn log_formats_are_parsed() -> Result<()> {
        assert_eq!(LogFormat::parse_from_str("json")?, LogFormat::Json);
        assert_eq!(LogFormat::parse_from_str("default")?.as_str(), "default");
        assert!(LogFormat::parse_from_str("yaml").is_err());
        Ok(())
    }

    #[test]
    fn formatter_writes_level_module_and_message_on_one_line() -> Result<()> {
        let layer = tracing_fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .event_format(LogFormatter)
            .with_writer(MockWriter::new(global_buf()))
            .with_filter(Targets::new().with_target("donate_logging::tests", Level::INFO));
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!("filtered out");
            info!(amount = "25.50", "Donation broadcast");
        });

        let buf = global_buf()
            .lock()
            .map_err(|_| color_eyre::eyre::eyre!("log buffer poisoned"))?;
        let lines: Vec<&str> = std::str::from_utf8(&buf)?.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" INFO donate_logging::tests] "));
        assert!(lines[0].contains("Donation broadcast"));
        assert!(lines[0].contains("amount="));
        Ok(())
    }
}
