// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::commands::SubCmd;
use clap::Parser;
use color_eyre::Result;
use donate_logging::{LogFormat, LogOutputDest};
use std::time::Duration;

// Please do not remove the blank lines in these doc comments.
// They are used for inserting line breaks when the help menu is rendered in the UI.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Opt {
    /// Available sub commands.
    #[clap(subcommand)]
    pub command: SubCmd,

    /// Specify the logging format.
    ///
    /// Valid values are "default" or "json".
    ///
    /// If the argument is not used, the default format will be applied.
    #[clap(long, global = true, value_parser = LogFormat::parse_from_str, verbatim_doc_comment)]
    pub log_format: Option<LogFormat>,

    /// Specify the logging output destination.
    ///
    /// Valid values are "stdout", "stderr", "data-dir", or a custom path.
    ///
    /// `data-dir` is the default value.
    ///
    /// The data directory location is platform specific:
    ///  - Linux: $HOME/.local/share/donate/logs
    ///  - macOS: $HOME/Library/Application Support/donate/logs
    ///  - Windows: C:\Users\<username>\AppData\Roaming\donate\logs
    #[allow(rustdoc::invalid_html_tags)]
    #[clap(long, global = true, value_parser = LogOutputDest::parse_from_str, verbatim_doc_comment, default_value = "data-dir")]
    pub log_output_dest: LogOutputDest,

    /// Milliseconds to wait after the wallet switches network before checking it again.
    #[clap(long = "settle-delay-ms", global = true, default_value = "1500", value_parser = |t: &str| -> Result<Duration> { Ok(t.parse().map(Duration::from_millis)?) })]
    pub settle_delay: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn the_wallet_key_is_never_taken_from_the_command_line() {
        let result = Opt::try_parse_from(["donate", "--private-key", "0xabc", "balance"]);
        assert!(matches!(result, Err(err) if err.kind() == ErrorKind::UnknownArgument));
    }

    #[test]
    fn settle_delay_is_read_in_milliseconds() -> Result<()> {
        let opt = Opt::try_parse_from(["donate", "send", "--to", "0x1", "--amount", "1"])?;
        assert_eq!(opt.settle_delay, Duration::from_millis(1500));

        let opt = Opt::try_parse_from(["donate", "balance", "--settle-delay-ms", "250"])?;
        assert_eq!(opt.settle_delay, Duration::from_millis(250));
        Ok(())
    }
}
