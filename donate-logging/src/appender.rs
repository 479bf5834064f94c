// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use std::{env, ffi::OsStr, path::Path};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

const DEFAULT_BINARY_NAME: &str = "donate";

/// When a log file is rotated and how many old ones are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RotationLimits {
    /// Size a file may reach before it is rotated.
    pub(crate) max_bytes: usize,
    /// Rotated files beyond this count are compressed.
    pub(crate) uncompressed_files: usize,
    /// Older files beyond this count are deleted.
    pub(crate) max_files: usize,
}

/// A non-blocking writer into `<dir>/<binary>.log`, rotated by size.
///
/// The guard flushes pending lines when dropped and must be held for the life of the program.
pub(crate) fn rotating_writer(dir: &Path, limits: RotationLimits) -> (NonBlocking, WorkerGuard) {
    let writer = FileRotate::new(
        dir.join(format!("{}.log", binary_name())),
        AppendTimestamp::default(FileLimit::MaxFiles(limits.max_files)),
        ContentLimit::BytesSurpassed(limits.max_bytes),
        Compression::OnRotate(limits.uncompressed_files),
        #[cfg(unix)]
        None,
    );

    // Lines are never dropped; a slow disk applies backpressure instead.
    NonBlockingBuilder::default().lossy(false).finish(writer)
}

fn binary_name() -> String {
    env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(OsStr::to_string_lossy)
                .map(|stem| stem.into_owned())
        })
        .unwrap_or_else(|| DEFAULT_BINARY_NAME.to_string())
}
