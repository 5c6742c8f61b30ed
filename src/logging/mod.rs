//! Console and log-file output for a bootstrap run.
//!
//! Tasks talk to the [`Log`] trait. The binary plugs in [`Logger`], which
//! forwards to `tracing`; [`init_subscriber`] renders that to the terminal
//! and to `<cache>/bootstrap/<command>.log`.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::{LOG_ENV, init_subscriber};
pub use types::{Level, Log, TaskRecord, TaskStatus};

/// A [`Logger`] whose output goes to a temporary log file through a
/// thread-local subscriber. Keep the guard alive for the whole test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("install.log");
    let layer = subscriber::LogFileLayer::create(&path).expect("log file layer");
    let dispatch =
        tracing::Dispatch::new(tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG)));
    let guard = tracing::dispatcher::set_default(&dispatch);
    (Logger::with_log_file(Some(path)), tmp, guard)
}
