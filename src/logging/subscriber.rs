//! The global `tracing` subscriber: a coloured console layer and a plain
//! per-command log file.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level as TraceLevel;

use super::utils::{Stamp, log_file_path, strip_ansi, utc_now};

/// `tracing` target for stage headers.
pub(super) const STAGE_TARGET: &str = "bootstrap::stage";
/// `tracing` target for dry-run lines.
pub(super) const DRY_RUN_TARGET: &str = "bootstrap::dry_run";
/// Environment variable holding a console filter directive, e.g. `warn`.
pub const LOG_ENV: &str = "BOOTSTRAP_LOG";

/// Pulls the formatted `message` field out of an event.
#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    visitor.0
}

/// Log-file rendering of one message: timestamped, tagged, no colour.
fn file_line(level: TraceLevel, target: &str, msg: &str, time: &str) -> String {
    let msg = strip_ansi(msg);
    let tag = match (level, target) {
        (TraceLevel::INFO, STAGE_TARGET) => return format!("[{time}] ==> {msg}"),
        (TraceLevel::INFO, DRY_RUN_TARGET) => "[dry run] ",
        (TraceLevel::ERROR, _) => "[error] ",
        (TraceLevel::WARN, _) => "[warn] ",
        (TraceLevel::DEBUG | TraceLevel::TRACE, _) => "[debug] ",
        _ => "",
    };
    format!("[{time}]     {tag}{msg}")
}

/// Console rendering of one message.
fn console_line(level: TraceLevel, target: &str, msg: &str) -> String {
    match (level, target) {
        (TraceLevel::ERROR, _) => format!("\x1b[31mERROR\x1b[0m {msg}"),
        (TraceLevel::WARN, _) => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        (TraceLevel::INFO, STAGE_TARGET) => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        (TraceLevel::INFO, DRY_RUN_TARGET) => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
        (TraceLevel::INFO, _) => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// Appends every event to the command's log file, whatever the console
/// verbosity.
#[derive(Debug)]
pub(super) struct LogFileLayer {
    file: Mutex<fs::File>,
}

impl LogFileLayer {
    /// Layer for `<cache>/bootstrap/<command>.log`, `None` when the cache
    /// directory is unusable.
    fn for_command(command: &str) -> Option<Self> {
        Self::create(&log_file_path(command)?)
    }

    /// Start `path` afresh with a header naming the version and start time.
    pub(super) fn create(path: &Path) -> Option<Self> {
        let version =
            option_env!("BOOTSTRAP_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let started = utc_now(Stamp::DateTime);
        fs::write(path, format!("{rule}\nbootstrap {version} {started}\n{rule}\n")).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogFileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();
        let line = file_line(
            *meta.level(),
            meta.target(),
            &message_of(event),
            &utc_now(Stamp::Time),
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Console event format built on [`console_line`].
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        writeln!(
            writer,
            "{}",
            console_line(*meta.level(), meta.target(), &message_of(event))
        )
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// The console shows `info` and above (`debug` with `verbose`), unless
/// [`LOG_ENV`] holds a filter directive, which then wins. Warnings and
/// errors go to stderr, the rest to stdout. The log file always gets
/// everything from `debug` up.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(
            std::io::stderr
                .with_max_level(TraceLevel::WARN)
                .and(std::io::stdout.with_min_level(TraceLevel::INFO)),
        )
        .with_filter(console_filter);

    let file = LogFileLayer::for_command(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
