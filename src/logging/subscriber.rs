//! Global `tracing` subscriber: console rendering plus a persistent log file.
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{local_time, log_file_path, strip_ansi};

/// Target of stage headers.
pub(super) const STAGE_TARGET: &str = "dotfiles_setup::stage";
/// Target of dry-run notices.
pub(super) const DRY_RUN_TARGET: &str = "dotfiles_setup::dry_run";

/// How an event is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(level: Level, target: &str) -> Self {
        match (level, target) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    fn of_event(event: &tracing::Event<'_>) -> Self {
        let meta = event.metadata();
        Self::of(*meta.level(), meta.target())
    }
}

/// Console line for a message.
fn console_line(kind: Kind, msg: &str) -> String {
    match kind {
        Kind::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        Kind::DryRun => format!("  \x1b[36m[DRY RUN]\x1b[0m {msg}"),
        Kind::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
        Kind::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        Kind::Info => format!("  {msg}"),
        Kind::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// Log file line for a message: plain text with a time and a fixed-width tag.
fn file_line(kind: Kind, msg: &str, time: &str) -> String {
    let tag = match kind {
        Kind::Stage => "==>",
        Kind::DryRun => "dry-run",
        Kind::Error => "ERROR",
        Kind::Warn => "WARN",
        Kind::Info => "",
        Kind::Debug => "debug",
    };
    format!("{time} {tag:<7} {}", strip_ansi(msg))
}

/// Pulls the formatted `message` field out of an event.
#[derive(Default)]
struct Message(String);

impl tracing::field::Visit for Message {
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

impl Message {
    fn of(event: &tracing::Event<'_>) -> String {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor.0
    }
}

/// Appends every event to the install log, whatever the console verbosity.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Truncate `path` and start it with a run header.
    pub(super) fn create(path: &Path) -> std::io::Result<Self> {
        let mut file = File::create(path)?;
        writeln!(
            file,
            "# dotfiles-setup {} started {}",
            crate::cli::VERSION,
            local_time("%Y-%m-%d %H:%M:%S")
        )?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let line = file_line(Kind::of_event(event), &Message::of(event), &local_time("%H:%M:%S"));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Renders events with [`console_line`].
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
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
        writeln!(writer, "{}", console_line(Kind::of_event(event), &Message::of(event)))
    }
}

/// Install the global subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only when `verbose` is set.  Every event is also
/// appended to `<cache>/dotfiles/<command>.log` when that file can be
/// created.  Call once, before the first log line.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
        .with_filter(if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        });

    let file = log_file_path(command)
        .and_then(|path| FileLayer::create(&path).ok())
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
