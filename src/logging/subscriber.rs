//! Tracing subscriber: a console formatter and a per-command log file.
//!
//! Both outputs understand kitlink's own targets. Outcome events carry the
//! entry name and its [`LinkStatus`], so a status line is rendered from those
//! fields rather than from pre-coloured text.
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::Field;

use super::utils::{HEADER_TIME, LINE_TIME, log_file_path, utc_now};
use super::{DRY_RUN_TARGET, OUTCOME_TARGET, STAGE_TARGET, SUMMARY_TARGET};
use crate::report::status_icon;
use crate::resources::LinkStatus;

/// The fields kitlink attaches to its events.
#[derive(Default)]
struct EventFields {
    message: String,
    entry: Option<String>,
    status: Option<LinkStatus>,
}

impl EventFields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl tracing::field::Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "entry" => self.entry = Some(value.to_string()),
            "status" => self.status = value.parse().ok(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// What an event stands for, independent of where it is written.
enum Kind<'a> {
    Stage,
    DryRun,
    /// A recorded outcome, or its repetition in the summary listing.
    Outcome {
        status: LinkStatus,
        entry: &'a str,
        listing: bool,
    },
    /// The summary's closing count line.
    Totals,
    Plain(Level),
}

impl<'a> Kind<'a> {
    fn of(metadata: &tracing::Metadata<'_>, fields: &'a EventFields) -> Self {
        let target = metadata.target();
        if target == OUTCOME_TARGET || target == SUMMARY_TARGET {
            return match (fields.status, fields.entry.as_deref()) {
                (Some(status), Some(entry)) => Self::Outcome {
                    status,
                    entry,
                    listing: target == SUMMARY_TARGET,
                },
                _ => Self::Totals,
            };
        }
        match target {
            STAGE_TARGET => Self::Stage,
            DRY_RUN_TARGET => Self::DryRun,
            _ => Self::Plain(*metadata.level()),
        }
    }
}

const fn status_color(status: LinkStatus) -> &'static str {
    match status {
        LinkStatus::Installed => "\x1b[32m",
        LinkStatus::Skipped => "\x1b[33m",
        LinkStatus::Failed => "\x1b[31m",
        LinkStatus::BackedUp => "\x1b[36m",
    }
}

/// A [`tracing_subscriber::Layer`] writing the run log for one command.
///
/// The file is truncated at startup and receives every event at `DEBUG` and
/// above, whatever the console verbosity. Each outcome is written once, when
/// it is recorded; the summary contributes only its count line.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Start the log for `command` with a run header.
    ///
    /// Returns `None` if there is no cache directory or the file cannot be
    /// opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("KITLINK_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!("# kitlink {version} {command}, started {}\n", utc_now(HEADER_TIME));
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let fields = EventFields::of(event);
        let msg = &fields.message;
        let line = match Kind::of(event.metadata(), &fields) {
            Kind::Outcome { listing: true, .. } => return,
            Kind::Outcome { status, entry, .. } => {
                format!("{} {:<9} {entry}: {msg}", status_icon(status), status.as_str())
            }
            Kind::Totals => format!("summary: {msg}"),
            Kind::Stage => format!("==> {msg}"),
            Kind::DryRun => format!("[dry run] {msg}"),
            Kind::Plain(Level::INFO) => format!("    {msg}"),
            Kind::Plain(level) => format!("[{}] {msg}", level.as_str().to_ascii_lowercase()),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "[{}] {line}", utc_now(LINE_TIME)).ok();
        }
    }
}

/// Console formatter: stage headers, dry-run tags, coloured status lines.
struct KitlinkFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for KitlinkFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let fields = EventFields::of(event);
        let msg = &fields.message;

        match Kind::of(event.metadata(), &fields) {
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::DryRun => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Kind::Outcome { status, entry, .. } => writeln!(
                writer,
                "  {}{} {entry} ({msg})\x1b[0m",
                status_color(status),
                status_icon(status)
            ),
            Kind::Totals => writeln!(writer, "  \x1b[1m{msg}\x1b[0m"),
            Kind::Plain(Level::ERROR) => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            Kind::Plain(Level::WARN) => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            Kind::Plain(Level::INFO) => writeln!(writer, "  {msg}"),
            Kind::Plain(_) => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (warnings and errors to stderr) at `INFO`,
/// or `DEBUG` when `verbose` is set, so successful outcomes only show as they
/// happen in verbose mode. The run log is written as described on
/// [`FileLayer`]. Must be called once, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(KitlinkFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
