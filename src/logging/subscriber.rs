//! Tracing subscriber for the installer hooks: a stderr console layer and a
//! per-phase file layer.
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::paths::log_file_path;
use super::{STAGE_TARGET, SUMMARY_TARGET};

/// The fields installer events carry.
#[derive(Default)]
struct EventFields {
    message: String,
    /// Step status label on summary events.
    status: Option<String>,
    /// Verbatim text attached to a warning.
    text: Option<String>,
}

impl EventFields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    /// The attached text, one entry per line.
    fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.text.as_deref().unwrap_or_default().lines()
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = Some(value.to_string()),
            "text" => self.text = Some(value.to_string()),
            _ => {}
        }
    }
}

/// Appends every event to `<cache>/player-app-installer/<phase>.log`.
///
/// Lines are plain text with a UTC timestamp; summary lines carry their
/// status in brackets instead of the console's colours.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `phase`, write a run header, and return a
    /// layer appending to it.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened; the hooks then log to the console only.
    pub(super) fn new(phase: &str) -> Option<Self> {
        let path = log_file_path(phase)?;
        let version = option_env!("PLAYER_INSTALLER_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!(
            "# player-app-installer {version}\n# phase {phase} started {}\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }

    fn render(level: Level, target: &str, fields: &EventFields) -> String {
        let ts = chrono::Utc::now().format("%H:%M:%S");
        let msg = &fields.message;
        let mut out = match (level, target) {
            (Level::INFO, STAGE_TARGET) => format!("[{ts}] ==> {msg}"),
            (_, SUMMARY_TARGET) => format!(
                "[{ts}]     [{}] {msg}",
                fields.status.as_deref().unwrap_or("?")
            ),
            (Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
            (Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
            (Level::INFO, _) => format!("[{ts}]     {msg}"),
            _ => format!("[{ts}]     [debug] {msg}"),
        };
        for line in fields.text_lines() {
            let _ = write!(out, "\n[{ts}]     | {line}");
        }
        out
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let line = Self::render(*metadata.level(), metadata.target(), &EventFields::of(event));
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Colour and marker for a summary status label.
fn summary_style(status: Option<&str>) -> (&'static str, &'static str) {
    match status {
        Some("ok") => ("\x1b[32m", "✓"),
        Some("n/a") => ("\x1b[2m", "·"),
        Some("skipped") => ("\x1b[33m", "○"),
        _ => ("\x1b[31m", "✗"),
    }
}

/// Console output of the hooks. The installer front end shows stderr to the
/// user, so warnings keep any attached text visible under the message.
struct InstallerFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for InstallerFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let fields = EventFields::of(event);
        let msg = &fields.message;

        match (*metadata.level(), metadata.target()) {
            (Level::INFO, STAGE_TARGET) => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")?;
            }
            (_, SUMMARY_TARGET) => {
                let (color, marker) = summary_style(fields.status.as_deref());
                writeln!(writer, "  {color}{marker} {msg}\x1b[0m")?;
            }
            (Level::ERROR, _) => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}")?,
            (Level::WARN, _) => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}")?,
            (Level::INFO, _) => writeln!(writer, "  {msg}")?,
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m")?,
        }
        for line in fields.text_lines() {
            writeln!(writer, "      | {line}")?;
        }
        Ok(())
    }
}

/// Initialise the global [`tracing`] subscriber for one lifecycle phase.
///
/// Console output goes to stderr so that declarative phases can print their
/// JSON result on stdout. The file layer writes every event (including
/// `debug`) to the phase's own log file. Must be called once at program
/// startup, before any logging.
pub fn init_subscriber(verbose: bool, phase: &str) {
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let console_layer = fmt::layer()
        .event_format(InstallerFormatter)
        .with_writer(std::io::stderr)
        .with_filter(console_level);

    let file_layer = FileLayer::new(phase).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
