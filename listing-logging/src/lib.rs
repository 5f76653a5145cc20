//! listing-logging
//!
//! Tracing subscriber setup for the submission binary. Behaviour is driven
//! by environment variables:
//!
//! - `LOG_LEVEL`: filter directive, default `info` (`RUST_LOG` wins if set)
//! - `LOG_FORMAT`: `human` (default) or `json`
//! - `LOG_OUTPUT`: `console` (default), `file` or `both`
//! - `LOG_FILE_PATH`: log file for `file`/`both`, default `/tmp/listing-submit.log`
//!
//! Console logs go to stderr. When running inside GitHub Actions
//! (`GITHUB_ACTIONS=true`) warnings and errors are additionally emitted on
//! stdout as workflow annotations.

use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::{field::Visit, Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::MakeWriter,
    layer::{Context, Layered},
    prelude::*,
    registry, EnvFilter, Layer, Registry,
};

type Base = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Base> + Send + Sync>;

const DEFAULT_LOG_FILE: &str = "/tmp/listing-submit.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    None,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    pub file_path: PathBuf,
    pub annotations: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };
        let output = match lookup("LOG_OUTPUT").as_deref() {
            Some("file") => LogOutput::File,
            Some("both") => LogOutput::Both,
            Some("none") => LogOutput::None,
            _ => LogOutput::Console,
        };

        Self {
            level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format,
            output,
            file_path: lookup("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            annotations: lookup("GITHUB_ACTIONS").as_deref() == Some("true"),
        }
    }
}

/// Initializes the global tracing subscriber based on environment variables.
///
/// The returned guard must be held until exit so buffered file logs are
/// flushed.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(LogSettings::from_env())
}

pub fn init_with(settings: LogSettings) -> Option<WorkerGuard> {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    for directive in ["hyper=warn", "hyper_util=warn", "reqwest=warn", "rustls=warn"] {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if matches!(settings.output, LogOutput::Console | LogOutput::Both) {
        layers.push(fmt_layer(settings.format, io::stderr));
    }

    if matches!(settings.output, LogOutput::File | LogOutput::Both) {
        let log_dir = settings
            .file_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("/tmp"));
        let log_filename = settings
            .file_path
            .file_name()
            .unwrap_or("listing-submit.log".as_ref());

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);
        layers.push(fmt_layer(settings.format, non_blocking));
    }

    if settings.annotations {
        layers.push(AnnotationLayer::new(io::stdout).boxed());
    }

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = registry().with(env_filter).with(layers).try_init();

    guard
}

fn fmt_layer<W>(format: LogFormat, writer: W) -> BoxedLayer
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(false);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Human => layer.boxed(),
    }
}

// --- Workflow annotations ---

/// Emits `::warning::` / `::error::` workflow commands for WARN and ERROR
/// events so they surface in the CI run summary.
pub struct AnnotationLayer<W> {
    make_writer: W,
}

impl<W> AnnotationLayer<W> {
    pub fn new(make_writer: W) -> Self {
        Self { make_writer }
    }
}

impl<S, W> Layer<S> for AnnotationLayer<W>
where
    S: Subscriber,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let command = match *event.metadata().level() {
            Level::ERROR => "error",
            Level::WARN => "warning",
            _ => return,
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut writer = self.make_writer.make_writer();
        let _ = writeln!(
            writer,
            "::{}::{}",
            command,
            escape_annotation_data(&visitor.render())
        );
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl MessageVisitor {
    fn render(&self) -> String {
        if self.fields.is_empty() {
            return self.message.clone();
        }
        let fields = self
            .fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} ({})", self.message, fields)
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }
}

/// Escapes a workflow command payload so multi-line text stays one command.
pub fn escape_annotation_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing::{error, info, warn};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = SharedBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_annotations_for_warnings_and_errors_only() {
        let buffer = SharedBuffer::default();
        let subscriber = registry().with(AnnotationLayer::new(buffer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            info!("just info");
            warn!("Optional field 'homepage' is not set.");
            error!(status = 409, "Submission failed");
        });

        assert_eq!(
            buffer.contents(),
            "::warning::Optional field 'homepage' is not set.\n::error::Submission failed (status=409)\n"
        );
    }

    #[test]
    fn test_annotation_data_is_escaped() {
        assert_eq!(
            escape_annotation_data("100% broken\r\nsecond line"),
            "100%25 broken%0D%0Asecond line"
        );
    }

    #[test]
    fn test_settings_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("LOG_FORMAT", "json"),
            ("LOG_OUTPUT", "both"),
            ("LOG_FILE_PATH", "/var/log/submit.log"),
            ("GITHUB_ACTIONS", "true"),
        ]
        .into_iter()
        .collect();
        let settings = LogSettings::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.level, "info");
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.output, LogOutput::Both);
        assert_eq!(settings.file_path, PathBuf::from("/var/log/submit.log"));
        assert!(settings.annotations);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = LogSettings::from_lookup(|_| None);
        assert_eq!(settings.format, LogFormat::Human);
        assert_eq!(settings.output, LogOutput::Console);
        assert_eq!(settings.file_path, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(!settings.annotations);
    }
}
