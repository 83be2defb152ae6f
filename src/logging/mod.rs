/*!
 * Logging Module
 * Subscriber setup for file and console output, plus request middleware
 */
pub mod config;
pub mod middleware;

pub use config::{LogLevel, LoggingConfig};

use std::io;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::Layered, layer::SubscriberExt, util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Initialize the logging system.
///
/// Writes everything to a daily `app.log`, errors to `error.log` and mirrors
/// to stdout. The returned guards flush the background writers on drop and
/// must be held for the life of the process.
pub fn init(config: &LoggingConfig) -> Vec<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(&config.dir) {
        eprintln!("could not create log directory {}: {e}", config.dir.display());
    }

    let (file_writer, file_guard) =
        tracing_appender::non_blocking(rolling::daily(&config.dir, "app.log"));
    let (error_writer, error_guard) =
        tracing_appender::non_blocking(rolling::daily(&config.dir, "error.log"));
    let (console_writer, console_guard) = tracing_appender::non_blocking(io::stdout());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    let layers = if config.is_production() {
        json_layers(file_writer, error_writer, console_writer)
    } else {
        text_layers(file_writer, error_writer, console_writer)
    };

    tracing_subscriber::registry().with(env_filter).with(layers).init();

    tracing::info!(
        environment = %config.environment,
        level = %config.level,
        dir = %config.dir.display(),
        "logging initialized"
    );

    vec![file_guard, error_guard, console_guard]
}

// Production: structured JSON everywhere.
fn json_layers(file: NonBlocking, errors: NonBlocking, console: NonBlocking) -> Vec<BoxedLayer> {
    vec![
        fmt::layer()
            .json()
            .with_writer(file)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        fmt::layer()
            .json()
            .with_writer(errors)
            .with_file(true)
            .with_line_number(true)
            .with_filter(LevelFilter::ERROR)
            .boxed(),
        fmt::layer()
            .json()
            .with_writer(console)
            .with_target(false)
            .boxed(),
    ]
}

fn text_layers(file: NonBlocking, errors: NonBlocking, console: NonBlocking) -> Vec<BoxedLayer> {
    vec![
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        fmt::layer()
            .with_writer(errors)
            .with_ansi(false)
            .with_filter(LevelFilter::ERROR)
            .boxed(),
        fmt::layer().with_writer(console).pretty().boxed(),
    ]
}
