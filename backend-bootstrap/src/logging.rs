use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use backend_infrastructure::AppConfig;

const LOG_FILE_PREFIX: &str = "equiptrack.log";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter. With `log_dir` set, output goes to daily rolling files and the
/// returned guard must live until shutdown so buffered lines are flushed.
pub fn init_tracing(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard) = match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)
                .with_context(|| format!("create log directory {}", log_dir))?;
            let (non_blocking, guard) =
                tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.log_json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer()
            .with_ansi(config.log_dir.is_none())
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|err| anyhow!("tracing init failed: {}", err))?;
    Ok(guard)
}
