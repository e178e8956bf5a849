//! Subscriber setup: level filter, stderr logs, and OTLP file export.

use super::tracer;
use crate::infrastructure::{expand_tilde, get_data_dir};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported in exported resources.
pub const SERVICE_NAME: &str = "reelsearch";

/// Default trace file name inside the data directory.
pub const TRACE_FILE_NAME: &str = "reelsearch-otlp.json";

/// Keeps the tracer provider alive and flushes pending spans on drop.
#[must_use = "dropping the guard stops trace export"]
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl TracingGuard {
    /// Whether spans are being exported.
    #[must_use]
    pub const fn exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            for result in provider.force_flush() {
                if let Err(e) = result {
                    eprintln!("reelsearch: failed to flush trace export: {e}");
                }
            }
        }
    }
}

/// Installs the global tracing subscriber.
///
/// The level comes from `RUST_LOG` when set, else `config.trace_level`, else
/// `info`. Spans are exported to `config.trace_file` or
/// `<data dir>/reelsearch-otlp.json`. If the trace directory cannot be
/// created, export is skipped and logging still works.
///
/// Only the first call installs a subscriber; later calls return a guard that
/// exports nothing.
///
/// # Example
///
/// ```no_run
/// use reelsearch::observability::init_tracing;
/// use reelsearch::Config;
///
/// let _guard = init_tracing(&Config::default());
/// tracing::info!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> TracingGuard {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = config.log_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let trace_file = trace_file_path(config);
    let provider = match trace_file.parent().map(std::fs::create_dir_all) {
        Some(Err(e)) => {
            eprintln!(
                "reelsearch: trace export disabled, cannot create {}: {e}",
                trace_file.display()
            );
            None
        }
        _ => {
            let resource = Resource::new(vec![
                KeyValue::new("service.name", SERVICE_NAME),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            ]);
            Some(tracer::create_tracer_provider(trace_file.clone(), resource))
        }
    };

    let otel_layer = provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if !installed {
        return TracingGuard { provider: None };
    }

    tracing::debug!(
        level,
        trace_file = %trace_file.display(),
        exporting = provider.is_some(),
        "tracing initialized"
    );
    TracingGuard { provider }
}

fn trace_file_path(config: &Config) -> PathBuf {
    config.trace_file.as_deref().map_or_else(
        || get_data_dir().join(TRACE_FILE_NAME),
        |path| PathBuf::from(expand_tilde(path)),
    )
}
