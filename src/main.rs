//! OpenTelemetry collector to Fluent Bit wrapper binary

use fluentbit_otel_wrapper::config::check_usage;
use fluentbit_otel_wrapper::{ExecLauncher, FluentBitWrapper, WrapperConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    initialize_tracing();

    info!("Starting fluentbit-otel-wrapper v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    if let Err(e) = check_usage(&args) {
        error!("{}", e);
        std::process::exit(1);
    }

    let config = WrapperConfig::from_env();

    let wrapper = match FluentBitWrapper::new(config) {
        Ok(wrapper) => wrapper,
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            std::process::exit(1);
        }
    };

    match wrapper.run(&args, &ExecLauncher) {
        Ok(never) => match never {},
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize structured logging on stderr, leaving stdout to Fluent Bit
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
