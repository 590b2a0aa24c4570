//! Translation of a parsed collector config into a Fluent Bit document

use crate::document::{Section, TargetDocument};
use crate::errors::{Result, WrapperError};
use crate::otel::{OtlpExporterConfig, ParsedConfig};
use tracing::{debug, info};

/// Bind address of the input plugin; only the source port is honored
const LISTEN_ADDRESS: &str = "127.0.0.1";
const PLUGIN_NAME: &str = "opentelemetry";

const METRICS_URI: &str = "/v1/metrics";
const LOGS_URI: &str = "/v1/logs";
const TRACES_URI: &str = "/v1/traces";

/// Receiver protocol selected for the input section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver<'a> {
    Grpc(&'a str),
    Http(&'a str),
}

impl<'a> Receiver<'a> {
    /// Pick gRPC when its endpoint is set, otherwise HTTP
    pub fn select(config: &'a ParsedConfig) -> Result<Self> {
        if let Some(endpoint) = config.grpc_endpoint() {
            Ok(Receiver::Grpc(endpoint))
        } else if let Some(endpoint) = config.http_endpoint() {
            Ok(Receiver::Http(endpoint))
        } else {
            Err(WrapperError::MissingReceiver)
        }
    }

    pub fn endpoint(&self) -> &'a str {
        match self {
            Receiver::Grpc(endpoint) | Receiver::Http(endpoint) => endpoint,
        }
    }
}

/// Exporter selected for the output section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exporter<'a> {
    Otlp(&'a OtlpExporterConfig),
    OtlpHttp(&'a OtlpExporterConfig),
}

impl<'a> Exporter<'a> {
    /// Pick `otlp` when present, otherwise `otlphttp`
    pub fn select(config: &'a ParsedConfig) -> Result<Self> {
        if let Some(otlp) = config.exporters.otlp.as_ref() {
            Ok(Exporter::Otlp(otlp))
        } else if let Some(otlphttp) = config.exporters.otlphttp.as_ref() {
            Ok(Exporter::OtlpHttp(otlphttp))
        } else {
            Err(WrapperError::MissingExporter)
        }
    }

    pub fn config(&self) -> &'a OtlpExporterConfig {
        match self {
            Exporter::Otlp(config) | Exporter::OtlpHttp(config) => config,
        }
    }
}

/// Translate a parsed collector config into a Fluent Bit document.
///
/// Both component groups are resolved before any section is built, so a
/// missing receiver or exporter never yields a partial document.
pub fn translate(config: &ParsedConfig) -> Result<TargetDocument> {
    let receiver = Receiver::select(config)?;
    let exporter = Exporter::select(config)?;

    let input = input_section(receiver)?;
    let output = output_section(exporter)?;

    info!(
        "Translated {:?} receiver and {} exporter",
        receiver,
        match exporter {
            Exporter::Otlp(_) => "otlp",
            Exporter::OtlpHttp(_) => "otlphttp",
        }
    );

    Ok(TargetDocument::new(vec![service_section(), input, output]))
}

fn service_section() -> Section {
    Section::new("SERVICE")
        .directive("flush", "1")
        .directive("daemon", "Off")
        .directive("log_level", "info")
}

fn input_section(receiver: Receiver<'_>) -> Result<Section> {
    let endpoint = receiver.endpoint();
    let (_, port) = split_endpoint(endpoint)?;

    Ok(Section::new("INPUT")
        .directive("name", PLUGIN_NAME)
        .directive("listen", LISTEN_ADDRESS)
        .directive("port", port))
}

fn output_section(exporter: Exporter<'_>) -> Result<Section> {
    let config = exporter.config();
    let endpoint = normalize_scheme(config)?;
    let (host, port) = split_endpoint(endpoint)?;
    if host.is_empty() {
        return Err(WrapperError::malformed(&config.endpoint, "empty host"));
    }

    let mut section = Section::new("OUTPUT")
        .directive("name", PLUGIN_NAME)
        .directive("host", host)
        .directive("port", port);

    section = match exporter {
        Exporter::Otlp(_) => section.directive("grpc", "on"),
        Exporter::OtlpHttp(_) => section.directive("http2", "Off"),
    };

    section = section
        .directive("metrics_uri", METRICS_URI)
        .directive("logs_uri", LOGS_URI)
        .directive("traces_uri", TRACES_URI);

    if config.compression == "gzip" {
        section = section.directive("compress", "gzip");
    } else if !config.compression.is_empty() {
        debug!("Dropping unsupported compression {:?}", config.compression);
    }

    Ok(section)
}

/// Reduce an exporter endpoint to a plaintext `host:port`.
///
/// `http://` is stripped. `https://`, or a bare endpoint without
/// `tls.insecure: true`, would need TLS and is rejected.
pub fn normalize_scheme(config: &OtlpExporterConfig) -> Result<&str> {
    let endpoint = config.endpoint.as_str();

    if let Some(stripped) = endpoint.strip_prefix("http://") {
        return Ok(stripped);
    }

    if endpoint.starts_with("https://") {
        return Err(WrapperError::UnsupportedEndpoint {
            endpoint: endpoint.to_string(),
            reason: "https endpoints not supported",
        });
    }

    if !config.tls.insecure {
        return Err(WrapperError::UnsupportedEndpoint {
            endpoint: endpoint.to_string(),
            reason: "TLS required unless tls.insecure is true",
        });
    }

    Ok(endpoint)
}

/// Split `host:port` at the last `:`
pub fn split_endpoint(endpoint: &str) -> Result<(&str, &str)> {
    let (host, port) = endpoint
        .rsplit_once(':')
        .ok_or_else(|| WrapperError::malformed(endpoint, "missing ':' separator"))?;

    match port.parse::<u16>() {
        Ok(p) if p > 0 && port.bytes().all(|b| b.is_ascii_digit()) => Ok((host, port)),
        _ => Err(WrapperError::malformed(endpoint, "invalid port")),
    }
}
