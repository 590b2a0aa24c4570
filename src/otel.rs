//! The subset of the OpenTelemetry collector configuration schema the wrapper reads
//!
//! Only the OTLP receiver protocols and the `otlp`/`otlphttp` exporters are
//! modelled. Everything else in the document (processors, pipelines,
//! extensions, other components) is accepted and ignored.

use crate::errors::Result;
use serde::Deserialize;

/// Root of a parsed collector configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParsedConfig {
    pub receivers: Receivers,
    pub exporters: Exporters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Receivers {
    pub otlp: Option<OtlpReceiverConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OtlpReceiverConfig {
    pub protocols: Protocols,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Protocols {
    pub grpc: Option<ProtocolConfig>,
    pub http: Option<ProtocolConfig>,
}

/// Listen settings of one receiver protocol
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Exporters {
    pub otlp: Option<OtlpExporterConfig>,
    pub otlphttp: Option<OtlpExporterConfig>,
}

/// Destination settings shared by the `otlp` and `otlphttp` exporters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OtlpExporterConfig {
    pub endpoint: String,
    pub compression: String,
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub insecure: bool,
}

impl ParsedConfig {
    /// Parse raw collector config bytes (YAML, or JSON as a YAML subset)
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        // `~`, `null` and comment-only documents are all null: same as empty
        let value: serde_yaml::Value = serde_yaml::from_slice(raw)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }

    /// Endpoint of the gRPC receiver, if one is configured
    pub fn grpc_endpoint(&self) -> Option<&str> {
        self.protocols()
            .and_then(|p| p.grpc.as_ref())
            .and_then(ProtocolConfig::endpoint)
    }

    /// Endpoint of the HTTP receiver, if one is configured
    pub fn http_endpoint(&self) -> Option<&str> {
        self.protocols()
            .and_then(|p| p.http.as_ref())
            .and_then(ProtocolConfig::endpoint)
    }

    fn protocols(&self) -> Option<&Protocols> {
        self.receivers.otlp.as_ref().map(|otlp| &otlp.protocols)
    }
}

impl ProtocolConfig {
    fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref().filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WrapperError;

    const FULL_CONFIG: &str = r#"
receivers:
  otlp:
    protocols:
      grpc:
        endpoint: 0.0.0.0:4317
      http:
        endpoint: 0.0.0.0:4318
  hostmetrics:
    collection_interval: 10s
processors:
  batch: {}
exporters:
  otlp:
    endpoint: http://collector:4317
    compression: gzip
    tls:
      insecure: true
  otlphttp:
    endpoint: collector:4318
service:
  pipelines:
    logs:
      receivers: [otlp]
      processors: [batch]
      exporters: [otlp]
"#;

    #[test]
    fn test_parse_full_config() {
        let config = ParsedConfig::parse(FULL_CONFIG.as_bytes()).unwrap();

        assert_eq!(config.grpc_endpoint(), Some("0.0.0.0:4317"));
        assert_eq!(config.http_endpoint(), Some("0.0.0.0:4318"));

        let otlp = config.exporters.otlp.as_ref().unwrap();
        assert_eq!(otlp.endpoint, "http://collector:4317");
        assert_eq!(otlp.compression, "gzip");
        assert!(otlp.tls.insecure);

        let otlphttp = config.exporters.otlphttp.as_ref().unwrap();
        assert_eq!(otlphttp.endpoint, "collector:4318");
        assert_eq!(otlphttp.compression, "");
        assert!(!otlphttp.tls.insecure);
    }

    #[test]
    fn test_null_protocol_is_absent() {
        let raw = "receivers:\n  otlp:\n    protocols:\n      grpc:\n      http:\n        endpoint: localhost:4318\n";
        let config = ParsedConfig::parse(raw.as_bytes()).unwrap();

        assert_eq!(config.grpc_endpoint(), None);
        assert_eq!(config.http_endpoint(), Some("localhost:4318"));
    }

    #[test]
    fn test_parse_json_document() {
        let raw = r#"{"exporters": {"otlphttp": {"endpoint": "http://gw:4318"}}}"#;
        let config = ParsedConfig::parse(raw.as_bytes()).unwrap();

        assert!(config.receivers.otlp.is_none());
        assert_eq!(config.exporters.otlphttp.unwrap().endpoint, "http://gw:4318");
    }

    #[test]
    fn test_empty_document() {
        let config = ParsedConfig::parse(b"  \n").unwrap();
        assert_eq!(config, ParsedConfig::default());
    }

    #[test]
    fn test_null_document_matches_empty() {
        for raw in ["~\n", "null", "# receivers go here\n"] {
            let config = ParsedConfig::parse(raw.as_bytes()).unwrap();
            assert_eq!(config, ParsedConfig::default(), "document {raw:?}");
        }
    }

    #[test]
    fn test_scalar_document_rejected() {
        let result = ParsedConfig::parse(b"just a string\n");
        assert!(matches!(result, Err(WrapperError::Schema(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = ParsedConfig::parse(b"receivers: [otlp\n");
        assert!(matches!(result, Err(WrapperError::Schema(_))));
    }

    #[test]
    fn test_wrong_value_type() {
        let raw = "exporters:\n  otlp:\n    tls:\n      insecure: [yes]\n";
        let result = ParsedConfig::parse(raw.as_bytes());
        assert!(matches!(result, Err(WrapperError::Schema(_))));
    }
}
