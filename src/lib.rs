//! OpenTelemetry collector to Fluent Bit wrapper
//!
//! Translates the OTLP receiver and exporter settings of an OpenTelemetry
//! collector configuration into a Fluent Bit configuration, then replaces
//! the current process with Fluent Bit running that configuration.

pub mod config;
pub mod debug_trace;
pub mod document;
pub mod errors;
pub mod launcher;
pub mod otel;
pub mod translate;
pub mod wrapper;

pub use config::WrapperConfig;
pub use document::{Directive, Section, TargetDocument};
pub use errors::{Result, WrapperError};
pub use launcher::{ExecLauncher, LaunchPlan, Launcher};
pub use otel::ParsedConfig;
pub use translate::translate;
pub use wrapper::{FluentBitWrapper, translate_bytes};
