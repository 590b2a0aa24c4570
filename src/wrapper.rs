//! Wrapper orchestrating translation and the hand-off to Fluent Bit

use crate::config::{WrapperConfig, locate_config_flag};
use crate::debug_trace::DebugTrace;
use crate::document::TargetDocument;
use crate::errors::{Result, WrapperError};
use crate::launcher::{LaunchPlan, Launcher, resolve_executable};
use crate::otel::ParsedConfig;
use crate::translate::translate;

use std::path::Path;
use tracing::{debug, info, instrument};

pub struct FluentBitWrapper {
    config: WrapperConfig,
}

impl FluentBitWrapper {
    /// Create a new wrapper
    pub fn new(config: WrapperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    /// Translate the collector config named in `args` and launch Fluent Bit with it
    pub fn run<L: Launcher>(&self, args: &[String], launcher: &L) -> Result<L::Outcome> {
        let plan = self.prepare(args)?;
        launcher.launch(plan)
    }

    /// Everything up to the launch: trace, read, translate, resolve, persist.
    ///
    /// Nothing is written to the output path unless every earlier step
    /// succeeded. The debug trace is closed before this returns.
    #[instrument(skip(self, args))]
    pub fn prepare(&self, args: &[String]) -> Result<LaunchPlan> {
        let mut trace = DebugTrace::open(self.config.debug_file.as_deref())?;
        trace.record_args(args)?;

        let config_path = locate_config_flag(args)?;
        info!("Reading collector config from {}", config_path.display());

        let raw = read_config(&config_path)?;
        trace.record_config(&raw)?;

        let document = translate_bytes(&raw)?;

        let program = resolve_executable(
            &self.config.fluentbit_path,
            self.config.search_path.as_deref(),
        )?;
        debug!("Resolved {} to {}", self.config.fluentbit_path.display(), program.display());

        document.persist(&self.config.output_path)?;
        info!("Wrote Fluent Bit config to {}", self.config.output_path.display());

        trace.close()?;

        Ok(LaunchPlan::new(
            program,
            &self.config.fluentbit_path,
            &self.config.output_path,
        ))
    }
}

/// Parse and translate raw collector config bytes
pub fn translate_bytes(raw: &[u8]) -> Result<TargetDocument> {
    let parsed = ParsedConfig::parse(raw)?;
    translate(&parsed)
}

fn read_config(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        WrapperError::Io(std::io::Error::new(
            e.kind(),
            format!("Error reading config file {}: {}", path.display(), e),
        ))
    })
}
