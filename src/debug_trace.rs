//! Optional append-only trace of the raw invocation

use crate::errors::Result;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

const CONFIG_BEGIN: &str = "--- Config file contents ---\n";
const CONFIG_END: &str = "\n--- End of config file ---\n";

/// Debug trace file; every write is a no-op when disabled
#[derive(Debug)]
pub struct DebugTrace {
    file: Option<File>,
}

impl DebugTrace {
    /// Open `path` for appending, creating it if needed. `None` disables tracing.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                debug!("Appending debug trace to {}", path.display());
                Some(OpenOptions::new().append(true).create(true).open(path)?)
            }
            None => None,
        };
        Ok(Self { file })
    }

    /// Record the invocation arguments on one line
    pub fn record_args(&mut self, args: &[String]) -> Result<()> {
        self.write(format!("{}\n", args.join(" ")).as_bytes())
    }

    /// Record a verbatim dump of the config file between marker lines
    pub fn record_config(&mut self, raw: &[u8]) -> Result<()> {
        self.write(CONFIG_BEGIN.as_bytes())?;
        self.write(raw)?;
        self.write(CONFIG_END.as_bytes())
    }

    /// Flush and close the trace
    pub fn close(mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(bytes)?;
        }
        Ok(())
    }
}
