//! Host configuration for the wrapper

use crate::errors::{Result, WrapperError};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const FLUENTBIT_PATH_VAR: &str = "FLUENTBIT_PATH";
pub const DEBUG_FILE_VAR: &str = "FLUENTBIT_WRAPPER_DEBUG_FILE";
pub const DEFAULT_OUTPUT_FILE: &str = "fluent-bit.conf";

const USAGE: &str = "Usage: fluentbit-otel-wrapper --config <path to config>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperConfig {
    /// Fluent Bit executable, absolute, relative or a bare name looked up in PATH
    pub fluentbit_path: PathBuf,

    /// Append-only debug trace file
    pub debug_file: Option<PathBuf>,

    /// Where the translated configuration is written
    pub output_path: PathBuf,

    /// Directories searched for a bare `fluentbit_path`
    pub search_path: Option<OsString>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            fluentbit_path: PathBuf::new(),
            debug_file: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            search_path: None,
        }
    }
}

impl WrapperConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| env::var_os(key));
        config.search_path = env::var_os("PATH");
        config
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut config = WrapperConfig::default();

        if let Some(path) = lookup(FLUENTBIT_PATH_VAR) {
            config.fluentbit_path = PathBuf::from(path);
        }

        config.debug_file = lookup(DEBUG_FILE_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.fluentbit_path.as_os_str().is_empty() {
            return Err(WrapperError::Config(format!(
                "{} environment variable not set",
                FLUENTBIT_PATH_VAR
            )));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(WrapperError::Config("output path cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Reject invocations too short to carry `--config <path>`
pub fn check_usage(args: &[String]) -> Result<()> {
    if args.len() <= 2 {
        return Err(WrapperError::Usage(USAGE.to_string()));
    }
    Ok(())
}

/// Find the value of the first `--config` flag.
///
/// Accepts `--config <path>` and `--config=<path>`; every other argument is
/// left for the collector and ignored here.
pub fn locate_config_flag(args: &[String]) -> Result<PathBuf> {
    check_usage(args)?;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            if let Some(value) = rest.next() {
                return Ok(PathBuf::from(value));
            }
        } else if let Some(value) = arg.strip_prefix("--config=") {
            if !value.is_empty() {
                return Ok(PathBuf::from(value));
            }
        }
    }

    Err(WrapperError::Usage("Can not find --config path".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = WrapperConfig::default();
        assert_eq!(config.output_path, PathBuf::from("fluent-bit.conf"));
        assert!(config.debug_file.is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = WrapperConfig::from_lookup(lookup(&[
            ("FLUENTBIT_PATH", "/usr/bin/fluent-bit"),
            ("FLUENTBIT_WRAPPER_DEBUG_FILE", "/tmp/wrapper.log"),
        ]));

        assert_eq!(config.fluentbit_path, PathBuf::from("/usr/bin/fluent-bit"));
        assert_eq!(config.debug_file, Some(PathBuf::from("/tmp/wrapper.log")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_debug_file_disables_trace() {
        let config = WrapperConfig::from_lookup(lookup(&[
            ("FLUENTBIT_PATH", "fluent-bit"),
            ("FLUENTBIT_WRAPPER_DEBUG_FILE", ""),
        ]));
        assert!(config.debug_file.is_none());
    }

    #[test]
    fn test_missing_fluentbit_path() {
        let config = WrapperConfig::from_lookup(lookup(&[]));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, WrapperError::Config(_)));
        assert!(err.to_string().contains("FLUENTBIT_PATH"));
    }

    #[test]
    fn test_locate_config_flag() {
        let found = locate_config_flag(&args(&["wrapper", "--feature-gates=x", "--config", "/etc/otel.yaml"]));
        assert_eq!(found.unwrap(), PathBuf::from("/etc/otel.yaml"));

        let first_wins = locate_config_flag(&args(&["wrapper", "--config", "a.yaml", "--config", "b.yaml"]));
        assert_eq!(first_wins.unwrap(), PathBuf::from("a.yaml"));

        let equals = locate_config_flag(&args(&["wrapper", "run", "--config=c.yaml"]));
        assert_eq!(equals.unwrap(), PathBuf::from("c.yaml"));
    }

    #[test]
    fn test_check_usage() {
        let err = check_usage(&args(&["wrapper"])).unwrap_err();
        assert_eq!(err.to_string(), USAGE);
        assert!(check_usage(&args(&["wrapper", "--config"])).is_err());
        assert!(check_usage(&args(&["wrapper", "--config", "c.yaml"])).is_ok());
    }

    #[test]
    fn test_locate_config_flag_usage_errors() {
        assert!(matches!(
            locate_config_flag(&args(&["wrapper", "--config"])),
            Err(WrapperError::Usage(_))
        ));
        assert!(matches!(
            locate_config_flag(&args(&["wrapper", "--other", "x", "--config"])),
            Err(WrapperError::Usage(_))
        ));
        assert!(matches!(
            locate_config_flag(&args(&["wrapper", "--other", "x"])),
            Err(WrapperError::Usage(_))
        ));
    }
}
