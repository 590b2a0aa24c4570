//! Agent executable resolution and process replacement

use crate::errors::{Result, WrapperError};
use std::convert::Infallible;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolved program and the argv it is started with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub argv: Vec<OsString>,
}

impl LaunchPlan {
    /// Build `{basename(agent_path), "-c", config_file}` for a resolved program
    pub fn new(program: PathBuf, agent_path: &Path, config_file: &Path) -> Self {
        let name = agent_path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| agent_path.as_os_str().to_os_string());

        Self {
            program,
            argv: vec![name, OsString::from("-c"), config_file.as_os_str().to_os_string()],
        }
    }
}

/// Hands control to the agent.
///
/// `Outcome` is what a successful launch gives back to the caller. The exec
/// launcher uses [`Infallible`]: on success it never returns.
pub trait Launcher {
    type Outcome;

    fn launch(&self, plan: LaunchPlan) -> Result<Self::Outcome>;
}

/// Replaces the current process image with the agent, inheriting the environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecLauncher;

impl Launcher for ExecLauncher {
    type Outcome = Infallible;

    #[cfg(unix)]
    fn launch(&self, plan: LaunchPlan) -> Result<Infallible> {
        use std::os::unix::process::CommandExt;
        use std::process::Command;

        info!("Executing {} {:?}", plan.program.display(), plan.argv);

        let (arg0, args) = plan.argv.split_first().ok_or_else(|| {
            WrapperError::Config("launch plan has an empty argument vector".to_string())
        })?;

        let source = Command::new(&plan.program).arg0(arg0).args(args).exec();
        Err(WrapperError::Launch {
            path: plan.program,
            source,
        })
    }

    // No exec(2) here: run the agent as a child and mirror its exit status.
    #[cfg(not(unix))]
    fn launch(&self, plan: LaunchPlan) -> Result<Infallible> {
        use std::process::Command;

        info!("Starting {} {:?}", plan.program.display(), plan.argv);

        let status = Command::new(&plan.program)
            .args(plan.argv.iter().skip(1))
            .status()
            .map_err(|source| WrapperError::Launch {
                path: plan.program.clone(),
                source,
            })?;
        std::process::exit(status.code().unwrap_or(1))
    }
}

/// Locate the agent executable.
///
/// A path with a directory component is checked as given. A bare name is
/// looked up in each directory of `search_path`.
pub fn resolve_executable(path: &Path, search_path: Option<&OsStr>) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(resolution_error(path, "empty path"));
    }

    if path.components().count() > 1 || path.is_absolute() {
        return if is_executable(path) {
            Ok(path.to_path_buf())
        } else {
            Err(resolution_error(path, "not an executable file"))
        };
    }

    let search_path = search_path.ok_or_else(|| resolution_error(path, "PATH is not set"))?;
    std::env::split_paths(search_path)
        .map(|dir| {
            // An empty PATH entry means the working directory
            if dir.as_os_str().is_empty() {
                PathBuf::from(".").join(path)
            } else {
                dir.join(path)
            }
        })
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| resolution_error(path, "executable file not found in PATH"))
}

fn resolution_error(path: &Path, reason: &str) -> WrapperError {
    WrapperError::ExecResolution {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
