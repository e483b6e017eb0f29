//! Process Launcher
//!
//! Starts the installer with `/configure <xml>` without blocking the caller and
//! lets the caller poll it to completion. `InstallSession` keeps at most one
//! active process and tracks the launch lifecycle.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use thiserror::Error;

/// Flag understood by the installer, fixed by its command line contract
pub const CONFIGURE_FLAG: &str = "/configure";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Executable not found: {}", .0.display())]
    MissingExecutable(PathBuf),

    #[error("Configuration file not found: {}", .0.display())]
    InvalidConfig(PathBuf),

    #[error("Failed to start {command}: {source}")]
    ProcessCreation {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("An installation is already running (PID {0})")]
    AlreadyRunning(u32),

    #[error("Failed to query process {pid}: {source}")]
    Poll {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

/// Executable and configuration file resolved for one launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchDescriptor {
    pub executable: PathBuf,
    pub config: PathBuf,
}

impl LaunchDescriptor {
    /// Resolve both names against `work_dir` as absolute paths
    pub fn resolve(work_dir: &Path, executable_name: &str, config_name: &str) -> Self {
        let base = absolutize(work_dir);
        LaunchDescriptor {
            executable: base.join(executable_name),
            config: base.join(config_name),
        }
    }

    /// `"<executable>" /configure "<config>"`
    pub fn command_line(&self) -> String {
        format!(
            "\"{}\" {} \"{}\"",
            self.executable.display(),
            CONFIGURE_FLAG,
            self.config.display()
        )
    }

    /// Both files must exist before anything is spawned
    pub fn check(&self) -> Result<(), LaunchError> {
        if !self.executable.exists() {
            return Err(LaunchError::MissingExecutable(self.executable.clone()));
        }
        if !self.config.exists() {
            return Err(LaunchError::InvalidConfig(self.config.clone()));
        }
        Ok(())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        apply_configure_args(&mut cmd, &self.config);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(windows)]
fn apply_configure_args(cmd: &mut Command, config: &Path) {
    use std::os::windows::process::CommandExt;
    use windows::Win32::System::Threading::CREATE_NEW_PROCESS_GROUP;

    // std already quotes the program; the config is quoted by hand
    cmd.raw_arg(CONFIGURE_FLAG)
        .raw_arg(format!("\"{}\"", config.display()))
        .creation_flags(CREATE_NEW_PROCESS_GROUP.0);
}

#[cfg(not(windows))]
fn apply_configure_args(cmd: &mut Command, config: &Path) {
    cmd.arg(CONFIGURE_FLAG).arg(config);
}

/// Observed state of a launched process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    /// Raw exit code; None when the OS reports none (e.g. killed by a signal)
    Completed(Option<i32>),
}

/// A spawned installer process
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: u32,
}

impl ProcessHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Non-blocking exit check
    pub fn poll(&mut self) -> Result<ProcessStatus, LaunchError> {
        match self.child.try_wait() {
            Ok(Some(status)) => Ok(ProcessStatus::Completed(status.code())),
            Ok(None) => Ok(ProcessStatus::Running),
            Err(source) => Err(LaunchError::Poll {
                pid: self.pid,
                source,
            }),
        }
    }
}

/// Check preconditions and spawn the installer. Returns as soon as the
/// process exists; no limit on concurrent launches is enforced here.
pub fn launch(descriptor: &LaunchDescriptor) -> Result<ProcessHandle, LaunchError> {
    descriptor.check()?;

    let command_line = descriptor.command_line();
    tracing::info!("Spawning: {}", command_line);

    let child = descriptor
        .command()
        .spawn()
        .map_err(|source| LaunchError::ProcessCreation {
            command: command_line,
            source,
        })?;

    let pid = child.id();
    tracing::info!("Installer started with PID {}", pid);

    Ok(ProcessHandle { child, pid })
}

/// Lifecycle of the most recent launch attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LaunchState {
    #[default]
    Idle,
    Launching,
    Running {
        pid: u32,
    },
    Completed {
        code: Option<i32>,
    },
    LaunchFailed {
        reason: String,
    },
}

/// Owns at most one active installer process
#[derive(Debug, Default)]
pub struct InstallSession {
    state: LaunchState,
    handle: Option<ProcessHandle>,
}

impl InstallSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LaunchState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn active_pid(&self) -> Option<u32> {
        self.handle.as_ref().map(|h| h.pid())
    }

    /// Start the installer. Precondition failures leave the state untouched;
    /// spawn failures move to `LaunchFailed`.
    pub fn start(&mut self, descriptor: &LaunchDescriptor) -> Result<u32, LaunchError> {
        if let Some(pid) = self.active_pid() {
            return Err(LaunchError::AlreadyRunning(pid));
        }
        descriptor.check()?;

        self.state = LaunchState::Launching;
        match launch(descriptor) {
            Ok(handle) => {
                let pid = handle.pid();
                self.handle = Some(handle);
                self.state = LaunchState::Running { pid };
                Ok(pid)
            }
            Err(e) => {
                self.state = LaunchState::LaunchFailed {
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// `None` when nothing is running. `Completed` is returned once, then the
    /// handle is released.
    pub fn poll(&mut self) -> Result<Option<ProcessStatus>, LaunchError> {
        let Some(handle) = self.handle.as_mut() else {
            return Ok(None);
        };

        match handle.poll() {
            Ok(ProcessStatus::Running) => Ok(Some(ProcessStatus::Running)),
            Ok(ProcessStatus::Completed(code)) => {
                tracing::info!("Installer PID {} exited with {:?}", handle.pid(), code);
                self.handle = None;
                self.state = LaunchState::Completed { code };
                Ok(Some(ProcessStatus::Completed(code)))
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.handle = None;
                self.state = LaunchState::LaunchFailed {
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }
}
