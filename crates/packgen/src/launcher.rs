//! Locating and invoking the host engine executable.
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Separator after which arguments are forwarded to the engine-side script.
pub const ARG_SEPARATOR: &str = "--";

/// Flag telling the host to run a script file.
pub const SCRIPT_FLAG: &str = "-P";

/// Host operating system, as far as engine discovery is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl HostPlatform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => HostPlatform::Windows,
            "macos" => HostPlatform::MacOs,
            "linux" => HostPlatform::Linux,
            other => HostPlatform::Other(other.to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            HostPlatform::Windows => "windows",
            HostPlatform::MacOs => "macos",
            HostPlatform::Linux => "linux",
            HostPlatform::Other(name) => name,
        }
    }
}

/// Path of the engine executable for `platform`.
///
/// An explicit `override_path` always wins. Otherwise only the default install
/// locations on Windows and macOS are known.
pub fn resolve_engine_executable(
    platform: &HostPlatform,
    override_path: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    match platform {
        HostPlatform::Windows => Ok([
            r"C:\",
            "Program Files",
            "Blender Foundation",
            "Blender",
            "4.3",
            "Blender.exe",
        ]
        .iter()
        .collect()),
        HostPlatform::MacOs => Ok(PathBuf::from(
            "/Applications/Blender.app/Contents/MacOS/Blender",
        )),
        other => Err(Error::UnsupportedPlatform {
            platform: other.name().to_owned(),
        }),
    }
}

/// Arguments from the separator on, separator included; empty without one.
pub fn forwarded_args(args: &[String]) -> &[String] {
    match args.iter().position(|a| a == ARG_SEPARATOR) {
        Some(i) => &args[i..],
        None => &[],
    }
}

/// A fully resolved engine command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    pub executable: PathBuf,
    pub args: Vec<String>,
}

impl EngineInvocation {
    /// `<executable> -P <script> [-- forwarded...]`
    pub fn new(executable: PathBuf, script: &Path, argv: &[String]) -> Self {
        let mut args = vec![
            SCRIPT_FLAG.to_owned(),
            script.to_string_lossy().into_owned(),
        ];
        args.extend_from_slice(forwarded_args(argv));
        Self { executable, args }
    }

    /// Resolve the executable for the current host and build the invocation.
    pub fn for_current_host(
        script: &Path,
        argv: &[String],
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let executable = resolve_engine_executable(&HostPlatform::current(), override_path)?;
        debug!(executable = %executable.display(), "Resolved engine executable.");
        Ok(Self::new(executable, script, argv))
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args);
        cmd
    }
}
