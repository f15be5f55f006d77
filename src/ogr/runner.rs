use crate::connection::{PgConnection, PG_PREFIX};
use crate::error::{GisError, Result};
use crate::utils::shell_join;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// A program plus its ordered argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a filesystem path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Short program name for messages (`ogr2ogr` rather than `/usr/bin/ogr2ogr`).
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Shell-pasteable rendering of the full command line for logs and dry
    /// runs. Passwords in `PG:` datasources are masked.
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy().into_owned();
        let args: Vec<String> = self.args.iter().map(|a| mask_password(a)).collect();
        shell_join(std::iter::once(program.as_str()).chain(args.iter().map(String::as_str)))
    }
}

impl std::fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

fn mask_password(arg: &str) -> String {
    if !arg.starts_with(PG_PREFIX) {
        return arg.to_string();
    }
    match arg.parse::<PgConnection>() {
        Ok(mut conn) if conn.get("password").is_some() => {
            conn.set("password", "***");
            conn.to_datasource()
        }
        _ => arg.to_string(),
    }
}

/// Something that can execute a tool invocation to completion.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()>;
}

/// Runs invocations as child processes with inherited standard streams, so
/// the tool's own `-progress` output reaches the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        tracing::debug!("Command: {}", invocation.command_line());

        let status = Command::new(&invocation.program)
            .args(invocation.args.iter().map(OsStr::new))
            .stdin(Stdio::null())
            .status()
            .await?;

        if !status.success() {
            return Err(GisError::ToolFailed {
                program: invocation.program_name(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

/// Prints invocations instead of running them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl ToolRunner for DryRunRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        println!("{}", invocation.command_line());
        Ok(())
    }
}

/// Resolve a tool name or path to an executable on `PATH`.
pub fn locate_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| {
        GisError::ToolNotFound(format!(
            "{} not found. Install GDAL (e.g. apt install gdal-bin, brew install gdal) \
             or set its path in the [ogr] config section",
            name
        ))
    })
}
