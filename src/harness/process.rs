use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::HarnessError;
use crate::Result;

/// Exit status and captured streams of a finished CLI invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Runs `program` to completion with stdin closed.
///
/// # Errors
/// [`HarnessError::Spawn`] if the program cannot be started. A non-zero exit
/// is reported through [`CommandOutput::code`], not as an error.
pub async fn exec<I, S>(
    program: &str,
    args: I,
    cwd: Option<&Path>,
) -> Result<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    debug!("exec: {:?}", cmd.as_std());

    let output = cmd.output().await.map_err(|source| HarnessError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let result = CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(code = ?result.code, "exec finished");
    Ok(result)
}

/// Like [`exec`], but a non-zero exit becomes [`HarnessError::CommandFailed`]
pub async fn exec_checked(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
) -> Result<CommandOutput> {
    let output = exec(program, args, cwd).await?;
    if !output.success() {
        return Err(HarnessError::CommandFailed {
            command: render_command(program, args),
            code: output.code,
            output: output.combined(),
        }
        .into());
    }
    Ok(output)
}

pub(crate) fn render_command(
    program: &str,
    args: &[String],
) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
