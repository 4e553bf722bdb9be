//! A tool for executing commands.

use crate::error::{Error, Result};
use log::{debug, trace};
use std::path::PathBuf;

/// Represents a command executor.
///
/// # Example
///
/// ```rust,no_run
/// # use std::path::PathBuf;
/// # use tubetag::executor::Executor;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Executor {
///     executable_path: PathBuf::from("yt-dlp"),
///     args: vec!["--version".to_string()],
/// };
///
/// let output = executor.execute().await?;
/// println!("Output: {}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Executor {
    /// The path to the command executable.
    pub executable_path: PathBuf,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
}

/// Represents the output of a process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// The stdout of the process.
    pub stdout: String,
    /// The stderr of the process.
    pub stderr: String,
    /// The exit code of the process.
    pub code: i32,
}

impl Executor {
    /// Executes the command and returns the output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be spawned, or if it exited with a non-zero code.
    pub async fn execute(&self) -> Result<ProcessOutput> {
        debug!("Executing command: {:?} {:?}", self.executable_path, self.args);

        let mut command = tokio::process::Command::new(&self.executable_path);
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());
        command.stdin(std::process::Stdio::null());

        #[cfg(target_os = "windows")]
        {
            command.creation_flags(0x08000000);
        }

        command.args(&self.args);
        let mut child = command.spawn()?;

        // Both pipes are drained while the process runs, the info JSON on stdout can be large.
        let stdout_handle = child
            .stdout
            .take()
            .ok_or_else(|| Error::Command("Failed to capture stdout".to_string()))?;
        let stderr_handle = child
            .stderr
            .take()
            .ok_or_else(|| Error::Command("Failed to capture stderr".to_string()))?;

        let stdout_task = async move {
            let mut buffer = Vec::new();
            tokio::io::copy(&mut tokio::io::BufReader::new(stdout_handle), &mut buffer).await?;
            Ok::<Vec<u8>, std::io::Error>(buffer)
        };
        let stderr_task = async move {
            let mut buffer = Vec::new();
            tokio::io::copy(&mut tokio::io::BufReader::new(stderr_handle), &mut buffer).await?;
            Ok::<Vec<u8>, std::io::Error>(buffer)
        };

        let (exit_status, stdout_result, stderr_result) =
            tokio::join!(child.wait(), stdout_task, stderr_task);
        let exit_status = exit_status?;

        let stdout = String::from_utf8_lossy(&stdout_result?).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_result?).into_owned();

        let code = exit_status.code().unwrap_or(-1);
        trace!("Process exited with code {}", code);

        if exit_status.success() {
            return Ok(ProcessOutput {
                stdout,
                stderr,
                code,
            });
        }

        Err(Error::Command(format!(
            "Process failed with code {}: {}",
            code,
            stderr.trim()
        )))
    }
}
