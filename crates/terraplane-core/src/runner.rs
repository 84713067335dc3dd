//! Supervised external command execution.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::error::CoreError;

/// Upper bound on captured combined output. Output beyond this limit is
/// dropped and replaced with a truncation marker; the streams are still
/// drained so the child never blocks on a full pipe.
const MAX_CAPTURE_BYTES: usize = 1024 * 1024;

const TRUNCATION_MARKER: &str = "\n[output truncated]\n";

/// Spawns an external binary in a working directory, captures combined
/// stdout/stderr, enforces a timeout, and classifies the exit code.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    binary: PathBuf,
}

impl CommandRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run `<binary> <command> <args...>` in `working_dir`.
    ///
    /// stderr is merged into the same capture buffer as stdout. A child
    /// still running when `run_timeout` fires is killed and the call fails
    /// with [`CoreError::Timeout`]; a non-zero exit fails with
    /// [`CoreError::NonZeroExit`] carrying the captured output.
    pub async fn run(
        &self,
        command: &str,
        args: &[String],
        working_dir: &Path,
        run_timeout: Duration,
    ) -> Result<String, CoreError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(command)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            binary = %self.binary.display(),
            command = %command,
            dir = %working_dir.display(),
            "Spawning command"
        );

        let mut child = cmd.spawn().map_err(|e| {
            CoreError::Process(format!(
                "Failed to spawn {}: {}",
                self.binary.display(),
                e
            ))
        })?;

        let buffer = Arc::new(Mutex::new(String::new()));
        let stdout_task = spawn_reader(child.stdout.take(), buffer.clone());
        let stderr_task = spawn_reader(child.stderr.take(), buffer.clone());

        let status = match timeout(run_timeout, child.wait()).await {
            Ok(result) => result
                .map_err(|e| CoreError::Process(format!("Failed to wait for process: {}", e)))?,
            Err(_) => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(CoreError::Timeout(run_timeout.as_secs()));
            }
        };

        let _ = stdout_task.await;
        let _ = stderr_task.await;

        let output = buffer.lock().await.clone();
        let code = status.code().unwrap_or(-1);

        if code != 0 {
            return Err(CoreError::NonZeroExit { code, output });
        }
        Ok(output)
    }
}

/// Drain a child stream line-by-line into the shared capture buffer.
fn spawn_reader<R>(
    stream: Option<R>,
    buffer: Arc<Mutex<String>>,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Some(stream) = stream {
            let mut lines = BufReader::new(stream).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let mut buf = buffer.lock().await;
                if buf.len() >= MAX_CAPTURE_BYTES {
                    if !buf.ends_with(TRUNCATION_MARKER) {
                        buf.push_str(TRUNCATION_MARKER);
                    }
                    continue;
                }
                buf.push_str(&line);
                buf.push('\n');
            }
        }
    })
}
