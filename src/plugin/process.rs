// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runs a plugin as a child process.
//!
//! Every call spawns a fresh process. The child never outlives the call:
//! it is killed when the call is canceled or its future is dropped, and on
//! Linux also when this process dies.

use crate::core::constants::limits::MAX_MESSAGE_SIZE_BYTES;
use crate::core::errors::PluginRpcError;
use crate::plugin::runner::{RunOutput, Runner};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    base_args: Vec<String>,
}

impl ProcessRunner {
    /// Runs `program`, resolved through `PATH` when it is a bare name.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Arguments placed before the procedure arguments on every call.
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(target_os = "linux")]
        // SAFETY: prctl(PR_SET_PDEATHSIG) only touches the calling (child)
        // process and is async-signal-safe, so it is valid between fork and exec.
        unsafe {
            command.pre_exec(|| {
                // Send SIGKILL to the plugin if we die mid-call
                let ret = libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL);
                if ret != 0 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        command
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn run(
        &self,
        ctx: &CancellationToken,
        args: Vec<String>,
        stdin: Vec<u8>,
    ) -> Result<RunOutput, PluginRpcError> {
        debug!(
            "ProcessRunner: spawning '{}' with args {:?}",
            self.program.display(),
            args
        );

        let mut child = self.command(&args).spawn().map_err(|e| {
            PluginRpcError::Process(format!(
                "Failed to spawn plugin '{}': {}",
                self.program.display(),
                e
            ))
        })?;
        let mut child_stdin = child
            .stdin
            .take()
            .ok_or_else(|| PluginRpcError::Process("plugin stdin was not piped".to_string()))?;
        let child_stdout = child
            .stdout
            .take()
            .ok_or_else(|| PluginRpcError::Process("plugin stdout was not piped".to_string()))?;
        let child_stderr = child
            .stderr
            .take()
            .ok_or_else(|| PluginRpcError::Process("plugin stderr was not piped".to_string()))?;

        let write_request = async move {
            match child_stdin.write_all(&stdin).await {
                // The plugin may exit without reading its input.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("Plugin closed stdin before reading the request");
                    Ok(())
                }
                other => other.map_err(PluginRpcError::from),
            }
            // child_stdin is dropped here, closing the pipe.
        };
        let wait = async { child.wait().await.map_err(PluginRpcError::from) };
        let call = async {
            tokio::try_join!(
                write_request,
                read_limited(child_stdout),
                read_limited(child_stderr),
                wait
            )
        };

        // Any early return drops the child, which kills it.
        let (_, stdout, stderr, status) = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                warn!("Call to '{}' canceled, killing plugin", self.program.display());
                return Err(PluginRpcError::Canceled);
            }
            output = call => output?,
        };

        for line in String::from_utf8_lossy(&stderr).lines() {
            let line = line.trim();
            if !line.is_empty() {
                debug!("plugin stderr: {}", line);
            }
        }

        let exit_code = match status.code() {
            Some(code) => code,
            None => {
                warn!("Plugin '{}' terminated by signal", self.program.display());
                -1
            }
        };
        Ok(RunOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}

/// Reads a plugin output stream, failing as soon as it outgrows the
/// envelope size limit.
async fn read_limited<R: AsyncRead + Unpin>(reader: R) -> Result<Vec<u8>, PluginRpcError> {
    let mut data = Vec::new();
    reader
        .take(MAX_MESSAGE_SIZE_BYTES + 1)
        .read_to_end(&mut data)
        .await?;
    let size = data.len() as u64;
    if size > MAX_MESSAGE_SIZE_BYTES {
        return Err(PluginRpcError::MessageTooLarge {
            size,
            limit: MAX_MESSAGE_SIZE_BYTES,
        });
    }
    Ok(data)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ProcessRunner {
        ProcessRunner::new("sh").with_base_args(["-c", script, "sh"])
    }

    #[tokio::test]
    async fn test_stdin_and_exit_code() {
        let runner = sh("cat; echo \"args: $*\" >&2; exit 3");
        let output = runner
            .run(
                &CancellationToken::new(),
                vec!["echo".to_string(), "request".to_string()],
                b"ping".to_vec(),
            )
            .await
            .unwrap();
        assert_eq!(output.stdout, b"ping");
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, b"args: echo request\n");
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_unread_stdin_is_not_an_error() {
        let runner = sh("exit 0");
        let output = runner
            .run(&CancellationToken::new(), Vec::new(), vec![b'x'; 1 << 20])
            .await
            .unwrap();
        assert!(output.success());
    }

    #[tokio::test]
    async fn test_cancel_kills_plugin() {
        let runner = sh("sleep 30");
        let ctx = CancellationToken::new();
        let cancel = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            cancel.cancel();
        });
        let err = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            runner.run(&ctx, Vec::new(), Vec::new()),
        )
        .await
        .expect("cancel should end the call")
        .unwrap_err();
        assert!(matches!(err, PluginRpcError::Canceled));
    }

    #[tokio::test]
    async fn test_oversized_output_rejected() {
        let runner = sh("head -c 11000000 /dev/zero");
        let err = runner
            .run(&CancellationToken::new(), Vec::new(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PluginRpcError::MessageTooLarge { size, limit } if size == limit + 1
        ));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = ProcessRunner::new("/nonexistent/pluginrpc-plugin");
        let err = runner
            .run(&CancellationToken::new(), Vec::new(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PluginRpcError::Process(_)));
    }
}
