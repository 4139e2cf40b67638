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

//! The process-boundary view a server operates on.

use crate::core::errors::PluginRpcError;
use std::ffi::OsString;
use std::io::IsTerminal;
use tokio::io::{AsyncRead, AsyncWrite};

pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;
pub type BoxWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Arguments and standard streams of one invocation.
///
/// Servers read nothing from process globals; everything comes through an
/// `Env`, which lets the same server run as a real process or in memory.
pub struct Env {
    pub args: Vec<String>,
    pub stdin: BoxReader,
    pub stdout: BoxWriter,
    pub stderr: BoxWriter,
    /// Set when stdin is an interactive terminal. Handlers then treat the
    /// request as empty instead of blocking on a read.
    pub stdin_is_terminal: bool,
}

impl Env {
    pub fn new(args: Vec<String>, stdin: BoxReader, stdout: BoxWriter) -> Self {
        Self {
            args,
            stdin,
            stdout,
            stderr: Box::new(tokio::io::sink()),
            stdin_is_terminal: false,
        }
    }

    /// The current process's arguments (without the program name) and
    /// standard streams.
    ///
    /// Arguments that are not valid UTF-8 can never name a procedure, so they
    /// fail as unrecognized.
    pub fn from_process() -> Result<Self, PluginRpcError> {
        Ok(Self {
            args: process_args(std::env::args_os().skip(1))?,
            stdin: Box::new(tokio::io::stdin()),
            stdout: Box::new(tokio::io::stdout()),
            stderr: Box::new(tokio::io::stderr()),
            stdin_is_terminal: std::io::stdin().is_terminal(),
        })
    }

    pub fn with_stderr(mut self, stderr: BoxWriter) -> Self {
        self.stderr = stderr;
        self
    }

    pub fn with_stdin_is_terminal(mut self, stdin_is_terminal: bool) -> Self {
        self.stdin_is_terminal = stdin_is_terminal;
        self
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("args", &self.args)
            .field("stdin_is_terminal", &self.stdin_is_terminal)
            .finish_non_exhaustive()
    }
}

fn process_args<I>(args_os: I) -> Result<Vec<String>, PluginRpcError>
where
    I: IntoIterator<Item = OsString>,
{
    let args_os: Vec<OsString> = args_os.into_iter().collect();
    if args_os.iter().all(|arg| arg.to_str().is_some()) {
        return Ok(args_os
            .into_iter()
            .filter_map(|arg| arg.into_string().ok())
            .collect());
    }
    Err(PluginRpcError::UnrecognizedArgs(
        args_os
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect(),
    ))
}

/// An in-memory `Env` plus the read side of its stdout.
#[cfg(test)]
pub(crate) fn memory_env(args: &[&str], stdin: Vec<u8>) -> (Env, tokio::io::DuplexStream) {
    let (stdout_writer, stdout_reader) =
        tokio::io::duplex(crate::core::constants::limits::IN_PROCESS_PIPE_BYTES);
    let env = Env::new(
        args.iter().map(|arg| arg.to_string()).collect(),
        Box::new(std::io::Cursor::new(stdin)),
        Box::new(stdout_writer),
    );
    (env, stdout_reader)
}
