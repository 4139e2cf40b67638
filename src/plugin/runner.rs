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

//! Execution strategies used by a `Client` to realize a call.

use crate::core::constants::limits::IN_PROCESS_PIPE_BYTES;
use crate::core::errors::PluginRpcError;
use crate::core::exit::ExitError;
use crate::plugin::env::Env;
use crate::plugin::server::Server;
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

/// What a plugin invocation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a plugin once: argument vector and request bytes in, output out.
///
/// A non-zero exit is not a runner failure; it is reported in `RunOutput`.
/// Runner errors are reserved for failures to run the plugin at all.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(
        &self,
        ctx: &CancellationToken,
        args: Vec<String>,
        stdin: Vec<u8>,
    ) -> Result<RunOutput, PluginRpcError>;
}

/// Calls a `Server` directly against an in-memory `Env`.
#[derive(Debug, Clone)]
pub struct ServerRunner {
    server: Arc<Server>,
}

impl ServerRunner {
    pub fn new(server: Server) -> Self {
        Self {
            server: Arc::new(server),
        }
    }

    pub fn from_arc(server: Arc<Server>) -> Self {
        Self { server }
    }
}

#[async_trait]
impl Runner for ServerRunner {
    async fn run(
        &self,
        ctx: &CancellationToken,
        args: Vec<String>,
        stdin: Vec<u8>,
    ) -> Result<RunOutput, PluginRpcError> {
        let (stdout_writer, mut stdout_reader) = tokio::io::duplex(IN_PROCESS_PIPE_BYTES);
        let env = Env::new(args, Box::new(Cursor::new(stdin)), Box::new(stdout_writer));

        // The server drops the env when it finishes, which ends the stdout
        // stream; read concurrently so large responses cannot fill the pipe.
        let serve = self.server.serve(ctx.clone(), env);
        let read = async {
            let mut out = Vec::new();
            stdout_reader.read_to_end(&mut out).await.map(|_| out)
        };
        let (result, stdout) = tokio::join!(serve, read);

        let stderr = match &result {
            Err(err) => format!("{}\n", err).into_bytes(),
            Ok(()) => Vec::new(),
        };
        Ok(RunOutput {
            stdout: stdout?,
            stderr,
            exit_code: ExitError::from_result(result).exit_code(),
        })
    }
}
