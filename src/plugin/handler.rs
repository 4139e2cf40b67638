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

//! Server-side envelope handling for a single procedure call.
//!
//! Reads the request envelope from stdin, runs the procedure implementation,
//! and writes either a response envelope (newline-terminated) or an
//! error-only envelope to stdout.

use crate::core::constants::limits::MAX_MESSAGE_SIZE_BYTES;
use crate::core::errors::PluginRpcError;
use crate::core::status::Error;
use crate::plugin::env::Env;
use crate::protocol::envelope::{
    marshal_error_response, marshal_response, unmarshal_request, Message,
};
use std::future::Future;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Handles requests on the server side. Used by service registration code.
#[derive(Debug, Clone, Default)]
pub struct Handler {
    _private: (),
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one procedure call against `env`.
    ///
    /// On failure an error-only envelope is written and the failure is
    /// returned so the caller can derive an exit code. A response is never
    /// written together with an error.
    pub async fn handle<Req, Res, F, Fut>(
        &self,
        ctx: CancellationToken,
        mut env: Env,
        handle: F,
    ) -> Result<(), PluginRpcError>
    where
        Req: Message,
        Res: Message,
        F: FnOnce(CancellationToken, Req) -> Fut,
        Fut: Future<Output = Result<Res, Error>>,
    {
        match Self::handle_inner(ctx, &mut env, handle).await {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("Procedure failed: {}", err);
                write_error(&mut env, &err).await?;
                Err(err)
            }
        }
    }

    async fn handle_inner<Req, Res, F, Fut>(
        ctx: CancellationToken,
        env: &mut Env,
        handle: F,
    ) -> Result<(), PluginRpcError>
    where
        Req: Message,
        Res: Message,
        F: FnOnce(CancellationToken, Req) -> Fut,
        Fut: Future<Output = Result<Res, Error>>,
    {
        let data = read_stdin(env).await?;
        let request: Req = unmarshal_request(&data)?;
        let response = handle(ctx, request).await?;
        let mut data = marshal_response(&response)?;
        // Newline so the plugin behaves nicely when run by hand.
        data.push(b'\n');
        trace!("Writing {} byte response", data.len());
        env.stdout.write_all(&data).await?;
        env.stdout.flush().await?;
        Ok(())
    }
}

async fn write_error(env: &mut Env, err: &PluginRpcError) -> Result<(), PluginRpcError> {
    let data = match err {
        PluginRpcError::Rpc(rpc_err) => marshal_error_response(rpc_err)?,
        other => marshal_error_response(&Error::new(other.code(), other.to_string()))?,
    };
    env.stdout.write_all(&data).await?;
    env.stdout.flush().await?;
    Ok(())
}

/// Reads the whole request, unless stdin is a terminal: then nobody is
/// piping a request in and a read would block forever.
async fn read_stdin(env: &mut Env) -> Result<Vec<u8>, PluginRpcError> {
    if env.stdin_is_terminal {
        return Ok(Vec::new());
    }
    let mut data = Vec::new();
    (&mut env.stdin)
        .take(MAX_MESSAGE_SIZE_BYTES + 1)
        .read_to_end(&mut data)
        .await?;
    Ok(data)
}
