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

//! Process entry point for plugin binaries.

use crate::config::{Config, LogFormat};
use crate::core::constants::config::DEFAULT_LOG_LEVEL;
use crate::core::errors::PluginRpcError;
use crate::core::exit::ExitError;
use crate::plugin::env::Env;
use crate::plugin::server::Server;
use std::io::IsTerminal;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Runs the server built by `new_server` against the process's arguments
/// and stdio, then exits with the code of the resulting error.
///
/// A failure is also printed to stderr; stdout only ever carries the
/// protocol's output.
pub fn main<F>(new_server: F) -> !
where
    F: FnOnce() -> Result<Server, PluginRpcError>,
{
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(PluginRpcError::from)
        .and_then(|runtime| runtime.block_on(run(new_server)));

    if let Err(err) = &result {
        let message = err.to_string();
        if !message.is_empty() {
            eprintln!("{}", message);
        }
    }
    std::process::exit(ExitError::from_result(result).exit_code())
}

/// Async half of `main`, for binaries that manage their own runtime.
///
/// Ctrl-C cancels the context handed to the serve function.
pub async fn run<F>(new_server: F) -> Result<(), PluginRpcError>
where
    F: FnOnce() -> Result<Server, PluginRpcError>,
{
    let config = Config::from_env()?;
    init_tracing(&config);

    let server = new_server()?;
    let ctx = CancellationToken::new();
    let signal_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling");
            signal_ctx.cancel();
        }
    });

    let env = Env::from_process()?;
    let result = server.serve(ctx, env).await;
    if let Err(e) = &result {
        debug!("Plugin invocation failed: {}", e);
    }
    result
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    let result = match config.log_format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Text => subscriber.try_init(),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize tracing: {}", e);
    }
}
