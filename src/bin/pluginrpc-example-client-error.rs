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

// Example client: asks the echo plugin to fail and exits with the plugin's
// error code.
use anyhow::Context;
use clap::Parser;
use pluginrpc::example::messages::EchoErrorRequest;
use pluginrpc::example::EchoServiceClient;
use pluginrpc::plugin::{Client, ClientConfig, ProcessRunner};
use pluginrpc::{Code, Error};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Echo plugin to invoke
    #[arg(long, default_value = "pluginrpc-example-server")]
    server: PathBuf,

    /// Error code the plugin should fail with
    #[arg(allow_negative_numbers = true)]
    code: i32,

    /// Error message, joined with spaces
    message: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let message = format!("{:#}", e);
        if !message.is_empty() {
            eprintln!("{}", message);
        }
        let code = e
            .downcast_ref::<Error>()
            .map(Error::code)
            .unwrap_or(Code::Unknown);
        std::process::exit(code.exit_code());
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = Client::new(ProcessRunner::new(cli.server.clone()), ClientConfig::default());
    let echo_client = EchoServiceClient::new(client);
    let request = EchoErrorRequest {
        code: cli.code,
        message: cli.message.join(" "),
    };
    echo_client
        .echo_error(&CancellationToken::new(), &request)
        .await
        .map(|_| ())
        .with_context(|| format!("echo error via {}", cli.server.display()))
}
