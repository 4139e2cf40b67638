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

//! Client side of the protocol.
//!
//! A `Client` discovers the plugin's Spec once (protocol version check, then
//! the Spec flag) and then turns `call(path, request)` into an invocation of
//! the procedure's argument vector through its `Runner`.

use crate::core::constants::protocol::PROTOCOL_VERSION;
use crate::core::errors::PluginRpcError;
use crate::core::status::{Code, Error};
use crate::plugin::runner::{RunOutput, Runner};
use crate::protocol::envelope::{marshal_request, unmarshal_response, Message};
use crate::protocol::flags::{protocol_flag, spec_flag};
use crate::protocol::models::WireSpec;
use crate::protocol::spec::Spec;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Options for a new `Client`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Must match the flag prefix the plugin's server was built with.
    pub flag_prefix: Option<String>,
}

pub struct Client {
    runner: Arc<dyn Runner>,
    flag_prefix: Option<String>,
    spec: OnceCell<Spec>,
}

impl Client {
    pub fn new(runner: impl Runner + 'static, config: ClientConfig) -> Self {
        Self::from_arc(Arc::new(runner), config)
    }

    pub fn from_arc(runner: Arc<dyn Runner>, config: ClientConfig) -> Self {
        Self {
            runner,
            flag_prefix: config.flag_prefix.filter(|prefix| !prefix.is_empty()),
            spec: OnceCell::new(),
        }
    }

    /// The plugin's Spec, fetched on first use.
    pub async fn spec(&self, ctx: &CancellationToken) -> Result<&Spec, Error> {
        Ok(self
            .spec
            .get_or_try_init(|| self.load_spec(ctx))
            .await?)
    }

    /// Calls the procedure at `path`. A `None` request sends an envelope
    /// without a body, which the plugin decodes as the default request.
    pub async fn call<Req, Res>(
        &self,
        ctx: &CancellationToken,
        path: &str,
        request: Option<&Req>,
    ) -> Result<Res, Error>
    where
        Req: Message + Sync,
        Res: Message,
    {
        let spec = self.spec(ctx).await?;
        let procedure = spec.procedure_for_path(path).ok_or_else(|| {
            Error::new(
                Code::Unimplemented,
                format!("procedure unimplemented: {:?}", path),
            )
        })?;
        let data = marshal_request(request)?;
        let args = procedure.invocation_args();
        debug!("Calling {} with args {:?}", path, args);

        let output = self.runner.run(ctx, args, data).await?;
        let response = unmarshal_response::<Res>(&output.stdout)?;
        if !output.success() {
            return Err(exit_failure(&output).into());
        }
        Ok(response)
    }

    async fn load_spec(&self, ctx: &CancellationToken) -> Result<Spec, PluginRpcError> {
        let output = self
            .runner
            .run(ctx, vec![protocol_flag(self.flag_prefix.as_deref())], Vec::new())
            .await?;
        if !output.success() {
            return Err(exit_failure(&output));
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.parse::<u32>().ok() != Some(PROTOCOL_VERSION) {
            return Err(PluginRpcError::ProtocolVersion(version));
        }

        let output = self
            .runner
            .run(ctx, vec![spec_flag(self.flag_prefix.as_deref())], Vec::new())
            .await?;
        if !output.success() {
            return Err(exit_failure(&output));
        }
        let wire: WireSpec = serde_json::from_slice(&output.stdout)?;
        let spec = Spec::from_wire(wire)?;
        debug!("Discovered {} procedures", spec.procedures().len());
        Ok(spec)
    }
}

fn exit_failure(output: &RunOutput) -> PluginRpcError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        PluginRpcError::Process(format!("plugin exited with code {}", output.exit_code))
    } else {
        PluginRpcError::Process(format!(
            "plugin exited with code {}: {}",
            output.exit_code, stderr
        ))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("flag_prefix", &self.flag_prefix)
            .field("spec", &self.spec.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers the discovery flags with canned output and counts calls.
    struct FakeRunner {
        version: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Runner for FakeRunner {
        async fn run(
            &self,
            _ctx: &CancellationToken,
            args: Vec<String>,
            _stdin: Vec<u8>,
        ) -> Result<RunOutput, PluginRpcError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let stdout = match args.first().map(String::as_str) {
                Some("--plugin-protocol") => format!("{}\n", self.version).into_bytes(),
                Some("--plugin-spec") => br#"{"procedures":[{"path":"/svc/Echo"}]}"#.to_vec(),
                _ => {
                    return Ok(RunOutput {
                        exit_code: 2,
                        stderr: b"boom\n".to_vec(),
                        ..Default::default()
                    })
                }
            };
            Ok(RunOutput {
                stdout,
                ..Default::default()
            })
        }
    }

    fn fake(version: &'static str) -> Arc<FakeRunner> {
        Arc::new(FakeRunner {
            version,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_spec_cached() {
        let runner = fake("1");
        let client = Client::from_arc(runner.clone(), ClientConfig::default());
        let ctx = CancellationToken::new();
        assert_eq!(client.spec(&ctx).await.unwrap().procedures().len(), 1);
        client.spec(&ctx).await.unwrap();
        assert_eq!(runner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unsupported_protocol_version() {
        let client = Client::from_arc(fake("2"), ClientConfig::default());
        let err = client.spec(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.code(), Code::FailedPrecondition);
        assert!(err.to_string().contains("\"2\""));
    }

    #[tokio::test]
    async fn test_non_zero_exit_without_envelope() {
        #[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
        struct Empty {}
        impl Message for Empty {
            const TYPE_NAME: &'static str = "test.v1.Empty";
        }

        let client = Client::from_arc(fake("1"), ClientConfig::default());
        let err = client
            .call::<Empty, Empty>(&CancellationToken::new(), "/svc/Echo", None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::Unknown);
        assert!(err.to_string().contains("plugin exited with code 2: boom"));
    }
}
