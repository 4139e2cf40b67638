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

//! The plugin-side dispatcher.
//!
//! A `Server` answers the two introspection flags itself and routes every
//! other invocation to the serve function registered for the matching
//! procedure. The easiest way to run one as a process is `plugin::main`.

use crate::core::constants::protocol::PROTOCOL_VERSION;
use crate::core::errors::PluginRpcError;
use crate::plugin::env::Env;
use crate::plugin::registrar::{ServeFn, ServerRegistrar};
use crate::protocol::flags::{protocol_flag, spec_flag};
use crate::protocol::spec::Spec;
use std::collections::HashMap;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Options for a new `Server`.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Namespace for the introspection flags. With prefix `foo` the server
    /// answers `--foo-plugin-protocol` and `--foo-plugin-spec` instead of
    /// `--plugin-protocol` and `--plugin-spec`.
    pub flag_prefix: Option<String>,
}

pub struct Server {
    spec: Spec,
    flag_prefix: Option<String>,
    path_to_serve_fn: HashMap<String, ServeFn>,
}

impl Server {
    /// Builds a server, checking that every procedure in the Spec has exactly
    /// one registered serve function and that nothing else is registered.
    ///
    /// The registrar is consumed; nothing can be registered afterwards.
    pub fn new(
        spec: Spec,
        registrar: ServerRegistrar,
        config: ServerConfig,
    ) -> Result<Self, PluginRpcError> {
        let path_to_serve_fn = registrar.path_to_serve_fn()?;

        let mut registered_paths: Vec<&String> = path_to_serve_fn.keys().collect();
        registered_paths.sort();
        for path in registered_paths {
            if spec.procedure_for_path(path).is_none() {
                return Err(PluginRpcError::PathNotInSpec(path.clone()));
            }
        }
        for procedure in spec.procedures() {
            if !path_to_serve_fn.contains_key(procedure.path()) {
                return Err(PluginRpcError::PathNotRegistered(
                    procedure.path().to_string(),
                ));
            }
        }
        Ok(Self {
            spec,
            flag_prefix: config.flag_prefix.filter(|prefix| !prefix.is_empty()),
            path_to_serve_fn,
        })
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    pub fn flag_prefix(&self) -> Option<&str> {
        self.flag_prefix.as_deref()
    }

    /// Serves one invocation.
    pub async fn serve(&self, ctx: CancellationToken, mut env: Env) -> Result<(), PluginRpcError> {
        if let [arg] = env.args.as_slice() {
            if *arg == protocol_flag(self.flag_prefix()) {
                env.stdout
                    .write_all(format!("{}\n", PROTOCOL_VERSION).as_bytes())
                    .await?;
                env.stdout.flush().await?;
                return Ok(());
            }
            if *arg == spec_flag(self.flag_prefix()) {
                let mut data = serde_json::to_vec(&self.spec.to_wire())?;
                data.push(b'\n');
                env.stdout.write_all(&data).await?;
                env.stdout.flush().await?;
                return Ok(());
            }
        }

        // Spec validation guarantees at most one procedure matches.
        let procedure = self
            .spec
            .procedure_for_args(&env.args)
            .ok_or_else(|| PluginRpcError::UnrecognizedArgs(env.args.clone()))?;
        let serve_fn = self
            .path_to_serve_fn
            .get(procedure.path())
            .cloned()
            .ok_or_else(|| PluginRpcError::PathNotRegistered(procedure.path().to_string()))?;

        debug!("Dispatching {:?} to {}", env.args, procedure.path());
        serve_fn(ctx, env).await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("spec", &self.spec)
            .field("flag_prefix", &self.flag_prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::env::memory_env;
    use crate::protocol::models::WireSpec;
    use crate::protocol::procedure::Procedure;
    use tokio::io::AsyncReadExt;

    fn test_spec() -> Spec {
        Spec::new(vec![
            Procedure::with_args("/svc/Echo", ["echo", "request"]).unwrap(),
            Procedure::new("/svc/List").unwrap(),
        ])
        .unwrap()
    }

    fn marker_registrar(paths: &[&str]) -> ServerRegistrar {
        let registrar = ServerRegistrar::new();
        for path in paths {
            let marker = path.to_string();
            registrar.register(*path, move |_ctx, mut env: Env| {
                let marker = marker.clone();
                async move {
                    env.stdout.write_all(marker.as_bytes()).await?;
                    Ok::<(), PluginRpcError>(())
                }
            });
        }
        registrar
    }

    fn test_server(config: ServerConfig) -> Server {
        Server::new(
            test_spec(),
            marker_registrar(&["/svc/Echo", "/svc/List"]),
            config,
        )
        .unwrap()
    }

    async fn run(server: &Server, args: &[&str]) -> Result<String, PluginRpcError> {
        let (env, mut stdout) = memory_env(args, Vec::new());
        server.serve(CancellationToken::new(), env).await?;
        let mut out = String::new();
        stdout.read_to_string(&mut out).await?;
        Ok(out)
    }

    #[tokio::test]
    async fn test_protocol_flag() {
        let server = test_server(ServerConfig::default());
        assert_eq!(run(&server, &["--plugin-protocol"]).await.unwrap(), "1\n");
    }

    #[tokio::test]
    async fn test_spec_flag() {
        let server = test_server(ServerConfig::default());
        let out = run(&server, &["--plugin-spec"]).await.unwrap();
        assert!(out.ends_with('\n'));
        let wire: WireSpec = serde_json::from_str(&out).unwrap();
        assert_eq!(Spec::from_wire(wire).unwrap(), test_spec());
    }

    #[tokio::test]
    async fn test_flag_prefix() {
        let server = test_server(ServerConfig {
            flag_prefix: Some("foo".to_string()),
        });
        assert_eq!(
            run(&server, &["--foo-plugin-protocol"]).await.unwrap(),
            "1\n"
        );
        assert!(run(&server, &["--foo-plugin-spec"]).await.is_ok());
        for flag in ["--plugin-protocol", "--plugin-spec"] {
            assert!(matches!(
                run(&server, &[flag]).await,
                Err(PluginRpcError::UnrecognizedArgs(args)) if args == vec![flag.to_string()]
            ));
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_args_and_path() {
        let server = test_server(ServerConfig::default());
        assert_eq!(run(&server, &["echo", "request"]).await.unwrap(), "/svc/Echo");
        assert_eq!(run(&server, &["/svc/Echo"]).await.unwrap(), "/svc/Echo");
        assert_eq!(run(&server, &["/svc/List"]).await.unwrap(), "/svc/List");
    }

    #[tokio::test]
    async fn test_unrecognized_args() {
        let server = test_server(ServerConfig::default());
        for args in [
            vec![],
            vec!["echo"],
            vec!["echo", "request", "extra"],
            vec!["/svc/List", "x"],
            vec!["list"],
        ] {
            assert!(
                matches!(
                    run(&server, &args).await,
                    Err(PluginRpcError::UnrecognizedArgs(_))
                ),
                "args {:?} should not be recognized",
                args
            );
        }
    }

    #[test]
    fn test_unregistered_procedure_fails_construction() {
        let err = Server::new(
            test_spec(),
            marker_registrar(&["/svc/Echo"]),
            ServerConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PluginRpcError::PathNotRegistered(path) if path == "/svc/List"));
    }

    #[test]
    fn test_registered_path_outside_spec_fails_construction() {
        let err = Server::new(
            test_spec(),
            marker_registrar(&["/svc/Echo", "/svc/List", "/svc/Extra"]),
            ServerConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PluginRpcError::PathNotInSpec(path) if path == "/svc/Extra"));
    }

    #[test]
    fn test_registrar_errors_fail_construction() {
        let registrar = marker_registrar(&["/svc/Echo", "/svc/List"]);
        registrar.register("/svc/List", |_ctx, _env: Env| async {
            Ok::<(), PluginRpcError>(())
        });
        let err = Server::new(test_spec(), registrar, ServerConfig::default()).unwrap_err();
        assert!(matches!(err, PluginRpcError::Registration(_)));
    }
}
