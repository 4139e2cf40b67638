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

//! Write-once collection of serve functions, keyed by procedure path.
//!
//! Registration is split out from the `Server` so that the server itself can
//! be immutable. Registration code runs unconditionally and never checks a
//! return value: failures are accumulated and reported once, when the server
//! reads the registrar.

use crate::core::errors::{PluginRpcError, RegistrationError, RegistrationErrors};
use crate::plugin::env::Env;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Serves one procedure against an `Env`.
pub type ServeFn =
    Arc<dyn Fn(CancellationToken, Env) -> BoxFuture<'static, Result<(), PluginRpcError>> + Send + Sync>;

#[derive(Default)]
struct RegistrarState {
    path_to_serve_fn: HashMap<String, ServeFn>,
    errors: Vec<RegistrationError>,
    read: bool,
}

/// Collects serve functions before a `Server` is built.
///
/// Safe to share between threads during setup. Constructing a `Server`
/// consumes the registrar.
#[derive(Default)]
pub struct ServerRegistrar {
    state: Mutex<RegistrarState>,
}

impl ServerRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the serve function for a path. Paths must be unique.
    pub fn register<F, Fut>(&self, path: impl Into<String>, serve: F)
    where
        F: Fn(CancellationToken, Env) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), PluginRpcError>> + Send + 'static,
    {
        let serve_fn: ServeFn =
            Arc::new(move |ctx: CancellationToken, env: Env| serve(ctx, env).boxed());
        self.register_serve_fn(path.into(), serve_fn);
    }

    fn register_serve_fn(&self, path: String, serve_fn: ServeFn) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.read {
            warn!("Registration of {:?} after registrar was used", path);
            state.errors.push(RegistrationError::AlreadyUsed);
            return;
        }
        if state.path_to_serve_fn.contains_key(&path) {
            warn!("Duplicate registration of {:?}", path);
            state.errors.push(RegistrationError::DuplicatePath(path));
            return;
        }
        state.path_to_serve_fn.insert(path, serve_fn);
    }

    /// Freezes the registrar and returns the mapping, or every accumulated
    /// registration error joined together.
    pub(crate) fn path_to_serve_fn(&self) -> Result<HashMap<String, ServeFn>, PluginRpcError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.read = true;
        if !state.errors.is_empty() {
            return Err(PluginRpcError::Registration(RegistrationErrors(
                state.errors.clone(),
            )));
        }
        Ok(state.path_to_serve_fn.clone())
    }
}

impl std::fmt::Debug for ServerRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut paths: Vec<&String> = state.path_to_serve_fn.keys().collect();
        paths.sort();
        f.debug_struct("ServerRegistrar")
            .field("paths", &paths)
            .field("errors", &state.errors)
            .field("read", &state.read)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(_ctx: CancellationToken, _env: Env) -> Result<(), PluginRpcError> {
        Ok(())
    }

    #[test]
    fn test_register_and_read() {
        let registrar = ServerRegistrar::new();
        registrar.register("/svc/A", noop);
        registrar.register("/svc/B", noop);
        let map = registrar.path_to_serve_fn().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("/svc/A"));
    }

    #[test]
    fn test_duplicate_path_reported_on_read() {
        let registrar = ServerRegistrar::new();
        registrar.register("/svc/A", noop);
        registrar.register("/svc/A", noop);
        match registrar.path_to_serve_fn() {
            Err(PluginRpcError::Registration(errors)) => {
                assert_eq!(
                    errors.0,
                    vec![RegistrationError::DuplicatePath("/svc/A".to_string())]
                );
            }
            other => panic!("expected registration error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_registration_after_read_is_rejected() {
        let registrar = ServerRegistrar::new();
        registrar.register("/svc/A", noop);
        let first = registrar.path_to_serve_fn().unwrap();

        registrar.register("/svc/B", noop);
        assert_eq!(first.len(), 1);
        assert!(!first.contains_key("/svc/B"));

        match registrar.path_to_serve_fn() {
            Err(PluginRpcError::Registration(errors)) => {
                assert_eq!(errors.0, vec![RegistrationError::AlreadyUsed]);
            }
            other => panic!("expected registration error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_all_errors_are_joined() {
        let registrar = ServerRegistrar::new();
        registrar.register("/svc/A", noop);
        registrar.register("/svc/A", noop);
        registrar.register("/svc/B", noop);
        registrar.register("/svc/B", noop);
        let err = registrar
            .path_to_serve_fn()
            .err()
            .expect("registration should fail");
        assert_eq!(
            err.to_string(),
            "path \"/svc/A\" already registered\npath \"/svc/B\" already registered"
        );
    }

    #[test]
    fn test_concurrent_registration() {
        let registrar = ServerRegistrar::new();
        std::thread::scope(|scope| {
            for i in 0..8 {
                let registrar = &registrar;
                scope.spawn(move || registrar.register(format!("/svc/M{}", i), noop));
            }
        });
        assert_eq!(registrar.path_to_serve_fn().unwrap().len(), 8);
    }
}
