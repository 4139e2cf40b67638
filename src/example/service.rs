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

//! Typed bindings for the echo service: the service trait, its Spec builder,
//! server registration and a typed client.

use crate::core::errors::PluginRpcError;
use crate::core::status::Error;
use crate::example::messages::{
    EchoErrorRequest, EchoErrorResponse, EchoListRequest, EchoListResponse, EchoRequestRequest,
    EchoRequestResponse,
};
use crate::plugin::client::Client;
use crate::plugin::env::Env;
use crate::plugin::handler::Handler;
use crate::plugin::registrar::ServerRegistrar;
use crate::protocol::procedure::Procedure;
use crate::protocol::spec::Spec;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const ECHO_REQUEST_PATH: &str = "/buf.pluginrpc.example.v1.EchoService/EchoRequest";
pub const ECHO_LIST_PATH: &str = "/buf.pluginrpc.example.v1.EchoService/EchoList";
pub const ECHO_ERROR_PATH: &str = "/buf.pluginrpc.example.v1.EchoService/EchoError";

#[async_trait]
pub trait EchoService: Send + Sync + 'static {
    async fn echo_request(
        &self,
        ctx: CancellationToken,
        request: EchoRequestRequest,
    ) -> Result<EchoRequestResponse, Error>;

    async fn echo_list(
        &self,
        ctx: CancellationToken,
        request: EchoListRequest,
    ) -> Result<EchoListResponse, Error>;

    async fn echo_error(
        &self,
        ctx: CancellationToken,
        request: EchoErrorRequest,
    ) -> Result<EchoErrorResponse, Error>;
}

/// Optional invocation args per procedure. Empty means the procedure is
/// invoked by its path.
#[derive(Debug, Clone, Default)]
pub struct EchoServiceSpecBuilder {
    pub echo_request: Vec<String>,
    pub echo_list: Vec<String>,
    pub echo_error: Vec<String>,
}

impl EchoServiceSpecBuilder {
    pub fn build(&self) -> Result<Spec, PluginRpcError> {
        Spec::new(vec![
            Procedure::with_args(ECHO_REQUEST_PATH, self.echo_request.iter().cloned())?,
            Procedure::with_args(ECHO_LIST_PATH, self.echo_list.iter().cloned())?,
            Procedure::with_args(ECHO_ERROR_PATH, self.echo_error.iter().cloned())?,
        ])
    }
}

pub fn register_echo_service_server<S: EchoService>(
    registrar: &ServerRegistrar,
    handler: Handler,
    service: Arc<S>,
) {
    let (h, s) = (handler.clone(), Arc::clone(&service));
    registrar.register(ECHO_REQUEST_PATH, move |ctx, env: Env| {
        let (handler, service) = (h.clone(), Arc::clone(&s));
        async move {
            handler
                .handle(ctx, env, |ctx, request: EchoRequestRequest| async move {
                    service.echo_request(ctx, request).await
                })
                .await
        }
    });

    let (h, s) = (handler.clone(), Arc::clone(&service));
    registrar.register(ECHO_LIST_PATH, move |ctx, env: Env| {
        let (handler, service) = (h.clone(), Arc::clone(&s));
        async move {
            handler
                .handle(ctx, env, |ctx, request: EchoListRequest| async move {
                    service.echo_list(ctx, request).await
                })
                .await
        }
    });

    registrar.register(ECHO_ERROR_PATH, move |ctx, env: Env| {
        let (handler, service) = (handler.clone(), Arc::clone(&service));
        async move {
            handler
                .handle(ctx, env, |ctx, request: EchoErrorRequest| async move {
                    service.echo_error(ctx, request).await
                })
                .await
        }
    });
}

/// Typed client for a plugin serving the echo service.
#[derive(Debug)]
pub struct EchoServiceClient {
    client: Client,
}

impl EchoServiceClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn echo_request(
        &self,
        ctx: &CancellationToken,
        request: &EchoRequestRequest,
    ) -> Result<EchoRequestResponse, Error> {
        self.client.call(ctx, ECHO_REQUEST_PATH, Some(request)).await
    }

    pub async fn echo_list(
        &self,
        ctx: &CancellationToken,
        request: &EchoListRequest,
    ) -> Result<EchoListResponse, Error> {
        self.client.call(ctx, ECHO_LIST_PATH, Some(request)).await
    }

    pub async fn echo_error(
        &self,
        ctx: &CancellationToken,
        request: &EchoErrorRequest,
    ) -> Result<EchoErrorResponse, Error> {
        self.client.call(ctx, ECHO_ERROR_PATH, Some(request)).await
    }
}
