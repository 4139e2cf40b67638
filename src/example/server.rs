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

//! Reference implementation of the echo service.

use crate::core::errors::PluginRpcError;
use crate::core::status::{Code, Error};
use crate::example::messages::{
    EchoErrorRequest, EchoErrorResponse, EchoListRequest, EchoListResponse, EchoRequestRequest,
    EchoRequestResponse,
};
use crate::example::service::{register_echo_service_server, EchoService, EchoServiceSpecBuilder};
use crate::plugin::handler::Handler;
use crate::plugin::registrar::ServerRegistrar;
use crate::plugin::server::{Server, ServerConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl EchoService for EchoHandler {
    async fn echo_request(
        &self,
        _ctx: CancellationToken,
        request: EchoRequestRequest,
    ) -> Result<EchoRequestResponse, Error> {
        Ok(EchoRequestResponse {
            message: request.message,
        })
    }

    async fn echo_list(
        &self,
        _ctx: CancellationToken,
        _request: EchoListRequest,
    ) -> Result<EchoListResponse, Error> {
        Ok(EchoListResponse {
            list: vec!["foo".to_string(), "bar".to_string()],
        })
    }

    async fn echo_error(
        &self,
        _ctx: CancellationToken,
        request: EchoErrorRequest,
    ) -> Result<EchoErrorResponse, Error> {
        let code = Code::try_from(request.code).unwrap_or(Code::Unknown);
        Err(Error::new(code, request.message))
    }
}

/// Builds the echo server. EchoRequest and EchoError are invoked as
/// `echo request` and `echo error`; EchoList is invoked by its path.
pub fn new_server(config: ServerConfig) -> Result<Server, PluginRpcError> {
    let spec = EchoServiceSpecBuilder {
        echo_request: vec!["echo".to_string(), "request".to_string()],
        echo_error: vec!["echo".to_string(), "error".to_string()],
        ..Default::default()
    }
    .build()?;
    let registrar = ServerRegistrar::new();
    register_echo_service_server(&registrar, Handler::new(), Arc::new(EchoHandler));
    Server::new(spec, registrar, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::service::{ECHO_ERROR_PATH, ECHO_LIST_PATH, ECHO_REQUEST_PATH};

    #[test]
    fn test_spec_args() {
        let server = new_server(ServerConfig::default()).unwrap();
        let spec = server.spec();
        assert_eq!(
            spec.procedure_for_path(ECHO_REQUEST_PATH).unwrap().args(),
            ["echo", "request"]
        );
        assert!(spec.procedure_for_path(ECHO_LIST_PATH).unwrap().args().is_empty());
        assert_eq!(
            spec.procedure_for_path(ECHO_ERROR_PATH).unwrap().args(),
            ["echo", "error"]
        );
    }

    #[tokio::test]
    async fn test_echo_error_unknown_code() {
        let err = EchoHandler
            .echo_error(
                CancellationToken::new(),
                EchoErrorRequest {
                    code: 99,
                    message: "odd".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::Unknown);
        assert_eq!(err.to_string(), "unknown: odd");
    }
}
