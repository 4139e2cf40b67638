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

use crate::protocol::envelope::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoRequestRequest {
    pub message: String,
}

impl Message for EchoRequestRequest {
    const TYPE_NAME: &'static str = "buf.pluginrpc.example.v1.EchoRequestRequest";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoRequestResponse {
    pub message: String,
}

impl Message for EchoRequestResponse {
    const TYPE_NAME: &'static str = "buf.pluginrpc.example.v1.EchoRequestResponse";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoListRequest {}

impl Message for EchoListRequest {
    const TYPE_NAME: &'static str = "buf.pluginrpc.example.v1.EchoListRequest";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoListResponse {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<String>,
}

impl Message for EchoListResponse {
    const TYPE_NAME: &'static str = "buf.pluginrpc.example.v1.EchoListResponse";
}

/// Asks the server to fail with the given code and message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoErrorRequest {
    /// Numeric error code, 1 through 16.
    pub code: i32,
    pub message: String,
}

impl Message for EchoErrorRequest {
    const TYPE_NAME: &'static str = "buf.pluginrpc.example.v1.EchoErrorRequest";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoErrorResponse {}

impl Message for EchoErrorResponse {
    const TYPE_NAME: &'static str = "buf.pluginrpc.example.v1.EchoErrorResponse";
}
