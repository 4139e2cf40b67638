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

//! Request and response envelopes.
//!
//! A request envelope carries at most a body. A response envelope carries a
//! body, an error, or neither. Empty input on either side decodes to the
//! payload type's default value.

use crate::core::constants::limits::MAX_MESSAGE_SIZE_BYTES;
use crate::core::constants::protocol::TYPE_URL_PREFIX;
use crate::core::errors::PluginRpcError;
use crate::core::status::Error;
use crate::protocol::models::{Body, RequestEnvelope, ResponseEnvelope};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A payload type that can travel inside an envelope.
///
/// Implementations must serialize to a JSON object and should mark their
/// fields `#[serde(default)]` so omitted fields decode to zero values.
pub trait Message: Serialize + DeserializeOwned + Default + Send + 'static {
    /// Fully-qualified message name, e.g. `buf.pluginrpc.example.v1.EchoRequestRequest`.
    const TYPE_NAME: &'static str;

    fn type_url() -> String {
        format!("{}{}", TYPE_URL_PREFIX, Self::TYPE_NAME)
    }
}

pub fn pack<M: Message>(message: &M) -> Result<Body, PluginRpcError> {
    match serde_json::to_value(message)? {
        Value::Object(fields) => Ok(Body {
            type_url: M::type_url(),
            fields,
        }),
        other => Err(PluginRpcError::InvalidMessage(format!(
            "{} must encode as a JSON object, got {}",
            M::TYPE_NAME,
            other
        ))),
    }
}

pub fn unpack<M: Message>(body: Body) -> Result<M, PluginRpcError> {
    // Only the last path segment of a type URL names the message.
    let actual = body
        .type_url
        .rsplit('/')
        .next()
        .unwrap_or(body.type_url.as_str());
    if actual != M::TYPE_NAME {
        return Err(PluginRpcError::BodyTypeMismatch {
            expected: M::TYPE_NAME.to_string(),
            actual: body.type_url,
        });
    }
    Ok(serde_json::from_value(Value::Object(body.fields))?)
}

pub fn marshal_request<M: Message>(request: Option<&M>) -> Result<Vec<u8>, PluginRpcError> {
    let envelope = RequestEnvelope {
        body: request.map(pack::<M>).transpose()?,
    };
    let data = serde_json::to_vec(&envelope)?;
    check_size(&data)?;
    Ok(data)
}

pub fn unmarshal_request<M: Message>(data: &[u8]) -> Result<M, PluginRpcError> {
    check_size(data)?;
    if is_blank(data) {
        return Ok(M::default());
    }
    let envelope: RequestEnvelope = serde_json::from_slice(data)?;
    match envelope.body {
        Some(body) => unpack(body),
        None => Ok(M::default()),
    }
}

pub fn marshal_response<M: Message>(response: &M) -> Result<Vec<u8>, PluginRpcError> {
    let envelope = ResponseEnvelope {
        body: Some(pack(response)?),
        error: None,
    };
    let data = serde_json::to_vec(&envelope)?;
    check_size(&data)?;
    Ok(data)
}

/// An envelope carrying only the error.
pub fn marshal_error_response(err: &Error) -> Result<Vec<u8>, PluginRpcError> {
    let envelope = ResponseEnvelope {
        body: None,
        error: Some(err.to_wire()),
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decodes a response envelope. An error in the envelope is returned as
/// `PluginRpcError::Rpc` without looking at the body, if any.
pub fn unmarshal_response<M: Message>(data: &[u8]) -> Result<M, PluginRpcError> {
    check_size(data)?;
    if is_blank(data) {
        return Ok(M::default());
    }
    let envelope: ResponseEnvelope = serde_json::from_slice(data)?;
    if let Some(wire_error) = envelope.error {
        return Err(PluginRpcError::Rpc(Error::from_wire(wire_error)));
    }
    match envelope.body {
        Some(body) => unpack(body),
        None => Ok(M::default()),
    }
}

fn is_blank(data: &[u8]) -> bool {
    data.iter().all(u8::is_ascii_whitespace)
}

fn check_size(data: &[u8]) -> Result<(), PluginRpcError> {
    let size = data.len() as u64;
    if size > MAX_MESSAGE_SIZE_BYTES {
        return Err(PluginRpcError::MessageTooLarge {
            size,
            limit: MAX_MESSAGE_SIZE_BYTES,
        });
    }
    Ok(())
}
