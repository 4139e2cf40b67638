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

use crate::core::status::{Code, Error};
use std::fmt;
use thiserror::Error as ThisError;

/// Main error type for pluginrpc
#[derive(ThisError, Debug)]
pub enum PluginRpcError {
    /// Two procedures claim the same path
    #[error("duplicate procedure path: {0:?}")]
    DuplicatePath(String),

    /// Two procedures claim the same argument signature
    #[error("duplicate procedure args: {0:?}")]
    DuplicateArgs(String),

    #[error("invalid procedure: {0}")]
    InvalidProcedure(String),

    /// A registered path has no procedure in the Spec
    #[error("path {0:?} not contained within spec")]
    PathNotInSpec(String),

    /// A procedure in the Spec has no registered serve function
    #[error("path {0:?} not registered")]
    PathNotRegistered(String),

    /// Accumulated registrar failures, reported when the registrar is read
    #[error("{0}")]
    Registration(RegistrationErrors),

    #[error("args not recognized: {0:?}")]
    UnrecognizedArgs(Vec<String>),

    #[error("expected body of type {expected:?} but got {actual:?}")]
    BodyTypeMismatch { expected: String, actual: String },

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("message of {size} bytes exceeds limit of {limit} bytes")]
    MessageTooLarge { size: u64, limit: u64 },

    #[error("unsupported plugin protocol version: {0:?}")]
    ProtocolVersion(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("call canceled")]
    Canceled,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Application error produced by a procedure implementation
    #[error(transparent)]
    Rpc(#[from] Error),
}

impl PluginRpcError {
    /// Status code this error is reported with across the plugin boundary.
    pub fn code(&self) -> Code {
        match self {
            PluginRpcError::Rpc(err) => err.code(),
            PluginRpcError::MessageTooLarge { .. } => Code::ResourceExhausted,
            PluginRpcError::ProtocolVersion(_) => Code::FailedPrecondition,
            PluginRpcError::Canceled => Code::Canceled,
            _ => Code::Unknown,
        }
    }
}

/// A single registrar rejection.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RegistrationError {
    #[error("server registrar already used")]
    AlreadyUsed,
    #[error("path {0:?} already registered")]
    DuplicatePath(String),
}

/// All registrar rejections, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationErrors(pub Vec<RegistrationError>);

impl fmt::Display for RegistrationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}
