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

//! Status codes and the `Error` type carried across the plugin boundary.
//!
//! An `Error` pairs exactly one `Code` with one underlying cause. It is what a
//! procedure implementation returns to signal failure, what travels in the
//! `error` field of a response envelope, and what a client reconstructs on the
//! other side.

use crate::core::errors::PluginRpcError;
use crate::protocol::models::WireError;
use std::fmt;

/// Boxed cause of an `Error`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed set of status codes.
///
/// The numeric values match the common RPC status semantics. Zero is reserved
/// for "unspecified" on the wire and is not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Canceled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl Code {
    pub const ALL: [Code; 16] = [
        Code::Canceled,
        Code::Unknown,
        Code::InvalidArgument,
        Code::DeadlineExceeded,
        Code::NotFound,
        Code::AlreadyExists,
        Code::PermissionDenied,
        Code::ResourceExhausted,
        Code::FailedPrecondition,
        Code::Aborted,
        Code::OutOfRange,
        Code::Unimplemented,
        Code::Internal,
        Code::Unavailable,
        Code::DataLoss,
        Code::Unauthenticated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Code::Canceled => "canceled",
            Code::Unknown => "unknown",
            Code::InvalidArgument => "invalid_argument",
            Code::DeadlineExceeded => "deadline_exceeded",
            Code::NotFound => "not_found",
            Code::AlreadyExists => "already_exists",
            Code::PermissionDenied => "permission_denied",
            Code::ResourceExhausted => "resource_exhausted",
            Code::FailedPrecondition => "failed_precondition",
            Code::Aborted => "aborted",
            Code::OutOfRange => "out_of_range",
            Code::Unimplemented => "unimplemented",
            Code::Internal => "internal",
            Code::Unavailable => "unavailable",
            Code::DataLoss => "data_loss",
            Code::Unauthenticated => "unauthenticated",
        }
    }

    /// Process exit status a plugin uses when failing with this code.
    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown status code: {0}")]
pub struct UnknownCode(pub i32);

impl TryFrom<i32> for Code {
    type Error = UnknownCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Code::ALL
            .iter()
            .copied()
            .find(|code| *code as i32 == value)
            .ok_or(UnknownCode(value))
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code as i32
    }
}

/// A status `Code` plus the cause that produced it.
#[derive(Debug)]
pub struct Error {
    code: Code,
    cause: BoxError,
}

impl Error {
    pub fn new(code: Code, cause: impl Into<BoxError>) -> Self {
        Self {
            code,
            cause: cause.into(),
        }
    }

    /// Like `new`, but a missing cause yields no error at all.
    pub fn from_option<E: Into<BoxError>>(code: Code, cause: Option<E>) -> Option<Self> {
        cause.map(|cause| Self::new(code, cause))
    }

    /// Converts any error into an `Error`.
    ///
    /// Values that already are an `Error` (directly, or inside
    /// `PluginRpcError::Rpc`) are returned as-is. Everything else is wrapped
    /// with `Code::Unknown` unless the crate error maps to a more specific code.
    pub fn wrap(err: impl Into<BoxError>) -> Self {
        let err: BoxError = err.into();
        let err = match err.downcast::<Error>() {
            Ok(rpc_err) => return *rpc_err,
            Err(err) => err,
        };
        match err.downcast::<PluginRpcError>() {
            Ok(plugin_err) => Self::from(*plugin_err),
            Err(err) => Self {
                code: Code::Unknown,
                cause: err,
            },
        }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    pub fn into_cause(self) -> BoxError {
        self.cause
    }

    pub fn to_wire(&self) -> WireError {
        WireError {
            code: self.code.into(),
            message: self.cause.to_string(),
        }
    }

    /// Rebuilds an `Error` from its wire form. The cause becomes a plain
    /// message error. Unspecified or unknown codes decode as `Code::Unknown`.
    pub fn from_wire(wire: WireError) -> Self {
        let code = Code::try_from(wire.code).unwrap_or(Code::Unknown);
        Self::new(code, wire.message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.cause.to_string();
        if message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, message)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

impl From<PluginRpcError> for Error {
    fn from(err: PluginRpcError) -> Self {
        match err {
            PluginRpcError::Rpc(rpc_err) => rpc_err,
            other => Self {
                code: other.code(),
                cause: Box::new(other),
            },
        }
    }
}
