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

//! Mapping from failures to process exit statuses.

use crate::core::constants::exit::EXIT_SUCCESS;
use crate::core::status::Error;
use std::fmt;

/// The outcome of a plugin invocation as a process exit status.
#[derive(Debug)]
pub struct ExitError {
    exit_code: i32,
    cause: Option<Error>,
}

impl ExitError {
    /// No error maps to exit status 0; any error maps through its `Code`.
    pub fn wrap<E: Into<Error>>(err: Option<E>) -> Self {
        match err {
            None => Self {
                exit_code: EXIT_SUCCESS,
                cause: None,
            },
            Some(err) => {
                let err = err.into();
                Self {
                    exit_code: err.code().exit_code(),
                    cause: Some(err),
                }
            }
        }
    }

    pub fn from_result<E: Into<Error>>(result: Result<(), E>) -> Self {
        Self::wrap(result.err())
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.cause.is_none()
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(err) => write!(f, "exit status {}: {}", self.exit_code, err),
            None => write!(f, "exit status {}", self.exit_code),
        }
    }
}
