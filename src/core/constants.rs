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

pub mod protocol {
    /// Version printed in response to the protocol flag.
    pub const PROTOCOL_VERSION: u32 = 1;
    /// Suffix of the flag that prints the protocol version.
    pub const FLAG_PROTOCOL_SUFFIX: &str = "plugin-protocol";
    /// Suffix of the flag that prints the JSON-encoded Spec.
    pub const FLAG_SPEC_SUFFIX: &str = "plugin-spec";
    /// Prefix of the `@type` tag carried by every encoded body.
    pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/";
}

pub mod codes {
    /// Wire value reserved for "no error". Never a valid `Code`.
    pub const CODE_UNSPECIFIED: i32 = 0;
}

pub mod exit {
    /// Exit status of a successful invocation.
    pub const EXIT_SUCCESS: i32 = 0;
}

pub mod config {
    pub const ENV_LOG_LEVEL: &str = "PLUGINRPC_LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "PLUGINRPC_LOG_FORMAT";
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
    pub const LOG_FORMAT_TEXT: &str = "text";
    pub const LOG_FORMAT_JSON: &str = "json";
}

pub mod limits {
    /// Maximum allowed request or response envelope size (10 MB)
    pub const MAX_MESSAGE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    /// Buffer size of the in-memory pipe used by the in-process runner.
    pub const IN_PROCESS_PIPE_BYTES: usize = 64 * 1024;
}
