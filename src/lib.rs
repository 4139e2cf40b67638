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

//! pluginrpc: request/response RPC for plugin executables.
//!
//! A plugin is a program invoked once per call. The caller selects the
//! procedure through command-line arguments, writes a JSON request envelope
//! to stdin and reads a JSON response envelope from stdout. The process exit
//! code carries the error code. Two reserved flags let a caller discover the
//! protocol version and the plugin's Spec before calling anything.

pub mod config;
pub mod core;
pub mod example;
pub mod plugin;
pub mod protocol;

pub use crate::core::exit::ExitError;
pub use crate::core::status::{Code, Error};
pub use crate::protocol::envelope::Message;
pub use crate::protocol::procedure::Procedure;
pub use crate::protocol::spec::Spec;
