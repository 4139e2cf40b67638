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

//! Plugin-side serving and client-side invocation.

pub mod client;
pub mod entry;
pub mod env;
pub mod handler;
pub mod process;
pub mod registrar;
pub mod runner;
pub mod server;

pub use client::{Client, ClientConfig};
pub use entry::{main, run};
pub use env::Env;
pub use handler::Handler;
pub use process::ProcessRunner;
pub use registrar::{ServeFn, ServerRegistrar};
pub use runner::{RunOutput, Runner, ServerRunner};
pub use server::{Server, ServerConfig};
