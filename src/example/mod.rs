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

//! An echo service used by the example binaries and the integration tests.

pub mod messages;
pub mod server;
pub mod service;

pub use server::{new_server, EchoHandler};
pub use service::{
    register_echo_service_server, EchoService, EchoServiceClient, EchoServiceSpecBuilder,
};
