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

//! Names of the protocol introspection flags.

use crate::core::constants::protocol::{FLAG_PROTOCOL_SUFFIX, FLAG_SPEC_SUFFIX};

/// `--<suffix>`, or `--<prefix>-<suffix>` when a non-empty prefix is given.
pub fn full_flag(flag_prefix: Option<&str>, suffix: &str) -> String {
    match flag_prefix {
        Some(prefix) if !prefix.is_empty() => format!("--{}-{}", prefix, suffix),
        _ => format!("--{}", suffix),
    }
}

pub fn protocol_flag(flag_prefix: Option<&str>) -> String {
    full_flag(flag_prefix, FLAG_PROTOCOL_SUFFIX)
}

pub fn spec_flag(flag_prefix: Option<&str>) -> String {
    full_flag(flag_prefix, FLAG_SPEC_SUFFIX)
}
