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

//! Procedures: the addressable units of a plugin.

use crate::core::errors::PluginRpcError;
use crate::protocol::models::WireProcedure;

/// A single procedure a plugin implements.
///
/// The path identifies the procedure, e.g. `/pkg.v1.FooService/Bar`. The args
/// are the exact argument vector that invokes it on the command line. When no
/// args are given, the path itself is the only way to invoke the procedure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Procedure {
    path: String,
    args: Vec<String>,
}

impl Procedure {
    /// A procedure invoked by its path only.
    pub fn new(path: impl Into<String>) -> Result<Self, PluginRpcError> {
        Self::with_args(path, Vec::<String>::new())
    }

    pub fn with_args<I, S>(path: impl Into<String>, args: I) -> Result<Self, PluginRpcError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let procedure = Self {
            path: path.into(),
            args: args.into_iter().map(Into::into).collect(),
        };
        validate_procedure(&procedure)?;
        Ok(procedure)
    }

    pub fn from_wire(wire: WireProcedure) -> Result<Self, PluginRpcError> {
        Self::with_args(wire.path, wire.args)
    }

    pub fn to_wire(&self) -> WireProcedure {
        WireProcedure {
            path: self.path.clone(),
            args: self.args.clone(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The argument vector a client passes to invoke this procedure.
    pub fn invocation_args(&self) -> Vec<String> {
        if self.args.is_empty() {
            vec![self.path.clone()]
        } else {
            self.args.clone()
        }
    }

    /// True if `args` selects this procedure, either as `[path]` or as the
    /// exact argument signature.
    pub fn matches(&self, args: &[String]) -> bool {
        let by_path = args.len() == 1 && args[0] == self.path;
        let by_args = !self.args.is_empty() && args == self.args.as_slice();
        by_path || by_args
    }
}

fn validate_procedure(procedure: &Procedure) -> Result<(), PluginRpcError> {
    let path = procedure.path();
    if path.is_empty() {
        return Err(PluginRpcError::InvalidProcedure(
            "procedure path is empty".to_string(),
        ));
    }
    if !path.starts_with('/') || path.chars().any(char::is_whitespace) {
        return Err(PluginRpcError::InvalidProcedure(format!(
            "invalid procedure path {:?}: must be an absolute path without whitespace",
            path
        )));
    }
    for arg in procedure.args() {
        validate_arg(arg).map_err(|reason| {
            PluginRpcError::InvalidProcedure(format!(
                "invalid arg {:?} for procedure {:?}: {}",
                arg, path, reason
            ))
        })?;
    }
    Ok(())
}

// Args start with a letter so they can never be mistaken for flags, and never
// contain spaces so a joined signature is unambiguous.
fn validate_arg(arg: &str) -> Result<(), &'static str> {
    let mut chars = arg.chars();
    match chars.next() {
        None => return Err("arg is empty"),
        Some(c) if !c.is_ascii_alphabetic() => return Err("arg must start with a letter"),
        Some(_) => {}
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Ok(())
    } else {
        Err("arg may only contain letters, digits, '-' and '_'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_only_procedure() {
        let procedure = Procedure::new("/pkg.v1.Svc/Method").unwrap();
        assert!(procedure.args().is_empty());
        assert_eq!(procedure.invocation_args(), vec!["/pkg.v1.Svc/Method"]);
        assert!(procedure.matches(&["/pkg.v1.Svc/Method".to_string()]));
        assert!(!procedure.matches(&[]));
        assert!(!procedure.matches(&["Method".to_string()]));
    }

    #[test]
    fn test_procedure_with_args() {
        let procedure = Procedure::with_args("/pkg.v1.Svc/Method", ["echo", "request"]).unwrap();
        assert_eq!(procedure.invocation_args(), vec!["echo", "request"]);
        assert!(procedure.matches(&["echo".to_string(), "request".to_string()]));
        assert!(procedure.matches(&["/pkg.v1.Svc/Method".to_string()]));
        // Exact sequence equality, not prefix.
        assert!(!procedure.matches(&["echo".to_string()]));
        assert!(!procedure.matches(&[
            "echo".to_string(),
            "request".to_string(),
            "extra".to_string()
        ]));
    }

    #[test]
    fn test_rejects_invalid_paths() {
        for path in ["", "relative/path", "/has space", "/tab\there"] {
            assert!(
                matches!(
                    Procedure::new(path),
                    Err(PluginRpcError::InvalidProcedure(_))
                ),
                "path {:?} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_rejects_invalid_args() {
        for arg in ["", "--flag", "-x", "two words", "9lives", "semi;colon"] {
            assert!(
                Procedure::with_args("/a/b", [arg]).is_err(),
                "arg {:?} should be rejected",
                arg
            );
        }
        assert!(Procedure::with_args("/a/b", ["ok_arg", "also-ok", "x9"]).is_ok());
    }

    #[test]
    fn test_wire_round_trip() {
        let procedure = Procedure::with_args("/a/b", ["run"]).unwrap();
        let wire = procedure.to_wire();
        assert_eq!(wire.args, vec!["run"]);
        assert_eq!(Procedure::from_wire(wire).unwrap(), procedure);
    }
}
