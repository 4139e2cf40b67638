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

//! The validated catalogue of a plugin's procedures.
//!
//! A `Spec` never contains two procedures with the same path, nor two
//! procedures with the same non-empty argument signature. JSON-encoded Specs
//! are what a plugin prints in response to `--plugin-spec` (or
//! `--<prefix>-plugin-spec`).

use crate::core::errors::PluginRpcError;
use crate::protocol::models::WireSpec;
use crate::protocol::procedure::Procedure;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    procedures: Vec<Procedure>,
    path_to_index: HashMap<String, usize>,
}

impl Spec {
    /// Validates the procedures and builds a Spec. Fails on the first
    /// duplicate path or argument signature, scanning in input order.
    pub fn new(procedures: Vec<Procedure>) -> Result<Self, PluginRpcError> {
        validate_spec_procedures(&procedures)?;
        let path_to_index = procedures
            .iter()
            .enumerate()
            .map(|(i, procedure)| (procedure.path().to_string(), i))
            .collect();
        Ok(Self {
            procedures,
            path_to_index,
        })
    }

    /// Validates a decoded wire Spec.
    pub fn from_wire(wire: WireSpec) -> Result<Self, PluginRpcError> {
        let procedures = wire
            .procedures
            .into_iter()
            .map(Procedure::from_wire)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(procedures)
    }

    pub fn to_wire(&self) -> WireSpec {
        WireSpec {
            procedures: self.procedures.iter().map(Procedure::to_wire).collect(),
        }
    }

    /// Concatenates the procedures of every Spec and validates the union.
    pub fn combine<'a, I>(specs: I) -> Result<Self, PluginRpcError>
    where
        I: IntoIterator<Item = &'a Spec>,
    {
        let procedures = specs
            .into_iter()
            .flat_map(|spec| spec.procedures.iter().cloned())
            .collect();
        Self::new(procedures)
    }

    pub fn procedure_for_path(&self, path: &str) -> Option<&Procedure> {
        self.path_to_index
            .get(path)
            .map(|&index| &self.procedures[index])
    }

    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    /// First procedure selected by the given invocation args, in Spec order.
    pub fn procedure_for_args(&self, args: &[String]) -> Option<&Procedure> {
        self.procedures
            .iter()
            .find(|procedure| procedure.matches(args))
    }
}

fn validate_spec_procedures(procedures: &[Procedure]) -> Result<(), PluginRpcError> {
    let mut used_paths = HashSet::new();
    let mut used_args = HashSet::new();
    for procedure in procedures {
        if !used_paths.insert(procedure.path()) {
            return Err(PluginRpcError::DuplicatePath(procedure.path().to_string()));
        }
        let args = procedure.args();
        if !args.is_empty() {
            // Valid args never contain spaces, so joining is unambiguous.
            let joined_args = args.join(" ");
            if used_args.contains(&joined_args) {
                return Err(PluginRpcError::DuplicateArgs(joined_args));
            }
            used_args.insert(joined_args);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedure(path: &str, args: &[&str]) -> Procedure {
        Procedure::with_args(path, args.iter().copied()).unwrap()
    }

    #[test]
    fn test_lookup_by_path() {
        let spec = Spec::new(vec![
            procedure("/svc/A", &["a"]),
            procedure("/svc/B", &[]),
        ])
        .unwrap();
        assert_eq!(spec.procedure_for_path("/svc/A").unwrap().args(), ["a"]);
        assert_eq!(spec.procedure_for_path("/svc/B").unwrap().path(), "/svc/B");
        assert!(spec.procedure_for_path("/svc/C").is_none());
        assert_eq!(spec.procedures().len(), 2);
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let err = Spec::new(vec![
            procedure("/svc/A", &["a"]),
            procedure("/svc/B", &["b"]),
            procedure("/svc/A", &["c"]),
        ])
        .unwrap_err();
        assert!(matches!(err, PluginRpcError::DuplicatePath(path) if path == "/svc/A"));
    }

    #[test]
    fn test_duplicate_args_rejected() {
        let err = Spec::new(vec![
            procedure("/svc/A", &["echo", "request"]),
            procedure("/svc/B", &["echo", "request"]),
        ])
        .unwrap_err();
        assert!(matches!(err, PluginRpcError::DuplicateArgs(args) if args == "echo request"));
    }

    #[test]
    fn test_empty_args_never_collide() {
        assert!(Spec::new(vec![procedure("/svc/A", &[]), procedure("/svc/B", &[])]).is_ok());
    }

    #[test]
    fn test_first_conflict_wins() {
        let err = Spec::new(vec![
            procedure("/svc/A", &["x"]),
            procedure("/svc/B", &["x"]),
            procedure("/svc/A", &["y"]),
        ])
        .unwrap_err();
        assert!(matches!(err, PluginRpcError::DuplicateArgs(_)));
    }

    #[test]
    fn test_combine() {
        let left = Spec::new(vec![procedure("/svc/A", &["a"])]).unwrap();
        let right = Spec::new(vec![procedure("/svc/B", &["b"])]).unwrap();
        let combined = Spec::combine([&left, &right]).unwrap();
        assert_eq!(combined.procedures().len(), 2);
        assert!(combined.procedure_for_path("/svc/B").is_some());

        let clash = Spec::new(vec![procedure("/svc/C", &["a"])]).unwrap();
        assert!(matches!(
            Spec::combine([&left, &clash]),
            Err(PluginRpcError::DuplicateArgs(_))
        ));
        assert!(matches!(
            Spec::combine([&left, &left]),
            Err(PluginRpcError::DuplicatePath(_))
        ));
    }

    #[test]
    fn test_procedure_for_args() {
        let spec = Spec::new(vec![
            procedure("/svc/A", &["echo", "request"]),
            procedure("/svc/B", &[]),
        ])
        .unwrap();
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            spec.procedure_for_args(&args(&["echo", "request"])).unwrap().path(),
            "/svc/A"
        );
        assert_eq!(spec.procedure_for_args(&args(&["/svc/B"])).unwrap().path(), "/svc/B");
        assert!(spec.procedure_for_args(&args(&["echo"])).is_none());
        assert!(spec.procedure_for_args(&args(&["/svc/B", "x"])).is_none());
    }

    #[test]
    fn test_wire_json_shape() {
        let spec = Spec::new(vec![
            procedure("/svc/A", &["echo", "request"]),
            procedure("/svc/B", &[]),
        ])
        .unwrap();
        let json = serde_json::to_value(spec.to_wire()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "procedures": [
                    {"path": "/svc/A", "args": ["echo", "request"]},
                    {"path": "/svc/B"}
                ]
            })
        );
        let back: WireSpec = serde_json::from_value(json).unwrap();
        assert_eq!(Spec::from_wire(back).unwrap(), spec);
    }
}
