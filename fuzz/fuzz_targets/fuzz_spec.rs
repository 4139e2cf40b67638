// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use pluginrpc::protocol::models::WireSpec;
use pluginrpc::Spec;

fuzz_target!(|data: &[u8]| {
    if let Ok(wire) = serde_json::from_slice::<WireSpec>(data) {
        if let Ok(spec) = Spec::from_wire(wire) {
            for procedure in spec.procedures() {
                assert!(spec.procedure_for_args(&procedure.invocation_args()).is_some());
            }
        }
    }
});
