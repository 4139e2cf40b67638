// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use pluginrpc::example::messages::{EchoErrorRequest, EchoListResponse};
use pluginrpc::protocol::envelope::{unmarshal_request, unmarshal_response};

fuzz_target!(|data: &[u8]| {
    // Envelope decoding must reject bad input with an error, never a panic.
    let _ = unmarshal_request::<EchoErrorRequest>(data);
    let _ = unmarshal_response::<EchoListResponse>(data);
});
