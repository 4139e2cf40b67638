use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pluginrpc::example::messages::{EchoRequestRequest, EchoRequestResponse};
use pluginrpc::protocol::envelope::{
    marshal_request, marshal_response, unmarshal_request, unmarshal_response,
};
use pluginrpc::{Procedure, Spec};

fn bench_spec_build(c: &mut Criterion) {
    let procedures: Vec<Procedure> = (0..64)
        .map(|i| {
            Procedure::with_args(
                format!("/bench.v1.Service/Method{}", i),
                ["bench".to_string(), format!("method{}", i)],
            )
            .unwrap()
        })
        .collect();

    c.bench_function("spec_new_64", |b| {
        b.iter(|| Spec::new(black_box(procedures.clone())).unwrap())
    });

    let spec = Spec::new(procedures).unwrap();
    let args = vec!["bench".to_string(), "method63".to_string()];
    c.bench_function("spec_procedure_for_args", |b| {
        b.iter(|| spec.procedure_for_args(black_box(&args)))
    });
}

fn bench_envelopes(c: &mut Criterion) {
    let request = EchoRequestRequest {
        message: "hello".repeat(64),
    };
    let data = marshal_request(Some(&request)).unwrap();
    c.bench_function("request_unmarshal", |b| {
        b.iter(|| unmarshal_request::<EchoRequestRequest>(black_box(&data)).unwrap())
    });

    let response = EchoRequestResponse {
        message: request.message.clone(),
    };
    c.bench_function("response_round_trip", |b| {
        b.iter(|| {
            let data = marshal_response(black_box(&response)).unwrap();
            unmarshal_response::<EchoRequestResponse>(&data).unwrap()
        })
    });
}

criterion_group!(benches, bench_spec_build, bench_envelopes);
criterion_main!(benches);
