// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch Benchmark
//!
//! Measures mediator overhead on a single-threaded runtime:
//! - happy path (validators pass, rule runs)
//! - validation short-circuit (rule never runs)
//! - unknown request type

#![allow(clippy::uninlined_format_args)]

use courier::{HandlerError, Mediator, Registry, Request};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio_util::sync::CancellationToken;

struct CreateOrder {
    customer_id: u32,
}

impl Request for CreateOrder {
    type Response = u64;
}

struct Unrouted;

impl Request for Unrouted {
    type Response = ();
}

fn mediator() -> Mediator {
    let mut builder = Registry::builder();
    builder
        .register_rule::<CreateOrder>(|req: CreateOrder, _: CancellationToken| async move {
            Ok::<_, HandlerError>(u64::from(req.customer_id) * 6)
        })
        .expect("rule")
        .register_validator::<CreateOrder>(|req: &CreateOrder| {
            if req.customer_id == 0 {
                vec!["CustomerId is required".to_string()]
            } else {
                Vec::new()
            }
        });
    Mediator::new(builder.build())
}

fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let mediator = mediator();
    let cancel = CancellationToken::new();

    c.bench_function("dispatch_success", |b| {
        b.iter(|| {
            let id = runtime
                .block_on(mediator.send(CreateOrder { customer_id: 7 }, &cancel))
                .expect("dispatch");
            black_box(id)
        });
    });

    c.bench_function("dispatch_validation_fault", |b| {
        b.iter(|| {
            let fault = runtime
                .block_on(mediator.send(CreateOrder { customer_id: 0 }, &cancel))
                .expect_err("fault");
            black_box(fault)
        });
    });

    c.bench_function("dispatch_not_registered", |b| {
        b.iter(|| black_box(runtime.block_on(mediator.send(Unrouted, &cancel))));
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
