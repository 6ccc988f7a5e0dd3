// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::items_after_statements)] // Test helpers
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::needless_pass_by_value)] // Test functions

//! Dispatch integration tests
//!
//! Wires a registry, a TOML-configured mediator and the metadata accessor
//! together the way a host application would.

use courier::meta::{Reflect, TypeBuilder};
use courier::{
    ConfigurationError, Fault, FaultKind, HandlerError, MediatorConfig, Mediator, MemberAccessor,
    Registry, Request,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
struct CreateOrder {
    customer_id: u32,
    quantity: u32,
}

impl Request for CreateOrder {
    type Response = u64;
}

#[derive(Debug)]
struct GetOrder {
    order_id: u64,
}

impl Request for GetOrder {
    type Response = Option<CreateOrder>;
}

impl Reflect for CreateOrder {
    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .field(
                "CustomerId",
                |o: &CreateOrder| o.customer_id,
                |o, v| o.customer_id = v,
            )
            .field("Quantity", |o: &CreateOrder| o.quantity, |o, v| o.quantity = v)
    }
}

/// In-memory order book shared by the rules.
#[derive(Default)]
struct OrderBook {
    next_id: AtomicU64,
    orders: Mutex<HashMap<u64, CreateOrder>>,
}

fn build_registry(book: Arc<OrderBook>) -> Result<Registry, ConfigurationError> {
    let mut builder = Registry::builder();

    let writer = Arc::clone(&book);
    builder.register_rule::<CreateOrder>(move |order: CreateOrder, _: CancellationToken| {
        let book = Arc::clone(&writer);
        async move {
            let id = book.next_id.fetch_add(1, Ordering::SeqCst) + 42;
            book.orders
                .lock()
                .map_err(|_| "order book poisoned")?
                .insert(id, order);
            Ok::<_, HandlerError>(id)
        }
    })?;

    let reader = Arc::clone(&book);
    builder.register_rule::<GetOrder>(move |query: GetOrder, _: CancellationToken| {
        let book = Arc::clone(&reader);
        async move {
            let orders = book.orders.lock().map_err(|_| "order book poisoned")?;
            Ok::<_, HandlerError>(orders.get(&query.order_id).cloned())
        }
    })?;

    // Validators inspect requests generically through the accessor.
    builder
        .register_validator::<CreateOrder>(|order: &CreateOrder| {
            let accessor = match MemberAccessor::of(order) {
                Ok(accessor) => accessor,
                Err(e) => return vec![e.to_string()],
            };
            accessor
                .values()
                .into_iter()
                .filter(|(_, value)| value.as_u64() == Some(0) || value.as_i64() == Some(0))
                .map(|(name, _)| format!("{} is required", name))
                .collect()
        })
        .register_validator::<CreateOrder>(|order: &CreateOrder| {
            if order.quantity > 100 {
                vec![format!("Quantity {} exceeds 100", order.quantity)]
            } else {
                Vec::new()
            }
        });

    Ok(builder.build())
}

fn mediator_from_toml(book: Arc<OrderBook>) -> Mediator {
    let config = MediatorConfig::from_toml_str(
        r#"
[mediator]
name = "orders"
slow_dispatch_threshold_ms = 5000
"#,
    )
    .expect("config");
    Mediator::with_config(build_registry(book).expect("registry"), config).expect("mediator")
}

#[tokio::test]
async fn test_create_then_fetch_order() {
    let book = Arc::new(OrderBook::default());
    let mediator = mediator_from_toml(Arc::clone(&book));
    let cancel = CancellationToken::new();
    assert_eq!(mediator.name(), "orders");

    let id = mediator
        .send(
            CreateOrder {
                customer_id: 7,
                quantity: 3,
            },
            &cancel,
        )
        .await
        .expect("create");
    assert_eq!(id, 42);

    let fetched = mediator
        .send(GetOrder { order_id: id }, &cancel)
        .await
        .expect("fetch")
        .expect("stored");
    assert_eq!(fetched.customer_id, 7);
    assert_eq!(fetched.quantity, 3);

    let missing = mediator
        .send(GetOrder { order_id: 9999 }, &cancel)
        .await
        .expect("fetch");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_all_validation_messages_reported() {
    let book = Arc::new(OrderBook::default());
    let mediator = mediator_from_toml(Arc::clone(&book));

    let mut outcome = None;
    mediator
        .dispatch(
            CreateOrder {
                customer_id: 0,
                quantity: 500,
            },
            |_| panic!("must not succeed"),
            |fault| outcome = Some(fault),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(
        outcome,
        Some(Fault::Validation(vec![
            "CustomerId is required".to_string(),
            "Quantity 500 exceeds 100".to_string(),
        ]))
    );
    assert!(book.orders.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_aborts_startup() {
    let book = Arc::new(OrderBook::default());
    let mut builder = Registry::builder();
    builder
        .register_rule::<GetOrder>(|_: GetOrder, _: CancellationToken| async {
            Ok::<Option<CreateOrder>, HandlerError>(None)
        })
        .expect("first");

    let err = builder
        .register_rule::<GetOrder>(move |_: GetOrder, _: CancellationToken| {
            let _book = Arc::clone(&book);
            async { Ok::<Option<CreateOrder>, HandlerError>(None) }
        })
        .err()
        .expect("duplicate");
    assert!(matches!(err, ConfigurationError::DuplicateRule { .. }));
    assert!(err.to_string().contains("GetOrder"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_mediator_across_tasks() {
    let book = Arc::new(OrderBook::default());
    let mediator = Arc::new(mediator_from_toml(Arc::clone(&book)));

    let mut tasks = Vec::new();
    for i in 0..32u32 {
        let mediator = Arc::clone(&mediator);
        tasks.push(tokio::spawn(async move {
            let cancel = CancellationToken::new();
            mediator
                .send(
                    CreateOrder {
                        customer_id: i % 4,
                        quantity: 1,
                    },
                    &cancel,
                )
                .await
        }));
    }

    let mut kinds = HashMap::new();
    for task in tasks {
        let key = match task.await.expect("join") {
            Ok(_) => "ok".to_string(),
            Err(fault) => fault.kind().to_string(),
        };
        *kinds.entry(key).or_insert(0) += 1;
    }

    assert_eq!(kinds.get("ok"), Some(&24));
    assert_eq!(kinds.get("validation"), Some(&8));
    assert_eq!(book.orders.lock().expect("lock").len(), 24);

    let stats = mediator.stats().snapshot();
    assert_eq!(stats.dispatched, 32);
    assert_eq!(stats.succeeded, 24);
    assert_eq!(stats.validation_failed, 8);
}

#[tokio::test]
async fn test_cancellation_from_another_task() {
    let mut builder = Registry::builder();
    builder
        .register_rule::<GetOrder>(|_: GetOrder, cancel: CancellationToken| async move {
            // Cooperative rule: waits until told to stop.
            cancel.cancelled().await;
            Err::<Option<CreateOrder>, HandlerError>("stopped".into())
        })
        .expect("rule");
    let mediator = Mediator::new(builder.build());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let fault = mediator
        .send(GetOrder { order_id: 1 }, &cancel)
        .await
        .expect_err("cancelled");
    assert_eq!(fault.kind(), FaultKind::Cancelled);
}
