// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request Dispatch
//!
//! Routes a typed request to exactly one rule, after running every
//! validator registered for that request type.
//!
//! # Overview
//!
//! - **Registry**: request type → one rule and an ordered validator list,
//!   filled at startup through a [`RegistryBuilder`] and then frozen
//! - **Mediator**: runs validators, then the rule, and classifies every
//!   failure as a [`Fault`]
//!
//! # Faults
//!
//! | Fault | When |
//! |-------|------|
//! | `NotRegistered` | No rule for the request type |
//! | `Validation` | At least one validator returned a message; the rule never runs |
//! | `Cancelled` | The caller's token fired before completion |
//! | `Unhandled` | A rule or validator returned an error or panicked |
//!
//! # Example
//!
//! ```rust
//! use courier::dispatch::{Fault, HandlerError, Mediator, Registry, Request};
//! use tokio_util::sync::CancellationToken;
//!
//! struct CreateOrder {
//!     customer_id: u32,
//! }
//!
//! impl Request for CreateOrder {
//!     type Response = u64;
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = Registry::builder();
//! builder
//!     .register_rule::<CreateOrder>(|_: CreateOrder, _: CancellationToken| async {
//!         Ok::<_, HandlerError>(42u64)
//!     })?
//!     .register_validator::<CreateOrder>(|r: &CreateOrder| {
//!         if r.customer_id == 0 {
//!             vec!["CustomerId is required".to_string()]
//!         } else {
//!             Vec::new()
//!         }
//!     });
//!
//! let mediator = Mediator::new(builder.build());
//! let cancel = CancellationToken::new();
//!
//! let fault = mediator
//!     .send(CreateOrder { customer_id: 0 }, &cancel)
//!     .await
//!     .unwrap_err();
//! assert_eq!(fault, Fault::Validation(vec!["CustomerId is required".into()]));
//!
//! mediator
//!     .dispatch(
//!         CreateOrder { customer_id: 7 },
//!         |id| assert_eq!(id, 42),
//!         |fault| panic!("unexpected fault: {}", fault),
//!         &cancel,
//!     )
//!     .await;
//! # Ok(())
//! # }
//! ```

mod fault;
mod mediator;
mod registry;
mod request;
mod stats;

pub use fault::{Fault, FaultKind};
pub use mediator::{DispatchState, Mediator};
pub use registry::{Registry, RegistryBuilder, RequestInfo};
pub use request::{HandlerError, Request, Rule, Validator};
pub use stats::{MediatorStats, MediatorStatsSnapshot};
