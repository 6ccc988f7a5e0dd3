// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Courier - Request dispatch and type metadata core
//!
//! A mediator that routes typed requests to exactly one rule after running
//! the validators registered for them, plus a cache of per-type member
//! metadata that lets generic code read and write named members of
//! arbitrary objects.
//!
//! ## Quick Start
//!
//! ```rust
//! use courier::{Fault, HandlerError, Mediator, Registry, Request};
//! use tokio_util::sync::CancellationToken;
//!
//! struct Greet {
//!     name: String,
//! }
//!
//! impl Request for Greet {
//!     type Response = String;
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = Registry::builder();
//! builder
//!     .register_rule::<Greet>(|req: Greet, _: CancellationToken| async move {
//!         Ok::<_, HandlerError>(format!("hello, {}", req.name))
//!     })?
//!     .register_validator::<Greet>(|req: &Greet| {
//!         if req.name.is_empty() {
//!             vec!["Name is required".to_string()]
//!         } else {
//!             Vec::new()
//!         }
//!     });
//!
//! let mediator = Mediator::new(builder.build());
//! let cancel = CancellationToken::new();
//!
//! let reply = mediator.send(Greet { name: "ada".into() }, &cancel).await?;
//! assert_eq!(reply, "hello, ada");
//!
//! let fault = mediator.send(Greet { name: String::new() }, &cancel).await;
//! assert_eq!(fault, Err(Fault::Validation(vec!["Name is required".into()])));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                             Mediator                                |
//! |   resolve rule -> run validators -> run rule -> classify fault     |
//! +---------------------------------------------------------------------+
//! |                        Dispatch Registry                            |
//! |   RegistryBuilder (startup) -> Registry (frozen, lock-free)        |
//! +---------------------------------------------------------------------+
//! |                 MemberAccessor / TypeMetadataCache                  |
//! |   name -> member lookup | compiled getters/setters | build-once    |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Mediator`] | Validates and dispatches requests |
//! | [`RegistryBuilder`] | Collects rules and validators at startup |
//! | [`TypeMetadataCache`] | Build-once cache of [`TypeDescriptor`]s |
//! | [`MemberAccessor`] | Name-based get/set over one instance |
//! | [`MediatorConfig`] | TOML-loadable mediator settings |
//!
//! ## Modules Overview
//!
//! - [`dispatch`] - Requests, rules, validators, registry and mediator
//! - [`meta`] - Type descriptors, values and the metadata cache
//! - [`accessor`] - Name-based member access
//! - [`config`] - Mediator configuration
//! - [`error`] - Startup configuration errors
//!
//! Logging goes through the `log` facade; install any backend to see it.

/// Name-based member access over a cached type descriptor.
pub mod accessor;
/// Mediator configuration (programmatic and TOML).
pub mod config;
/// Request dispatch: registry, validators, rules and the mediator.
pub mod dispatch;
/// Startup-time configuration errors.
pub mod error;
/// Type metadata: descriptors, dynamic values and the build-once cache.
pub mod meta;

pub use accessor::{AccessError, MemberAccessor};
pub use config::{ConfigError, MediatorConfig};
pub use dispatch::{
    DispatchState, Fault, FaultKind, HandlerError, Mediator, MediatorStats,
    MediatorStatsSnapshot, Registry, RegistryBuilder, Request, RequestInfo, Rule, Validator,
};
pub use error::ConfigurationError;
pub use meta::{
    MemberDescriptor, MemberKind, Reflect, TypeBuilder, TypeDescriptor, TypeMetadataCache, Value,
};
