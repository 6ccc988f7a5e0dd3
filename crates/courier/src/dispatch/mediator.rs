// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mediator: validate-then-execute dispatch over a frozen [`Registry`].

use crate::config::{ConfigError, MediatorConfig};
use crate::dispatch::fault::{Fault, FaultKind};
use crate::dispatch::registry::Registry;
use crate::dispatch::request::Request;
use crate::dispatch::stats::MediatorStats;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Lifecycle of a single dispatch.
///
/// `Received → Validating → {ValidationFailed | Valid} → Executing →
/// {Succeeded | Faulted}`. A dispatch that ends early (no rule, validation
/// failure, cancellation) moves straight to `Faulted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    Received,
    Validating,
    ValidationFailed,
    Valid,
    Executing,
    Succeeded,
    Faulted,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Faulted)
    }
}

/// Routes typed requests to their rule after running their validators.
///
/// `Send + Sync`; share it behind an `Arc` between tasks. No lock is taken
/// on the dispatch path.
///
/// # Example
///
/// ```rust
/// use courier::dispatch::{HandlerError, Mediator, Registry, Request};
/// use tokio_util::sync::CancellationToken;
///
/// struct Ping;
///
/// impl Request for Ping {
///     type Response = &'static str;
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut builder = Registry::builder();
/// builder.register_rule::<Ping>(|_: Ping, _: CancellationToken| async {
///     Ok::<_, HandlerError>("pong")
/// })?;
///
/// let mediator = Mediator::new(builder.build());
/// let reply = mediator.send(Ping, &CancellationToken::new()).await?;
/// assert_eq!(reply, "pong");
/// # Ok(())
/// # }
/// ```
pub struct Mediator {
    registry: Registry,
    config: MediatorConfig,
    stats: MediatorStats,
}

impl Mediator {
    /// Create a mediator with the default configuration.
    pub fn new(registry: Registry) -> Self {
        Self::from_parts(registry, MediatorConfig::default())
    }

    /// Create a mediator with an explicit configuration.
    ///
    /// The configuration is validated the same way a loaded file is.
    pub fn with_config(registry: Registry, config: MediatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(registry, config))
    }

    fn from_parts(registry: Registry, config: MediatorConfig) -> Self {
        log::info!(
            "Mediator '{}' ready ({} request type(s))",
            config.name,
            registry.registered_requests().len()
        );
        Self {
            registry,
            config,
            stats: MediatorStats::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &MediatorConfig {
        &self.config
    }

    pub fn stats(&self) -> &MediatorStats {
        &self.stats
    }

    /// Dispatch `request`, delivering the outcome to exactly one of the
    /// continuations.
    pub async fn dispatch<R, S, E>(
        &self,
        request: R,
        on_success: S,
        on_error: E,
        cancel: &CancellationToken,
    ) where
        R: Request,
        S: FnOnce(R::Response),
        E: FnOnce(Fault),
    {
        match self.send(request, cancel).await {
            Ok(response) => on_success(response),
            Err(fault) => on_error(fault),
        }
    }

    /// Dispatch `request` and return the outcome.
    ///
    /// Every started dispatch is counted exactly once in the stats. A
    /// panic escaping with `catch_panics` off counts as unhandled; a send
    /// future dropped before completion counts as cancelled.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, Fault> {
        let started = Instant::now();
        let pending = PendingOutcome::start(&self.stats);

        let outcome = match AssertUnwindSafe(self.run(request, cancel))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                // Only reachable with `catch_panics` off.
                pending.abort(FaultKind::Unhandled);
                std::panic::resume_unwind(payload);
            }
        };
        pending.finish(&outcome);

        if let Some(threshold) = self.config.slow_dispatch_threshold() {
            let elapsed = started.elapsed();
            if elapsed > threshold {
                log::warn!(
                    "Mediator '{}': slow dispatch of {} took {:?} (threshold {:?})",
                    self.config.name,
                    std::any::type_name::<R>(),
                    elapsed,
                    threshold
                );
            }
        }

        outcome
    }

    async fn run<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, Fault> {
        let request_type = std::any::type_name::<R>();
        self.transition(request_type, DispatchState::Received);

        let Some((rule, validators)) = self.registry.handlers::<R>().and_then(|handlers| {
            handlers
                .rule
                .as_ref()
                .map(|rule| (Arc::clone(rule), handlers.validators.as_slice()))
        }) else {
            log::debug!(
                "Mediator '{}': no rule registered for {}",
                self.config.name,
                request_type
            );
            return Err(self.fault(request_type, Fault::NotRegistered { request_type }));
        };

        if cancel.is_cancelled() {
            return Err(self.cancelled(request_type, DispatchState::Received));
        }

        self.transition(request_type, DispatchState::Validating);
        let mut messages = Vec::new();
        for (index, validator) in validators.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(self.cancelled(request_type, DispatchState::Validating));
            }

            let result = if self.config.catch_panics {
                std::panic::catch_unwind(AssertUnwindSafe(|| {
                    validator.validate(&request, cancel)
                }))
            } else {
                Ok(validator.validate(&request, cancel))
            };

            match result {
                Ok(Ok(found)) => messages.extend(found),
                Ok(Err(e)) => {
                    return Err(self.unhandled(
                        request_type,
                        format!("validator #{} failed: {}", index + 1, e),
                        &e,
                    ));
                }
                Err(payload) => {
                    let message = panic_message(&*payload);
                    return Err(self.unhandled(
                        request_type,
                        format!("validator #{} panicked: {}", index + 1, message),
                        &message,
                    ));
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(self.cancelled(request_type, DispatchState::Validating));
        }

        if !messages.is_empty() {
            self.transition(request_type, DispatchState::ValidationFailed);
            if self.config.log_validation_failures {
                log::warn!(
                    "Mediator '{}': {} rejected: {}",
                    self.config.name,
                    request_type,
                    messages.join("; ")
                );
            }
            return Err(self.fault(request_type, Fault::Validation(messages)));
        }
        self.transition(request_type, DispatchState::Valid);

        if cancel.is_cancelled() {
            return Err(self.cancelled(request_type, DispatchState::Valid));
        }

        self.transition(request_type, DispatchState::Executing);
        let token = cancel.clone();
        let execution = async move { rule.handle(request, token).await };
        let guarded = async {
            if self.config.catch_panics {
                AssertUnwindSafe(execution).catch_unwind().await
            } else {
                Ok(execution.await)
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = guarded => Some(result),
        };

        match result {
            None => Err(self.cancelled(request_type, DispatchState::Executing)),
            Some(Ok(Ok(response))) => {
                self.transition(request_type, DispatchState::Succeeded);
                Ok(response)
            }
            Some(Ok(Err(_))) if cancel.is_cancelled() => {
                Err(self.cancelled(request_type, DispatchState::Executing))
            }
            Some(Ok(Err(e))) => Err(self.unhandled(
                request_type,
                format!("rule failed: {}", e),
                &e,
            )),
            Some(Err(payload)) => {
                let message = panic_message(&*payload);
                Err(self.unhandled(
                    request_type,
                    format!("rule panicked: {}", message),
                    &message,
                ))
            }
        }
    }

    fn transition(&self, request_type: &str, state: DispatchState) {
        log::debug!(
            "Mediator '{}': {} -> {:?}",
            self.config.name,
            request_type,
            state
        );
    }

    fn fault(&self, request_type: &str, fault: Fault) -> Fault {
        self.transition(request_type, DispatchState::Faulted);
        fault
    }

    fn cancelled(&self, request_type: &str, during: DispatchState) -> Fault {
        log::warn!(
            "Mediator '{}': {} cancelled while {:?}",
            self.config.name,
            request_type,
            during
        );
        self.fault(request_type, Fault::Cancelled)
    }

    fn unhandled(
        &self,
        request_type: &'static str,
        message: String,
        detail: &dyn fmt::Debug,
    ) -> Fault {
        log::error!(
            "Mediator '{}': unhandled fault in {}: {} ({:?})",
            self.config.name,
            request_type,
            message,
            detail
        );
        self.fault(
            request_type,
            Fault::Unhandled {
                request_type,
                message,
            },
        )
    }
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

/// Records the outcome of one dispatch, including dispatches that never
/// return normally.
struct PendingOutcome<'a> {
    stats: &'a MediatorStats,
    finished: bool,
}

impl<'a> PendingOutcome<'a> {
    fn start(stats: &'a MediatorStats) -> Self {
        stats.record_dispatch();
        Self {
            stats,
            finished: false,
        }
    }

    fn finish<T>(mut self, outcome: &Result<T, Fault>) {
        self.stats.record_outcome(outcome);
        self.finished = true;
    }

    fn abort(mut self, kind: FaultKind) {
        self.stats.record_fault(kind);
        self.finished = true;
    }
}

impl Drop for PendingOutcome<'_> {
    fn drop(&mut self) {
        // Dropped mid-flight: the caller abandoned the dispatch.
        if !self.finished {
            self.stats.record_fault(FaultKind::Cancelled);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
