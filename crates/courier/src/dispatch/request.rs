// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request, rule and validator traits.

use futures::future::BoxFuture;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Error type returned by rules and validators.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A typed request routed by the [`Mediator`](crate::dispatch::Mediator).
///
/// The request's Rust type is the routing key.
pub trait Request: Send + Sync + 'static {
    /// Value produced by the request's rule.
    type Response: Send + 'static;
}

/// The single handler computing a response for `R`.
///
/// Implemented for any `Fn(R, CancellationToken) -> impl Future` closure.
/// The token is the caller's; long-running rules should observe it.
pub trait Rule<R: Request>: Send + Sync + 'static {
    fn handle(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<R::Response, HandlerError>>;
}

impl<R, F, Fut> Rule<R> for F
where
    R: Request,
    F: Fn(R, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, HandlerError>> + Send + 'static,
{
    fn handle(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<R::Response, HandlerError>> {
        Box::pin(self(request, cancel))
    }
}

/// Produces zero or more failure messages for a request.
///
/// An empty list means the request passed. `Err` is reserved for the
/// validator itself breaking (lookup failed, etc.) and is reported as an
/// unhandled fault, not a validation failure.
pub trait Validator<R: Request>: Send + Sync + 'static {
    fn validate(&self, request: &R, cancel: &CancellationToken)
        -> Result<Vec<String>, HandlerError>;
}

impl<R, F> Validator<R> for F
where
    R: Request,
    F: Fn(&R) -> Vec<String> + Send + Sync + 'static,
{
    fn validate(
        &self,
        request: &R,
        _cancel: &CancellationToken,
    ) -> Result<Vec<String>, HandlerError> {
        Ok(self(request))
    }
}
