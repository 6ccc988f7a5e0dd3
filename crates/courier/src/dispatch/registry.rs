// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rule and validator registry.
//!
//! Filled through a [`RegistryBuilder`] during startup, then frozen with
//! [`RegistryBuilder::build`]. The frozen [`Registry`] has no mutating API
//! and needs no locks.

use crate::dispatch::request::{Request, Rule, Validator};
use crate::error::ConfigurationError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Metadata about one registered request type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// Request type name (e.g., "app::CreateOrder")
    pub request_type: &'static str,
    /// Response type name (e.g., "u64")
    pub response_type: &'static str,
    /// Whether a rule is registered
    pub has_rule: bool,
    /// Number of validators registered
    pub validators: usize,
}

/// Handlers for one request type.
pub(crate) struct Handlers<R: Request> {
    pub(crate) rule: Option<Arc<dyn Rule<R>>>,
    pub(crate) validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R: Request> Default for Handlers<R> {
    fn default() -> Self {
        Self {
            rule: None,
            validators: Vec::new(),
        }
    }
}

/// Type-erased view of [`Handlers`].
trait Entry: Send + Sync {
    fn info(&self) -> RequestInfo;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<R: Request> Entry for Handlers<R> {
    fn info(&self) -> RequestInfo {
        RequestInfo {
            request_type: std::any::type_name::<R>(),
            response_type: std::any::type_name::<R::Response>(),
            has_rule: self.rule.is_some(),
            validators: self.validators.len(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Mutable registry used while the host is starting up.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<TypeId, Box<dyn Entry>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rule for `R`.
    ///
    /// Fails with [`ConfigurationError::DuplicateRule`] if `R` already has
    /// one; the existing rule is kept.
    pub fn register_rule<R: Request>(
        &mut self,
        rule: impl Rule<R>,
    ) -> Result<&mut Self, ConfigurationError> {
        let request_type = std::any::type_name::<R>();
        self.with_handlers::<R, _>(|handlers| {
            if handlers.rule.is_some() {
                return Err(ConfigurationError::duplicate_rule(request_type));
            }
            handlers.rule = Some(Arc::new(rule));
            Ok(())
        })?;
        log::debug!("Dispatch registry: registered rule for {}", request_type);
        Ok(self)
    }

    /// Append a validator for `R`. Validators run in registration order.
    pub fn register_validator<R: Request>(&mut self, validator: impl Validator<R>) -> &mut Self {
        let position = self.with_handlers::<R, _>(|handlers| {
            handlers.validators.push(Arc::new(validator));
            handlers.validators.len()
        });
        log::debug!(
            "Dispatch registry: registered validator #{} for {}",
            position,
            std::any::type_name::<R>()
        );
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        let mut rules = 0;
        let mut validators = 0;
        for entry in self.entries.values() {
            let info = entry.info();
            if info.has_rule {
                rules += 1;
            } else {
                log::warn!(
                    "Dispatch registry: {} has {} validator(s) but no rule",
                    info.request_type,
                    info.validators
                );
            }
            validators += info.validators;
        }
        log::info!(
            "Dispatch registry frozen: {} rule(s), {} validator(s)",
            rules,
            validators
        );
        Registry {
            entries: self.entries,
        }
    }

    /// Run `f` on the handlers for `R`, creating them on first use.
    fn with_handlers<R, T>(&mut self, f: impl FnOnce(&mut Handlers<R>) -> T) -> T
    where
        R: Request,
    {
        let key = TypeId::of::<R>();
        let mut handlers: Box<Handlers<R>> = self
            .entries
            .remove(&key)
            .and_then(|entry| entry.into_any().downcast::<Handlers<R>>().ok())
            .unwrap_or_default();
        let result = f(&mut handlers);
        self.entries.insert(key, handlers);
        result
    }
}

/// Frozen, read-only registry.
pub struct Registry {
    entries: HashMap<TypeId, Box<dyn Entry>>,
}

impl Registry {
    /// Start a new registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn handlers<R: Request>(&self) -> Option<&Handlers<R>> {
        self.entries
            .get(&TypeId::of::<R>())?
            .as_any()
            .downcast_ref::<Handlers<R>>()
    }

    /// Check whether a rule is registered for `R`.
    pub fn contains<R: Request>(&self) -> bool {
        self.handlers::<R>().is_some_and(|h| h.rule.is_some())
    }

    /// Number of validators registered for `R`.
    pub fn validator_count<R: Request>(&self) -> usize {
        self.handlers::<R>().map_or(0, |h| h.validators.len())
    }

    /// All request types known to the registry, sorted by name.
    pub fn registered_requests(&self) -> Vec<RequestInfo> {
        let mut infos: Vec<_> = self.entries.values().map(|entry| entry.info()).collect();
        infos.sort_by(|a, b| a.request_type.cmp(b.request_type));
        infos
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("requests", &self.registered_requests())
            .finish()
    }
}
