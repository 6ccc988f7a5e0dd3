// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Startup-time configuration errors.
//!
//! Everything in here is raised while descriptors are built or while the
//! dispatch registry is being filled. None of it is recoverable at runtime:
//! a host that sees a [`ConfigurationError`] must abort startup.

use thiserror::Error;

/// Errors detected while building type metadata or registering handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A second rule was registered for a request type.
    #[error("duplicate rule for request type {request_type}")]
    DuplicateRule { request_type: &'static str },

    /// Two members of one type collide under case-insensitive comparison.
    #[error("ambiguous member names on {type_name}: '{first}' and '{second}'")]
    AmbiguousMember {
        type_name: &'static str,
        first: String,
        second: String,
    },

    /// A member was declared with an empty name.
    #[error("empty member name on {type_name}")]
    EmptyMemberName { type_name: &'static str },

    /// A cached descriptor did not belong to the requested type.
    #[error("cached descriptor for {type_name} has an unexpected type")]
    DescriptorMismatch { type_name: &'static str },
}

impl ConfigurationError {
    /// Creates a duplicate rule error.
    pub fn duplicate_rule(request_type: &'static str) -> Self {
        Self::DuplicateRule { request_type }
    }

    /// Creates an ambiguous member error.
    pub fn ambiguous_member(
        type_name: &'static str,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::AmbiguousMember {
            type_name,
            first: first.into(),
            second: second.into(),
        }
    }
}
