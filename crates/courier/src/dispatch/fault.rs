// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch faults.

use std::fmt;

/// Terminal, classified failure of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// No rule is registered for the request type.
    NotRegistered { request_type: &'static str },

    /// One or more validators rejected the request. Messages keep validator
    /// registration order.
    Validation(Vec<String>),

    /// The caller's cancellation token fired before the dispatch completed.
    Cancelled,

    /// A rule or validator returned an error or panicked.
    Unhandled {
        request_type: &'static str,
        message: String,
    },
}

/// Discriminant of a [`Fault`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    NotRegistered,
    Validation,
    Cancelled,
    Unhandled,
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::NotRegistered { .. } => FaultKind::NotRegistered,
            Self::Validation(_) => FaultKind::Validation,
            Self::Cancelled => FaultKind::Cancelled,
            Self::Unhandled { .. } => FaultKind::Unhandled,
        }
    }

    /// Validation messages; empty for other faults.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Validation(messages) => messages,
            _ => &[],
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRegistered { request_type } => {
                write!(f, "No rule registered for {}", request_type)
            }
            Self::Validation(messages) => {
                write!(f, "Validation failed: {}", messages.join("; "))
            }
            Self::Cancelled => write!(f, "Dispatch cancelled"),
            Self::Unhandled {
                request_type,
                message,
            } => write!(f, "Unhandled fault in {}: {}", request_type, message),
        }
    }
}

impl std::error::Error for Fault {}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotRegistered => "not-registered",
            Self::Validation => "validation",
            Self::Cancelled => "cancelled",
            Self::Unhandled => "unhandled",
        };
        f.write_str(name)
    }
}
