// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Member Accessor
//!
//! Binds a cached [`TypeDescriptor`] to one live instance and exposes its
//! members by name.
//!
//! An accessor over `&T` is read-only. An accessor over `&mut T` adds
//! [`MemberAccessor::set`]; the borrow checker guarantees nobody else
//! touches the instance meanwhile.
//!
//! # Example
//!
//! ```rust
//! use courier::accessor::MemberAccessor;
//! use courier::meta::{Reflect, TypeBuilder, Value};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Reflect for Point {
//!     fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
//!         builder
//!             .field("X", |p: &Point| p.x, |p, v| p.x = v)
//!             .field("Y", |p: &Point| p.y, |p, v| p.y = v)
//!     }
//! }
//!
//! let mut point = Point { x: 1, y: 2 };
//! let mut accessor = MemberAccessor::of_mut(&mut point).unwrap();
//! accessor.set("x", Value::I32(10)).unwrap();
//! assert_eq!(accessor.get_as::<i32>("X").unwrap(), 10);
//! assert_eq!(accessor.get_names(), ["X", "Y"]);
//! ```

use crate::error::ConfigurationError;
use crate::meta::{FromValue, Reflect, TypeDescriptor, TypeMetadataCache, Value};
use indexmap::IndexMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by name-based member access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No readable (for `get`) or writable (for `set`) member with that name.
    #[error("{type_name} has no accessible member '{name}'")]
    UnknownMember {
        type_name: &'static str,
        name: String,
    },

    /// Value's runtime kind does not fit the member's declared kind.
    #[error("member '{member}' of {type_name} expects {expected}, got {got}")]
    TypeMismatch {
        type_name: &'static str,
        member: String,
        expected: String,
        got: &'static str,
    },
}

/// Name-based view over one instance of `T`.
///
/// `P` is the reference held: `&T` or `&mut T` (any `Deref<Target = T>`
/// works, e.g. a `Box<T>` or a lock guard).
pub struct MemberAccessor<T, P> {
    descriptor: Arc<TypeDescriptor<T>>,
    instance: P,
}

impl<'a, T: Reflect> MemberAccessor<T, &'a T> {
    /// Read-only accessor using the global metadata cache.
    pub fn of(instance: &'a T) -> Result<Self, ConfigurationError> {
        let descriptor = TypeMetadataCache::global().get_or_build::<T>()?;
        Ok(Self::new(descriptor, instance))
    }
}

impl<'a, T: Reflect> MemberAccessor<T, &'a mut T> {
    /// Read/write accessor using the global metadata cache.
    pub fn of_mut(instance: &'a mut T) -> Result<Self, ConfigurationError> {
        let descriptor = TypeMetadataCache::global().get_or_build::<T>()?;
        Ok(Self::new(descriptor, instance))
    }
}

impl<T, P: Deref<Target = T>> MemberAccessor<T, P> {
    pub fn new(descriptor: Arc<TypeDescriptor<T>>, instance: P) -> Self {
        Self {
            descriptor,
            instance,
        }
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor<T>> {
        &self.descriptor
    }

    /// Current value of a readable member.
    pub fn get(&self, name: &str) -> Result<Value, AccessError> {
        self.descriptor
            .member(name)
            .and_then(|member| member.read(&self.instance))
            .ok_or_else(|| self.unknown(name))
    }

    /// Typed read.
    pub fn get_as<V: FromValue>(&self, name: &str) -> Result<V, AccessError> {
        let value = self.get(name)?;
        V::from_value(value).map_err(|e| AccessError::TypeMismatch {
            type_name: self.descriptor.type_name(),
            member: name.to_string(),
            expected: e.expected,
            got: e.got,
        })
    }

    /// Readable member names, in declaration order.
    pub fn get_names(&self) -> &[String] {
        self.descriptor.readable_names()
    }

    /// Writable member names, in declaration order.
    pub fn set_names(&self) -> &[String] {
        self.descriptor.writable_names()
    }

    /// Snapshot of every readable member, computed fresh on each call.
    pub fn values(&self) -> IndexMap<String, Value> {
        self.descriptor
            .members()
            .iter()
            .filter_map(|member| {
                member
                    .read(&self.instance)
                    .map(|value| (member.name().to_string(), value))
            })
            .collect()
    }

    /// Release the borrowed instance.
    pub fn into_inner(self) -> P {
        self.instance
    }

    fn unknown(&self, name: &str) -> AccessError {
        AccessError::UnknownMember {
            type_name: self.descriptor.type_name(),
            name: name.to_string(),
        }
    }
}

impl<T, P: DerefMut<Target = T>> MemberAccessor<T, P> {
    /// Assign a writable member.
    ///
    /// The value is checked against the declared kind before the setter
    /// runs; on error the instance is left untouched.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        let descriptor = Arc::clone(&self.descriptor);
        let member = descriptor
            .member(name)
            .filter(|member| member.can_write())
            .ok_or_else(|| self.unknown(name))?;

        let mismatch = |got: &'static str| AccessError::TypeMismatch {
            type_name: descriptor.type_name(),
            member: member.name().to_string(),
            expected: member.kind().to_string(),
            got,
        };

        if !member.kind().accepts(&value) {
            return Err(mismatch(value.type_label()));
        }

        match member.write(&mut self.instance, value) {
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => Err(mismatch(e.got)),
            None => Err(self.unknown(name)),
        }
    }
}
