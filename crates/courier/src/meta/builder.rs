// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder used by [`Reflect`] implementations.
//!
//! # Example
//!
//! ```
//! use courier::meta::{Reflect, TypeBuilder};
//!
//! struct Order {
//!     id: u64,
//!     note: Option<String>,
//! }
//!
//! impl Reflect for Order {
//!     fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
//!         builder
//!             .readonly_field("Id", |o: &Order| o.id)
//!             .field("Note", |o: &Order| o.note.clone(), |o, v| o.note = v)
//!     }
//! }
//!
//! let descriptor = Order::describe(TypeBuilder::new()).build().unwrap();
//! assert_eq!(descriptor.readable_names(), ["Id", "Note"]);
//! assert_eq!(descriptor.writable_names(), ["Note"]);
//! ```

use crate::error::ConfigurationError;
use crate::meta::descriptor::{Getter, MemberDescriptor, MemberOrigin, Setter, TypeDescriptor};
use crate::meta::{MemberValue, Value, ValueMismatch};
use std::sync::Arc;

/// Introspection hook for types exposed through the metadata cache.
///
/// `describe` enumerates the type's members once; the resulting descriptor
/// is cached for the life of the [`TypeMetadataCache`](crate::meta::TypeMetadataCache).
pub trait Reflect: Sized + 'static {
    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self>;
}

/// Collects member declarations for one type.
pub struct TypeBuilder<T> {
    type_name: &'static str,
    members: Vec<MemberDescriptor<T>>,
}

impl<T: 'static> Default for TypeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> TypeBuilder<T> {
    pub fn new() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            members: Vec::new(),
        }
    }

    /// Read/write field.
    #[must_use]
    pub fn field<V, G, S>(self, name: impl Into<String>, get: G, set: S) -> Self
    where
        V: MemberValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push::<V>(
            name.into(),
            MemberOrigin::Field,
            Some(compile_getter(get)),
            Some(compile_setter(set)),
        )
    }

    /// Field without a setter.
    #[must_use]
    pub fn readonly_field<V, G>(self, name: impl Into<String>, get: G) -> Self
    where
        V: MemberValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.push::<V>(
            name.into(),
            MemberOrigin::Field,
            Some(compile_getter(get)),
            None,
        )
    }

    /// Read/write property.
    #[must_use]
    pub fn property<V, G, S>(self, name: impl Into<String>, get: G, set: S) -> Self
    where
        V: MemberValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push::<V>(
            name.into(),
            MemberOrigin::Property,
            Some(compile_getter(get)),
            Some(compile_setter(set)),
        )
    }

    /// Read-only property.
    #[must_use]
    pub fn getter<V, G>(self, name: impl Into<String>, get: G) -> Self
    where
        V: MemberValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.push::<V>(
            name.into(),
            MemberOrigin::Property,
            Some(compile_getter(get)),
            None,
        )
    }

    /// Write-only property.
    #[must_use]
    pub fn setter<V, S>(self, name: impl Into<String>, set: S) -> Self
    where
        V: MemberValue,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.push::<V>(
            name.into(),
            MemberOrigin::Property,
            None,
            Some(compile_setter(set)),
        )
    }

    /// Number of members declared so far.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Freeze into a [`TypeDescriptor`].
    pub fn build(self) -> Result<TypeDescriptor<T>, ConfigurationError> {
        TypeDescriptor::from_members(self.type_name, self.members)
    }

    fn push<V: MemberValue>(
        mut self,
        name: String,
        origin: MemberOrigin,
        getter: Option<Getter<T>>,
        setter: Option<Setter<T>>,
    ) -> Self {
        self.members
            .push(MemberDescriptor::new(name, V::kind(), origin, getter, setter));
        self
    }
}

fn compile_getter<T, V, G>(get: G) -> Getter<T>
where
    T: 'static,
    V: MemberValue,
    G: Fn(&T) -> V + Send + Sync + 'static,
{
    Arc::new(move |target: &T| get(target).into_value())
}

fn compile_setter<T, V, S>(set: S) -> Setter<T>
where
    T: 'static,
    V: MemberValue,
    S: Fn(&mut T, V) + Send + Sync + 'static,
{
    Arc::new(move |target: &mut T, value: Value| -> Result<(), ValueMismatch> {
        let converted = V::from_value(value)?;
        set(target, converted);
        Ok(())
    })
}
