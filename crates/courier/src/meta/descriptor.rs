// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Immutable per-type member metadata.

use crate::error::ConfigurationError;
use crate::meta::{MemberKind, Value, ValueMismatch};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Compiled, type-erased read function.
pub(crate) type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;

/// Compiled, type-erased write function.
pub(crate) type Setter<T> = Arc<dyn Fn(&mut T, Value) -> Result<(), ValueMismatch> + Send + Sync>;

/// Whether a member was declared as a plain field or a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberOrigin {
    Field,
    Property,
}

/// One named member of a reflected type.
pub struct MemberDescriptor<T> {
    name: String,
    kind: MemberKind,
    origin: MemberOrigin,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
}

impl<T> MemberDescriptor<T> {
    pub(crate) fn new(
        name: String,
        kind: MemberKind,
        origin: MemberOrigin,
        getter: Option<Getter<T>>,
        setter: Option<Setter<T>>,
    ) -> Self {
        Self {
            name,
            kind,
            origin,
            getter,
            setter,
        }
    }

    /// Declared spelling of the member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind.
    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    pub fn origin(&self) -> MemberOrigin {
        self.origin
    }

    /// True if the member has a getter.
    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    /// True if the member has a setter.
    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the member from `target`. `None` for write-only members.
    pub fn read(&self, target: &T) -> Option<Value> {
        self.getter.as_ref().map(|get| get(target))
    }

    /// Write `value` into `target`. `None` for read-only members.
    ///
    /// No kind check happens here beyond what the conversion itself rejects;
    /// callers wanting the declared-kind check go through
    /// [`MemberAccessor::set`](crate::accessor::MemberAccessor::set).
    pub fn write(&self, target: &mut T, value: Value) -> Option<Result<(), ValueMismatch>> {
        self.setter.as_ref().map(|set| set(target, value))
    }
}

impl<T> fmt::Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("origin", &self.origin)
            .field("can_read", &self.can_read())
            .field("can_write", &self.can_write())
            .finish()
    }
}

/// Member metadata for one Rust type.
///
/// Built once by [`TypeBuilder::build`](crate::meta::TypeBuilder::build) and
/// never mutated afterwards. Name lookups ignore ASCII and Unicode case;
/// the name lists keep declaration order and declared spelling.
pub struct TypeDescriptor<T> {
    type_id: TypeId,
    type_name: &'static str,
    members: Vec<MemberDescriptor<T>>,
    index: HashMap<String, usize>,
    readable: Vec<String>,
    writable: Vec<String>,
}

impl<T: 'static> TypeDescriptor<T> {
    /// Index the members and precompute the name lists.
    ///
    /// Fails on an empty name or on two names that differ only by case.
    pub(crate) fn from_members(
        type_name: &'static str,
        members: Vec<MemberDescriptor<T>>,
    ) -> Result<Self, ConfigurationError> {
        let mut index = HashMap::with_capacity(members.len());

        for (position, member) in members.iter().enumerate() {
            if member.name.is_empty() {
                return Err(ConfigurationError::EmptyMemberName { type_name });
            }
            if let Some(existing) = index.insert(fold(&member.name), position) {
                return Err(ConfigurationError::ambiguous_member(
                    type_name,
                    members[existing].name.clone(),
                    member.name.clone(),
                ));
            }
        }

        let readable = members
            .iter()
            .filter(|m| m.can_read())
            .map(|m| m.name.clone())
            .collect();
        let writable = members
            .iter()
            .filter(|m| m.can_write())
            .map(|m| m.name.clone())
            .collect();

        Ok(Self {
            type_id: TypeId::of::<T>(),
            type_name,
            members,
            index,
            readable,
            writable,
        })
    }
}

impl<T> TypeDescriptor<T> {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Case-insensitive member lookup.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.index.get(&fold(name)).map(|&i| &self.members[i])
    }

    /// All members in declaration order.
    pub fn members(&self) -> &[MemberDescriptor<T>] {
        &self.members
    }

    /// Members declared as fields.
    pub fn fields(&self) -> impl Iterator<Item = &MemberDescriptor<T>> {
        self.members
            .iter()
            .filter(|m| m.origin == MemberOrigin::Field)
    }

    /// Members declared as properties.
    pub fn properties(&self) -> impl Iterator<Item = &MemberDescriptor<T>> {
        self.members
            .iter()
            .filter(|m| m.origin == MemberOrigin::Property)
    }

    /// Names of members with a getter.
    pub fn readable_names(&self) -> &[String] {
        &self.readable
    }

    /// Names of members with a setter.
    pub fn writable_names(&self) -> &[String] {
        &self.writable
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("members", &self.members)
            .finish()
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}
