// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared member kinds.

use crate::meta::Value;
use std::any::TypeId;
use std::fmt;

/// Classification of a member's declared type.
///
/// This is a closed set: every member exposed through a
/// [`TypeDescriptor`](crate::meta::TypeDescriptor) maps onto exactly one
/// of these kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
    Decimal,
    Char,
    String,
    DateTime,
    TimeSpan,
    Uuid,
    /// Enumeration, identified by its Rust type name.
    Enum { type_name: &'static str },
    /// Optional value of the inner kind.
    Nullable(Box<MemberKind>),
    /// Opaque shared object.
    Object {
        type_id: TypeId,
        type_name: &'static str,
    },
    /// Homogeneous collection of the element kind.
    Collection(Box<MemberKind>),
}

impl MemberKind {
    /// Kind for an opaque object of type `T`.
    pub fn object<T: 'static>() -> Self {
        Self::Object {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Check if this kind accepts `Null`.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Kind with any `Nullable` wrapper removed.
    pub fn underlying(&self) -> &MemberKind {
        match self {
            Self::Nullable(inner) => inner.underlying(),
            other => other,
        }
    }

    /// Check whether a value's runtime classification fits this kind.
    ///
    /// Primitive kinds require the exact variant; no implicit widening.
    // @audit-ok: Simple pattern matching - kind/value compatibility table
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Nullable(_), Value::Null) => true,
            (Self::Nullable(inner), other) => inner.accepts(other),
            (Self::Collection(element), Value::Collection(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            (Self::Enum { type_name }, Value::Enum { type_name: got, .. }) => type_name == got,
            (Self::Object { type_id, .. }, Value::Object(object)) => object.type_id() == *type_id,
            (Self::Bool, Value::Bool(_))
            | (Self::I8, Value::I8(_))
            | (Self::I16, Value::I16(_))
            | (Self::I32, Value::I32(_))
            | (Self::I64, Value::I64(_))
            | (Self::I128, Value::I128(_))
            | (Self::U8, Value::U8(_))
            | (Self::U16, Value::U16(_))
            | (Self::U32, Value::U32(_))
            | (Self::U64, Value::U64(_))
            | (Self::U128, Value::U128(_))
            | (Self::F32, Value::F32(_))
            | (Self::F64, Value::F64(_))
            | (Self::Decimal, Value::Decimal(_))
            | (Self::Char, Value::Char(_))
            | (Self::String, Value::String(_))
            | (Self::DateTime, Value::DateTime(_))
            | (Self::TimeSpan, Value::TimeSpan(_))
            | (Self::Uuid, Value::Uuid(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::I8 => f.write_str("i8"),
            Self::I16 => f.write_str("i16"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::I128 => f.write_str("i128"),
            Self::U8 => f.write_str("u8"),
            Self::U16 => f.write_str("u16"),
            Self::U32 => f.write_str("u32"),
            Self::U64 => f.write_str("u64"),
            Self::U128 => f.write_str("u128"),
            Self::F32 => f.write_str("f32"),
            Self::F64 => f.write_str("f64"),
            Self::Decimal => f.write_str("decimal"),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("string"),
            Self::DateTime => f.write_str("datetime"),
            Self::TimeSpan => f.write_str("timespan"),
            Self::Uuid => f.write_str("uuid"),
            Self::Enum { type_name } => write!(f, "enum {}", type_name),
            Self::Nullable(inner) => write!(f, "nullable<{}>", inner),
            Self::Object { type_name, .. } => write!(f, "object {}", type_name),
            Self::Collection(element) => write!(f, "collection<{}>", element),
        }
    }
}
