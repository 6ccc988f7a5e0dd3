// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic member values and conversions to/from Rust types.

use crate::meta::MemberKind;
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Shared, type-erased object stored in a [`Value::Object`].
///
/// Equality is identity: two refs are equal when they point at the same
/// allocation.
#[derive(Clone)]
pub struct ObjectRef {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ObjectRef {
    /// Wrap a shared object.
    pub fn new<T: Any + Send + Sync>(object: Arc<T>) -> Self {
        Self {
            inner: object,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// `TypeId` of the wrapped object.
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Rust type name of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the object as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Recover the typed `Arc`, or give the ref back on mismatch.
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>, Self> {
        let type_name = self.type_name;
        self.inner
            .downcast::<T>()
            .map_err(|inner| Self { inner, type_name })
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef<{}>", self.type_name)
    }
}

/// A dynamic value read from or written to a member.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Primitives
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Char(char),
    String(String),
    DateTime(DateTime<Utc>),
    TimeSpan(TimeDelta),
    Uuid(Uuid),

    // Composites
    Enum {
        type_name: &'static str,
        value: i64,
        name: &'static str,
    },
    Object(ObjectRef),
    Collection(Vec<Value>),

    // Special
    Null,
}

impl Value {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short label of the runtime classification, used in mismatch errors.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::I128(_) => "i128",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::U128(_) => "u128",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Decimal(_) => "decimal",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::DateTime(_) => "datetime",
            Self::TimeSpan(_) => "timespan",
            Self::Uuid(_) => "uuid",
            Self::Enum { .. } => "enum",
            Self::Object(_) => "object",
            Self::Collection(_) => "collection",
            Self::Null => "null",
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64, widening any signed integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::I128(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as u64, widening any unsigned integer that fits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U8(v) => Some(u64::from(*v)),
            Self::U16(v) => Some(u64::from(*v)),
            Self::U32(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            Self::U128(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as collection.
    pub fn as_collection(&self) -> Option<&[Value]> {
        match self {
            Self::Collection(v) => Some(v),
            _ => None,
        }
    }

    /// Get enum variant name.
    pub fn enum_variant(&self) -> Option<&'static str> {
        match self {
            Self::Enum { name, .. } => Some(*name),
            _ => None,
        }
    }
}

/// A value could not be converted to the requested Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMismatch {
    pub expected: String,
    pub got: &'static str,
}

impl ValueMismatch {
    /// Mismatch against a declared kind.
    pub fn new(expected: &MemberKind, got: &Value) -> Self {
        Self {
            expected: expected.to_string(),
            got: got.type_label(),
        }
    }
}

impl fmt::Display for ValueMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.got)
    }
}

impl std::error::Error for ValueMismatch {}

/// Trait for converting into [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Trait for converting from [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueMismatch>;
}

/// A Rust type usable as a reflected member.
///
/// Ties the type to its declared [`MemberKind`] so descriptors can be
/// classified without inspecting values.
pub trait MemberValue: IntoValue + FromValue + Send + 'static {
    fn kind() -> MemberKind;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        Ok(value)
    }
}

macro_rules! impl_scalar_value {
    ($ty:ty, $variant:ident) => {
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(ValueMismatch::new(&MemberKind::$variant, &other)),
                }
            }
        }

        impl MemberValue for $ty {
            fn kind() -> MemberKind {
                MemberKind::$variant
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_scalar_value!(bool, Bool);
impl_scalar_value!(i8, I8);
impl_scalar_value!(i16, I16);
impl_scalar_value!(i32, I32);
impl_scalar_value!(i64, I64);
impl_scalar_value!(i128, I128);
impl_scalar_value!(u8, U8);
impl_scalar_value!(u16, U16);
impl_scalar_value!(u32, U32);
impl_scalar_value!(u64, U64);
impl_scalar_value!(u128, U128);
impl_scalar_value!(f32, F32);
impl_scalar_value!(f64, F64);
impl_scalar_value!(Decimal, Decimal);
impl_scalar_value!(char, Char);
impl_scalar_value!(String, String);
impl_scalar_value!(DateTime<Utc>, DateTime);
impl_scalar_value!(TimeDelta, TimeSpan);
impl_scalar_value!(Uuid, Uuid);

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Collection(v.into_iter().map(Into::into).collect())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: MemberValue> MemberValue for Option<T> {
    fn kind() -> MemberKind {
        MemberKind::Nullable(Box::new(T::kind()))
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Collection(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Collection(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueMismatch {
                expected: "collection".to_string(),
                got: other.type_label(),
            }),
        }
    }
}

impl<T: MemberValue> MemberValue for Vec<T> {
    fn kind() -> MemberKind {
        MemberKind::Collection(Box::new(T::kind()))
    }
}

impl<T: Any + Send + Sync> IntoValue for Arc<T> {
    fn into_value(self) -> Value {
        Value::Object(ObjectRef::new(self))
    }
}

impl<T: Any + Send + Sync> FromValue for Arc<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Object(object) => object.downcast::<T>().map_err(|object| ValueMismatch {
                expected: MemberKind::object::<T>().to_string(),
                got: object.type_name(),
            }),
            other => Err(ValueMismatch::new(&MemberKind::object::<T>(), &other)),
        }
    }
}

impl<T: Any + Send + Sync> MemberValue for Arc<T> {
    fn kind() -> MemberKind {
        MemberKind::object::<T>()
    }
}

/// Rust enums exposed as [`MemberKind::Enum`] members.
///
/// Implement this, then invoke [`enum_value!`](crate::enum_value) to derive
/// the value conversions.
pub trait EnumValue: Sized + Send + 'static {
    /// Numeric discriminant of this variant.
    fn discriminant(&self) -> i64;

    /// Declared name of this variant.
    fn variant_name(&self) -> &'static str;

    /// Variant for a discriminant, if any.
    fn from_discriminant(value: i64) -> Option<Self>;
}

/// Implements [`IntoValue`], [`FromValue`] and [`MemberValue`] for a type
/// that implements [`EnumValue`].
#[macro_export]
macro_rules! enum_value {
    ($ty:ty) => {
        impl $crate::meta::IntoValue for $ty {
            fn into_value(self) -> $crate::meta::Value {
                $crate::meta::Value::Enum {
                    type_name: ::std::any::type_name::<$ty>(),
                    value: $crate::meta::EnumValue::discriminant(&self),
                    name: $crate::meta::EnumValue::variant_name(&self),
                }
            }
        }

        impl $crate::meta::FromValue for $ty {
            fn from_value(
                value: $crate::meta::Value,
            ) -> ::std::result::Result<Self, $crate::meta::ValueMismatch> {
                let kind = <$ty as $crate::meta::MemberValue>::kind();
                match value {
                    $crate::meta::Value::Enum {
                        type_name,
                        value: discriminant,
                        ..
                    } if type_name == ::std::any::type_name::<$ty>() => {
                        <$ty as $crate::meta::EnumValue>::from_discriminant(discriminant).ok_or(
                            $crate::meta::ValueMismatch {
                                expected: kind.to_string(),
                                got: "enum",
                            },
                        )
                    }
                    other => Err($crate::meta::ValueMismatch::new(&kind, &other)),
                }
            }
        }

        impl $crate::meta::MemberValue for $ty {
            fn kind() -> $crate::meta::MemberKind {
                $crate::meta::MemberKind::Enum {
                    type_name: ::std::any::type_name::<$ty>(),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    impl EnumValue for Color {
        fn discriminant(&self) -> i64 {
            *self as i64
        }

        fn variant_name(&self) -> &'static str {
            match self {
                Self::Red => "Red",
                Self::Green => "Green",
            }
        }

        fn from_discriminant(value: i64) -> Option<Self> {
            match value {
                0 => Some(Self::Red),
                1 => Some(Self::Green),
                _ => None,
            }
        }
    }

    crate::enum_value!(Color);

    #[test]
    fn test_primitive_values() {
        let v = Value::from(42u32);
        assert_eq!(v.as_u64(), Some(42));
        assert_eq!(v.as_i64(), None);

        let v = Value::from(-5i16);
        assert_eq!(v.as_i64(), Some(-5));

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.type_label(), "string");

        assert_eq!(Value::from(true).as_bool(), Some(true));
    }

    #[test]
    fn test_from_value_mismatch() {
        let err = u32::from_value(Value::I32(1)).unwrap_err();
        assert_eq!(err.expected, "u32");
        assert_eq!(err.got, "i32");
        assert_eq!(err.to_string(), "expected u32, got i32");
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(Value::I32(3)).unwrap(), Some(3));
        assert_eq!(None::<i32>.into_value(), Value::Null);
        assert_eq!(
            <Option<i32> as MemberValue>::kind(),
            MemberKind::Nullable(Box::new(MemberKind::I32))
        );
    }

    #[test]
    fn test_collection_values() {
        let v = vec![1u8, 2, 3].into_value();
        let items = v.as_collection().expect("collection");
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], Value::U8(3));
        assert_eq!(Vec::<u8>::from_value(v).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_enum_value() {
        let v = Color::Green.into_value();
        assert_eq!(v.enum_variant(), Some("Green"));
        assert_eq!(Color::from_value(v).unwrap(), Color::Green);

        let bogus = Value::Enum {
            type_name: std::any::type_name::<Color>(),
            value: 9,
            name: "Blue",
        };
        assert!(Color::from_value(bogus).is_err());
    }

    #[test]
    fn test_object_identity() {
        let shared = Arc::new(String::from("payload"));
        let a = shared.clone().into_value();
        let b = shared.clone().into_value();
        let c = Arc::new(String::from("payload")).into_value();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let back = Arc::<String>::from_value(a).unwrap();
        assert!(Arc::ptr_eq(&back, &shared));
        assert!(Arc::<u32>::from_value(b).is_err());
    }
}
