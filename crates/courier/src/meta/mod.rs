// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type Metadata
//!
//! Name-based member access for arbitrary Rust types, without paying a
//! lookup or conversion setup cost on every call.
//!
//! # Features
//!
//! - **Reflect**: Per-type introspection hook, implemented once by the host
//! - **TypeDescriptor**: Immutable member list with a case-insensitive index
//! - **TypeMetadataCache**: Build-once, type-keyed descriptor cache
//! - **Value**: Dynamic value carried through getters and setters
//!
//! # Example
//!
//! ```rust
//! use courier::meta::{MemberKind, Reflect, TypeBuilder, TypeMetadataCache};
//!
//! struct Customer {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl Reflect for Customer {
//!     fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
//!         builder
//!             .field("Id", |c: &Customer| c.id, |c, v| c.id = v)
//!             .field("Name", |c: &Customer| c.name.clone(), |c, v| c.name = v)
//!     }
//! }
//!
//! let cache = TypeMetadataCache::new();
//! let descriptor = cache.get_or_build::<Customer>().unwrap();
//!
//! // Lookups ignore case
//! let name = descriptor.member("name").unwrap();
//! assert_eq!(name.kind(), &MemberKind::String);
//! ```

mod builder;
mod cache;
mod descriptor;
mod kind;
mod value;

pub use builder::{Reflect, TypeBuilder};
pub use cache::TypeMetadataCache;
pub use descriptor::{MemberDescriptor, MemberOrigin, TypeDescriptor};
pub use kind::MemberKind;
pub use value::{EnumValue, FromValue, IntoValue, MemberValue, ObjectRef, Value, ValueMismatch};
