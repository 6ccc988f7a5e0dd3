// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type metadata cache.
//!
//! Maps a `TypeId` to the [`TypeDescriptor`] built from that type's
//! [`Reflect`] implementation.
//!
//! # Concurrency
//!
//! Each type owns a once-cell. The map shard is locked only long enough to
//! fetch or insert that cell; the build itself runs under the cell's guard.
//! N concurrent first callers for one type trigger exactly one build, and
//! builds for unrelated types never wait on each other.

use crate::error::ConfigurationError;
use crate::meta::{Reflect, TypeBuilder, TypeDescriptor};
use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};
use std::any::{Any, TypeId};
use std::sync::Arc;

static GLOBAL: Lazy<TypeMetadataCache> = Lazy::new(TypeMetadataCache::new);

struct CachedType {
    type_name: &'static str,
    descriptor: Arc<dyn Any + Send + Sync>,
}

/// Lazily populated, never-evicting descriptor cache.
#[derive(Default)]
pub struct TypeMetadataCache {
    entries: DashMap<TypeId, Arc<OnceCell<CachedType>>>,
}

impl TypeMetadataCache {
    /// Create an empty cache.
    ///
    /// Most callers want [`TypeMetadataCache::global`]; separate instances
    /// are useful for isolation in tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache.
    pub fn global() -> &'static TypeMetadataCache {
        &GLOBAL
    }

    /// Return the descriptor for `T`, building it on first request.
    ///
    /// A failed build leaves nothing cached; the next call retries and fails
    /// the same way.
    pub fn get_or_build<T: Reflect>(&self) -> Result<Arc<TypeDescriptor<T>>, ConfigurationError> {
        let cell = self.entries.entry(TypeId::of::<T>()).or_default().value().clone();

        let cached = cell.get_or_try_init(|| {
            let descriptor = T::describe(TypeBuilder::new()).build().map_err(|e| {
                log::error!(
                    "Metadata cache: failed to describe {}: {}",
                    std::any::type_name::<T>(),
                    e
                );
                e
            })?;
            log::debug!(
                "Metadata cache: built descriptor for {} ({} members)",
                descriptor.type_name(),
                descriptor.members().len()
            );
            Ok::<_, ConfigurationError>(CachedType {
                type_name: descriptor.type_name(),
                descriptor: Arc::new(descriptor),
            })
        })?;

        downcast::<T>(cached)
    }

    /// Cached descriptor for `T`, without building.
    pub fn get<T: 'static>(&self) -> Option<Arc<TypeDescriptor<T>>> {
        let cell = self.entries.get(&TypeId::of::<T>())?.value().clone();
        let cached = cell.get()?;
        downcast::<T>(cached).ok()
    }

    /// Check whether a descriptor for `T` has been built.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries
            .get(&TypeId::of::<T>())
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Number of built descriptors.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type names of all built descriptors, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .entries
            .iter()
            .filter_map(|entry| entry.value().get().map(|cached| cached.type_name))
            .collect();
        names.sort_unstable();
        names
    }
}

fn downcast<T: 'static>(cached: &CachedType) -> Result<Arc<TypeDescriptor<T>>, ConfigurationError> {
    Arc::clone(&cached.descriptor)
        .downcast::<TypeDescriptor<T>>()
        .map_err(|_| ConfigurationError::DescriptorMismatch {
            type_name: cached.type_name,
        })
}
