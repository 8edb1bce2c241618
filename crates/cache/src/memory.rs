// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory cache layer: a bounded map of [`CacheValue`]s. Bounds
//! enforcement lives in
//! `manager.rs`, which evicts via the index before ever calling
//! [`MemoryLayer::insert`] over budget.

use crate::value::CacheValue;
use pinokio_core::CacheKey;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryLayer {
    values: HashMap<CacheKey, CacheValue>,
}

impl MemoryLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.values.get(key).cloned()
    }

    pub fn insert(&mut self, key: CacheKey, value: CacheValue) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &CacheKey) -> Option<CacheValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.values.contains_key(key)
    }
}
