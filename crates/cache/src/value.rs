// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The value shape stored in a cache entry: either a JSON document or an
//! opaque blob.

#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Json(serde_json::Value),
    Blob(Vec<u8>),
}

impl CacheValue {
    pub fn size_bytes(&self) -> u64 {
        match self {
            CacheValue::Json(v) => serde_json::to_vec(v).map(|b| b.len() as u64).unwrap_or(0),
            CacheValue::Blob(b) => b.len() as u64,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            CacheValue::Json(_) => "json",
            CacheValue::Blob(_) => "bin",
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            CacheValue::Json(v) => Some(v),
            CacheValue::Blob(_) => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            CacheValue::Blob(b) => Some(b),
            CacheValue::Json(_) => None,
        }
    }
}
