// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pinokio_recovery::RecoveryHooks` implementation. The recovery crate
//! cannot reinstall dependencies, reset an environment, fix permissions,
//! or bump memory on its own — it doesn't own the Environment Manager,
//! the Catalog, or the platform's resource limits. The daemon wires all
//! three in, since it is the only place every component meets.

use async_trait::async_trait;
use pinokio_cache::CacheManager;
use pinokio_core::{AppId, AppProfile, CacheKind, Error, PathKind};
use pinokio_env::EnvManager;
use pinokio_platform::PathMap;
use pinokio_shell::exec::{self, ExecOptions};
use std::sync::Arc;

pub struct DaemonHooks {
    pub env: Arc<EnvManager>,
    pub cache: Arc<CacheManager>,
    pub path_map: Arc<PathMap>,
}

impl DaemonHooks {
    /// The Install Engine doesn't persist the profile it analyzes; the
    /// daemon caches it under `CacheKind::AppMetadata` keyed by app id so
    /// recovery actions that need dependency info don't have to re-analyze
    /// the app's source tree from scratch.
    async fn cached_profile(&self, app_id: &AppId) -> Result<AppProfile, Error> {
        let key = pinokio_core::CacheKey::new(app_id.as_str());
        match self.cache.get(&key, CacheKind::AppMetadata).await? {
            Some(value) => {
                let json = value.as_json().ok_or_else(|| Error::corrupt(format!("cached profile for {app_id} is not JSON")))?;
                serde_json::from_value(json.clone())
                    .map_err(|e| Error::corrupt(format!("cached profile for {app_id} is malformed: {e}")))
            }
            None => Err(Error::not_found(format!("no cached profile for {app_id}; run apps.analyze first"))),
        }
    }
}

#[async_trait]
impl pinokio_recovery::RecoveryHooks for DaemonHooks {
    async fn reinstall_dependencies(&self, app_id: &AppId) -> Result<(), Error> {
        let profile = self.cached_profile(app_id).await?;
        if self.env.exists(app_id) {
            self.env.destroy(app_id).await?;
        }
        self.env.ensure(app_id, &profile.deps).await?;
        Ok(())
    }

    async fn reset_environment(&self, app_id: &AppId) -> Result<(), Error> {
        if self.env.exists(app_id) {
            self.env.destroy(app_id).await?;
        }
        Ok(())
    }

    async fn fix_permissions(&self, app_id: &AppId) -> Result<(), Error> {
        let app_dir = self.path_map.map(PathKind::Apps, Some(app_id));
        let opts = ExecOptions { timeout: Some(std::time::Duration::from_secs(30)), ..Default::default() };
        let outcome = exec::run("chmod", &["-R".to_string(), "u+rwX".to_string(), app_dir.display().to_string()], opts)
            .await
            .map_err(Error::from)?;
        if outcome.exit_code == Some(0) {
            Ok(())
        } else {
            Err(Error::new(pinokio_core::ErrorKind::ExternalFailure, format!("chmod on {} exited {:?}", app_dir.display(), outcome.exit_code)))
        }
    }

    async fn increase_memory(&self, app_id: &AppId) -> Result<(), Error> {
        // These platforms don't expose a knob for a running process's memory
        // ceiling from inside the guest; the only real lever (closing other
        // apps, trimming caches) is already what `ClearCache` and the
        // perf monitor's advisory recommendations cover.
        tracing::warn!(%app_id, "increase_memory has no effect on this platform; relying on cache eviction instead");
        Ok(())
    }
}
