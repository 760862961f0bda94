//! Model asset cache
//!
//! Fixture and door geometry comes from scene files keyed by URL. Handles
//! are cached per URL; when an entity's URL changes the old entry must be
//! invalidated explicitly so stale geometry is never displayed after a
//! model swap. A failed load skips only that entity's render; the rest of
//! the scene is unaffected.

use std::collections::HashMap;

use bevy::asset::LoadState;
use bevy::prelude::*;

/// URL-keyed cache of scene handles.
#[derive(Resource, Debug, Default)]
pub struct ModelCache {
    by_url: HashMap<String, Handle<Scene>>,
}

impl ModelCache {
    /// Fetch the cached handle for a URL, loading it on first use.
    pub fn get_or_load(&mut self, asset_server: &AssetServer, url: &str) -> Handle<Scene> {
        if let Some(handle) = self.by_url.get(url) {
            return handle.clone();
        }
        debug!("loading model: {url}");
        let handle: Handle<Scene> = asset_server.load(url.to_string());
        self.by_url.insert(url.to_string(), handle.clone());
        handle
    }

    /// Drop the cached handle for a URL. Required whenever the URL for an
    /// existing entity changes.
    pub fn invalidate(&mut self, url: &str) {
        if self.by_url.remove(url).is_some() {
            info!("invalidated cached model: {url}");
        }
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.by_url.contains_key(url)
    }

    /// Whether a handle's load has failed. Callers use this to skip the
    /// entity's render without touching the rest of the scene.
    pub fn load_failed(asset_server: &AssetServer, handle: &Handle<Scene>) -> bool {
        matches!(
            asset_server.get_load_state(handle.id()),
            Some(LoadState::Failed(_))
        )
    }
}
