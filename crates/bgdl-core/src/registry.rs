//! Durable task registry
//!
//! Owns the bidirectional mapping between caller-assigned client ids and
//! engine-assigned handles, and persists it as a single versioned JSON
//! record. The file is rewritten atomically (write-temp-then-rename) after
//! every mutation, so a crash mid-save never corrupts prior state.

use crate::error::BridgeError;
use bgdl_types::{EngineHandle, TaskConfig};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

const REGISTRY_VERSION: u32 = 1;

/// On-disk record schema, decoupled from the in-memory maps.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    tasks: Vec<TaskConfig>,
}

/// Bidirectional client-id <-> engine-handle mapping with durable storage.
#[derive(Debug)]
pub struct TaskRegistry {
    path: PathBuf,
    by_id: HashMap<String, EngineHandle>,
    by_handle: HashMap<EngineHandle, TaskConfig>,
}

impl TaskRegistry {
    /// Load the registry from `path`, best-effort.
    ///
    /// An absent or unreadable file yields an empty registry; engine-side
    /// downloads are still discoverable through reconciliation.
    pub fn load(path: PathBuf) -> Self {
        let mut registry = Self {
            path,
            by_id: HashMap::new(),
            by_handle: HashMap::new(),
        };

        let content = match fs::read_to_string(&registry.path) {
            Ok(content) => content,
            Err(e) => {
                info!("No task registry at {:?}, starting empty: {}", registry.path, e);
                return registry;
            }
        };

        let file: RegistryFile = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                warn!("Corrupt task registry at {:?}, starting empty: {}", registry.path, e);
                return registry;
            }
        };

        if file.version != REGISTRY_VERSION {
            warn!(
                "Unsupported task registry version {} at {:?}, starting empty",
                file.version, registry.path
            );
            return registry;
        }

        for task in file.tasks {
            registry.by_id.insert(task.client_id.clone(), task.engine_handle);
            registry.by_handle.insert(task.engine_handle, task);
        }

        registry
    }

    /// Default registry file location under the platform data directory.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "bgdl")
            .map(|dirs| dirs.data_dir().join("tasks.json"))
            .unwrap_or_else(|| PathBuf::from("bgdl-tasks.json"))
    }

    /// Register a new task.
    ///
    /// Fails with `DuplicateTask` when the id is already bound to a
    /// different live handle; overwriting would orphan the previous
    /// engine-side transfer. Re-registering the same pairing is idempotent.
    pub fn register(
        &mut self,
        client_id: &str,
        handle: EngineHandle,
    ) -> Result<TaskConfig, BridgeError> {
        if let Some(existing) = self.by_id.get(client_id) {
            if *existing != handle && self.by_handle.contains_key(existing) {
                return Err(BridgeError::DuplicateTask(client_id.to_string()));
            }
        }

        let config = TaskConfig::new(client_id.to_string(), handle);
        self.by_id.insert(client_id.to_string(), handle);
        self.by_handle.insert(handle, config.clone());
        self.persist();

        Ok(config)
    }

    /// Remove both directions of a task's mapping; no-op if absent.
    pub fn remove(&mut self, handle: EngineHandle) {
        if let Some(config) = self.by_handle.remove(&handle) {
            // Only drop the id entry if it still points at this handle;
            // reconciliation may have re-linked the id in the meantime.
            if self.by_id.get(&config.client_id) == Some(&handle) {
                self.by_id.remove(&config.client_id);
            }
            self.persist();
        }
    }

    pub fn lookup_by_client_id(&self, client_id: &str) -> Option<&TaskConfig> {
        self.by_id
            .get(client_id)
            .and_then(|handle| self.by_handle.get(handle))
    }

    pub fn lookup_by_handle(&self, handle: EngineHandle) -> Option<&TaskConfig> {
        self.by_handle.get(&handle)
    }

    /// Engine handle currently bound to a client id.
    pub fn handle_for(&self, client_id: &str) -> Option<EngineHandle> {
        self.by_id.get(client_id).copied()
    }

    /// All live engine handles, for reconciliation.
    pub fn all_handles(&self) -> HashSet<EngineHandle> {
        self.by_handle.keys().copied().collect()
    }

    /// Re-point a client id at a (possibly changed) handle and clear its
    /// begin flag so the next progress report re-announces the task.
    pub fn relink(&mut self, client_id: &str, handle: EngineHandle) {
        self.by_id.insert(client_id.to_string(), handle);
        if let Some(config) = self.by_handle.get_mut(&handle) {
            config.begin_reported = false;
        }
        self.persist();
    }

    /// Mark the begin event as reported for a task.
    pub fn mark_begin_reported(&mut self, handle: EngineHandle) {
        if let Some(config) = self.by_handle.get_mut(&handle) {
            config.begin_reported = true;
        }
    }

    /// Clear the begin flag for a task, re-arming the begin event.
    pub fn clear_begin_reported(&mut self, client_id: &str) {
        if let Some(handle) = self.by_id.get(client_id).copied() {
            if let Some(config) = self.by_handle.get_mut(&handle) {
                config.begin_reported = false;
            }
        }
    }

    /// Serialize the full mapping to durable storage atomically.
    pub fn save(&self) -> Result<(), BridgeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = RegistryFile {
            version: REGISTRY_VERSION,
            tasks: self.by_handle.values().cloned().collect(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| BridgeError::Serialization(e.to_string()))?;

        // Write next to the target so the rename stays on one filesystem.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    /// Save, swallowing failures; the next mutation retries.
    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to persist task registry to {:?}: {}", self.path, e);
        }
    }
}
