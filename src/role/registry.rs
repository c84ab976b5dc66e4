// ABOUTME: The role registry - an ordered, append-only collection of role
// ABOUTME: definitions shared across authorization passes.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::role::def::RoleDef;

/// Ordered collection of registered role definitions.
///
/// Registration order is authorization order: the authorizer tries roles
/// front to back and the first grant wins. The registry never removes or
/// reorders entries; duplicates and non-registrable definitions are
/// skipped.
///
/// Cloning is cheap and shares the underlying list.
pub struct RoleRegistry {
    defs: Arc<RwLock<Vec<RoleDef>>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self {
            defs: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Appends a definition unless its name is already taken or it is
    /// marked non-registrable.
    pub async fn register(&self, def: RoleDef) {
        if !def.registrable() {
            debug!(role = def.name(), "skipping non-registrable role");
            return;
        }

        let mut defs = self.defs.write().await;
        if defs.iter().any(|existing| existing.name() == def.name()) {
            debug!(role = def.name(), "role already registered");
            return;
        }
        debug!(role = def.name(), "registered role");
        defs.push(def);
    }

    /// Registers several definitions in iteration order.
    pub async fn register_all(&self, defs: impl IntoIterator<Item = RoleDef>) {
        for def in defs {
            self.register(def).await;
        }
    }

    /// Snapshot of the definitions in registration order.
    pub async fn all(&self) -> Vec<RoleDef> {
        self.defs.read().await.clone()
    }

    pub async fn get(&self, name: &str) -> Option<RoleDef> {
        self.defs
            .read()
            .await
            .iter()
            .find(|def| def.name() == name)
            .cloned()
    }

    pub async fn names(&self) -> Vec<String> {
        self.defs
            .read()
            .await
            .iter()
            .map(|def| def.name().to_string())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.defs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.defs.read().await.is_empty()
    }
}

impl Clone for RoleRegistry {
    fn clone(&self) -> Self {
        Self {
            defs: Arc::clone(&self.defs),
        }
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
