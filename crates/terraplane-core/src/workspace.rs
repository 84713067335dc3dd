//! Tenant-scoped workspace management.
//!
//! Each tenant owns one directory under a common base and one read/write
//! lock serializing file access within that tenant. Different tenants never
//! share a lock or a directory, so their runs proceed fully concurrently.
//!
//! The in-process tenant lock only protects a single host. A multi-host
//! deployment must pin each tenant's workspace to one host or mount a
//! shared filesystem with matching semantics.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock};

use crate::error::CoreError;
use crate::tenant::validate_tenant_id;

/// Per-tenant state: the directory and the lock guarding its files.
struct TenantWorkspace {
    dir: PathBuf,
    lock: RwLock<()>,
    dir_created: OnceCell<()>,
}

/// Bounded most-recently-used registry of tenant workspaces.
///
/// Entries whose lock is currently referenced elsewhere are never evicted;
/// everything else ages out once the capacity is exceeded, so a churning
/// tenant population cannot grow the map without limit.
struct TenantRegistry {
    entries: HashMap<String, Arc<TenantWorkspace>>,
    recency: VecDeque<String>,
    capacity: usize,
}

impl TenantRegistry {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn get_or_insert(&mut self, tenant_id: &str, base_dir: &PathBuf) -> Arc<TenantWorkspace> {
        if let Some(existing) = self.entries.get(tenant_id) {
            let existing = existing.clone();
            self.touch(tenant_id);
            return existing;
        }

        let workspace = Arc::new(TenantWorkspace {
            dir: base_dir.join(tenant_id),
            lock: RwLock::new(()),
            dir_created: OnceCell::new(),
        });
        self.entries.insert(tenant_id.to_string(), workspace.clone());
        self.recency.push_back(tenant_id.to_string());
        self.evict_excess();
        workspace
    }

    fn touch(&mut self, tenant_id: &str) {
        if let Some(pos) = self.recency.iter().position(|id| id == tenant_id) {
            let id = self.recency.remove(pos).unwrap_or_else(|| tenant_id.to_string());
            self.recency.push_back(id);
        }
    }

    fn evict_excess(&mut self) {
        while self.entries.len() > self.capacity {
            // Oldest idle entry goes first; entries still referenced by an
            // in-flight operation are skipped.
            let entries = &self.entries;
            let pos = self.recency.iter().position(|id| {
                entries
                    .get(id)
                    .map(|ws| Arc::strong_count(ws) == 1)
                    .unwrap_or(true)
            });

            match pos.and_then(|pos| self.recency.remove(pos)) {
                Some(id) => {
                    self.entries.remove(&id);
                    tracing::debug!(tenant_id = %id, "Evicted idle tenant workspace entry");
                }
                None => break,
            }
        }
    }
}

/// Manages per-tenant working directories under a common base directory.
pub struct WorkspaceManager {
    base_dir: PathBuf,
    base_init: OnceCell<()>,
    tenants: Mutex<TenantRegistry>,
}

impl WorkspaceManager {
    /// Create a manager rooted at `base_dir`, caching at most
    /// `max_cached_tenants` per-tenant lock entries.
    pub fn new(base_dir: impl Into<PathBuf>, max_cached_tenants: usize) -> Self {
        Self {
            base_dir: base_dir.into(),
            base_init: OnceCell::new(),
            tenants: Mutex::new(TenantRegistry::new(max_cached_tenants)),
        }
    }

    /// Resolve the tenant's working directory, creating it on first use.
    /// Idempotent; the directory persists across runs.
    pub async fn tenant_dir(&self, tenant_id: &str) -> Result<PathBuf, CoreError> {
        let workspace = self.workspace(tenant_id).await?;
        Ok(workspace.dir.clone())
    }

    /// Write `content` to `name` inside the tenant's directory, holding the
    /// tenant's write lock for the duration.
    pub async fn write_file(
        &self,
        tenant_id: &str,
        name: &str,
        content: &str,
    ) -> Result<(), CoreError> {
        let workspace = self.workspace(tenant_id).await?;
        let _guard = workspace.lock.write().await;

        let path = workspace.dir.join(name);
        tokio::fs::write(&path, content).await.map_err(|e| {
            tracing::error!(
                tenant_id = %tenant_id,
                file = %name,
                error = %e,
                "Failed to write workspace file"
            );
            CoreError::Io(e.to_string())
        })?;

        tracing::debug!(path = %path.display(), "Wrote workspace file");
        Ok(())
    }

    /// Read `name` from the tenant's directory under the tenant's read lock.
    pub async fn read_file(&self, tenant_id: &str, name: &str) -> Result<String, CoreError> {
        let workspace = self.workspace(tenant_id).await?;
        let _guard = workspace.lock.read().await;

        let path = workspace.dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CoreError::NotFound(
                format!("{} for tenant {}", name, tenant_id),
            )),
            Err(e) => {
                tracing::error!(
                    tenant_id = %tenant_id,
                    file = %name,
                    error = %e,
                    "Failed to read workspace file"
                );
                Err(CoreError::Io(e.to_string()))
            }
        }
    }

    /// Fetch the tenant entry with base and tenant directories ensured.
    async fn workspace(&self, tenant_id: &str) -> Result<Arc<TenantWorkspace>, CoreError> {
        validate_tenant_id(tenant_id)?;
        self.ensure_base().await?;

        let workspace = {
            let mut registry = self.tenants.lock().await;
            registry.get_or_insert(tenant_id, &self.base_dir)
        };

        workspace
            .dir_created
            .get_or_try_init(|| async {
                tokio::fs::create_dir_all(&workspace.dir).await?;
                tracing::info!(dir = %workspace.dir.display(), "Created tenant directory");
                Ok::<(), CoreError>(())
            })
            .await?;

        Ok(workspace)
    }

    /// Create the base directory once; the result is cached so repeated
    /// calls do not re-touch the filesystem.
    async fn ensure_base(&self) -> Result<(), CoreError> {
        self.base_init
            .get_or_try_init(|| async {
                tokio::fs::create_dir_all(&self.base_dir).await?;
                tracing::info!(dir = %self.base_dir.display(), "Initialized workspace base directory");
                Ok::<(), CoreError>(())
            })
            .await?;
        Ok(())
    }
}
