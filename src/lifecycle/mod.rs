use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::backend::Backend;
use crate::core::{BridgeError, Result};

/// Make sure `path` is a usable directory for the backend.
///
/// Creates it (with parents) when missing. When something else sits at
/// `path` — a plain file, a symlink — it is deleted and recreated as a
/// directory. Failure here is fatal for startup: there is no degraded mode
/// without a usable storage location.
pub fn ensure_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if path.exists() && !path.is_dir() {
        warn!("storage path {} is not a directory, recreating", path.display());
        fs::remove_file(path).map_err(|e| BridgeError::StorageInit {
            path: path.to_path_buf(),
            reason: format!("failed to remove non-directory: {}", e),
        })?;
    }

    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| BridgeError::StorageInit {
            path: path.to_path_buf(),
            reason: format!("failed to create directory: {}", e),
        })?;
    }

    Ok(())
}

enum ResourceState<B> {
    Closed,
    Open { path: PathBuf, backend: B },
}

/// The single open/closed reference to the backend's persistent storage.
///
/// Exactly one exists per bridge, owned by the lifecycle layer and guarded
/// by one mutex, so no dispatch can observe it mid-transition.
pub struct ResourceHandle<B: Backend> {
    state: ResourceState<B>,
}

impl<B: Backend> ResourceHandle<B> {
    pub fn new() -> Self {
        Self {
            state: ResourceState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ResourceState::Open { .. })
    }

    /// Storage location of the currently open backend, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            ResourceState::Open { path, .. } => Some(path),
            ResourceState::Closed => None,
        }
    }

    /// Transition Closed → Open against `path`.
    ///
    /// Idempotent for the same path: a second `open` with the path already
    /// open is a no-op. Opening a *different* path while open is rejected
    /// with [`BridgeError::AlreadyOpen`] — never a silent re-open.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        if let ResourceState::Open { path: current, .. } = &self.state {
            if current == path {
                return Ok(());
            }
            return Err(BridgeError::AlreadyOpen {
                open: current.clone(),
                requested: path.to_path_buf(),
            });
        }

        let backend = B::open(path)?;
        self.state = ResourceState::Open {
            path: path.to_path_buf(),
            backend,
        };
        info!("backend opened at {}", path.display());
        Ok(())
    }

    /// Transition Open → Closed, releasing the backend. Safe to call when
    /// already Closed.
    pub fn close(&mut self) {
        if let ResourceState::Open { path, mut backend } =
            std::mem::replace(&mut self.state, ResourceState::Closed)
        {
            backend.close();
            info!("backend closed at {}", path.display());
        }
    }

    /// Borrow the open backend for a read, failing fast when Closed.
    pub(crate) fn backend(&self) -> Result<&B> {
        match &self.state {
            ResourceState::Open { backend, .. } => Ok(backend),
            ResourceState::Closed => Err(BridgeError::NotOpen),
        }
    }

    /// Borrow the open backend for a write, failing fast when Closed.
    pub(crate) fn backend_mut(&mut self) -> Result<&mut B> {
        match &mut self.state {
            ResourceState::Open { backend, .. } => Ok(backend),
            ResourceState::Closed => Err(BridgeError::NotOpen),
        }
    }
}

impl<B: Backend> Default for ResourceHandle<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Drop for ResourceHandle<B> {
    fn drop(&mut self) {
        self.close();
    }
}
