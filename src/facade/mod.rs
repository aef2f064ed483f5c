mod config;

pub use config::BridgeConfig;

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::error;

use crate::backend::Backend;
use crate::channel::{ChannelRegistry, OperationTable};
use crate::core::{BridgeError, CallResult, ChannelKind, MethodCall, Result};
use crate::lifecycle::{ResourceHandle, ensure_directory};

/// The bridge between a host's interface layer and an embedded file-backed
/// backend.
///
/// Exposes two channels — one for read-style calls, one for write-style
/// calls — and binds the backend's lifetime to the host's
/// foreground/background transitions via [`on_start`](Bridge::on_start)
/// and [`on_stop`](Bridge::on_stop).
///
/// # Examples
///
/// ```
/// use storebridge::{Backend, Bridge, MethodCall, Result};
/// use std::path::Path;
///
/// struct Echo;
///
/// impl Backend for Echo {
///     fn open(_path: &Path) -> Result<Self> {
///         Ok(Echo)
///     }
///     fn close(&mut self) {}
/// }
///
/// # fn main() -> Result<()> {
/// let bridge: Bridge<Echo> = Bridge::builder()
///     .query("echo", |_b, req| Ok(Some(req.to_vec())))
///     .build();
///
/// let dir = std::env::temp_dir().join("storebridge-doc");
/// bridge.on_start(&dir)?;
///
/// let result = bridge.dispatch(&MethodCall::query("echo", Some(vec![1, 2, 3])));
/// assert_eq!(result.as_bytes(), Some(&[1, 2, 3][..]));
///
/// bridge.on_stop();
/// # Ok(())
/// # }
/// ```
pub struct Bridge<B: Backend> {
    handle: Arc<Mutex<ResourceHandle<B>>>,
    registry: ChannelRegistry<B>,
    config: BridgeConfig,
}

impl<B: Backend> Bridge<B> {
    pub fn builder() -> BridgeBuilder<B> {
        BridgeBuilder::new()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The two channel bindings the host attaches callers to.
    pub fn channels(&self) -> &ChannelRegistry<B> {
        &self.registry
    }

    /// Host startup entry point: make the storage location usable and open
    /// the backend against it.
    ///
    /// Idempotent for the same path. A [`BridgeError::StorageInit`] from
    /// here is fatal — the host must not proceed to serve calls.
    pub fn on_start(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut handle = self.handle.lock()?;
        if handle.is_open() {
            // Same path is a no-op, a different path is AlreadyOpen;
            // either way a rejected open must leave no directory behind.
            return handle.open(path);
        }
        ensure_directory(path).inspect_err(|e| error!("storage init failed: {}", e))?;
        handle.open(path)
    }

    /// Like [`on_start`](Bridge::on_start), using the path configured via
    /// [`BridgeConfig::storage_path`].
    pub fn on_start_configured(&self) -> Result<()> {
        let path = self.config.storage_path.clone().ok_or_else(|| {
            BridgeError::StorageInit {
                path: Default::default(),
                reason: "no storage path configured".to_string(),
            }
        })?;
        self.on_start(path)
    }

    /// Host suspension entry point: close the backend. Safe to call when
    /// already closed; further dispatch fails with a `not_open` error
    /// until the next `on_start`.
    pub fn on_stop(&self) {
        match self.handle.lock() {
            Ok(mut handle) => handle.close(),
            Err(poisoned) => poisoned.into_inner().close(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle
            .lock()
            .map(|handle| handle.is_open())
            .unwrap_or(false)
    }

    /// Route a call to the dispatcher for its channel.
    pub fn dispatch(&self, call: &MethodCall) -> CallResult {
        match call.channel {
            ChannelKind::Query => self.registry.query().dispatcher().dispatch(call),
            ChannelKind::Command => self.registry.command().dispatcher().dispatch(call),
        }
    }
}

/// Registration phase of the bridge: collects the operation tables and the
/// configuration, then binds the two channels once.
///
/// Operations cannot be added or removed after [`build`](Self::build).
pub struct BridgeBuilder<B: Backend> {
    config: BridgeConfig,
    operations: OperationTable<B>,
}

impl<B: Backend> BridgeBuilder<B> {
    pub fn new() -> Self {
        Self {
            config: BridgeConfig::new(),
            operations: OperationTable::new(),
        }
    }

    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a read-style operation on the query channel.
    pub fn query<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&B, &[u8]) -> Result<Option<Vec<u8>>> + Send + Sync + 'static,
    {
        self.operations.register_query(method, handler);
        self
    }

    /// Register a write-style operation on the command channel.
    pub fn command<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut B, &[u8]) -> Result<Option<Vec<u8>>> + Send + Sync + 'static,
    {
        self.operations.register_command(method, handler);
        self
    }

    pub fn build(self) -> Bridge<B> {
        let handle = Arc::new(Mutex::new(ResourceHandle::new()));
        let registry = ChannelRegistry::new(
            &self.config.channel_prefix,
            handle.clone(),
            Arc::new(self.operations),
        );
        Bridge {
            handle,
            registry,
            config: self.config,
        }
    }
}

impl<B: Backend> Default for BridgeBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}
