use std::path::PathBuf;

/// Bridge configuration.
///
/// `channel_prefix` namespaces the two public channel identifiers, in the
/// style of a reverse package path, e.g. a prefix of `com.example.notes`
/// yields `com.example.notes/query` and `com.example.notes/command`.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Prefix for the two public channel identifiers.
    pub channel_prefix: String,

    /// Default storage location, used by `on_start` when the host does not
    /// pass a path explicitly. Set once, before any dispatch.
    pub storage_path: Option<PathBuf>,
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self {
            channel_prefix: "storebridge".to_string(),
            storage_path: None,
        }
    }

    /// Set the channel identifier prefix.
    pub fn channel_prefix(mut self, prefix: &str) -> Self {
        self.channel_prefix = prefix.to_string();
        self
    }

    /// Set the default storage location.
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
