use std::path::Path;

use crate::core::Result;

/// The external collaborator behind the bridge: an embedded, file-backed
/// store that can be opened against a directory and closed again.
///
/// Operation semantics live in the handlers registered at build time
/// (see [`crate::BridgeBuilder`]); the bridge itself only manages the
/// open/closed lifecycle of the resource.
pub trait Backend: Send + 'static {
    /// Open the backend against `path`. The bridge guarantees `path` is an
    /// existing usable directory before calling this.
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Release the underlying resource. Called exactly once per open, on
    /// host suspension.
    fn close(&mut self);
}
