// ============================================================================
// StoreBridge Library
// ============================================================================

pub mod core;
pub mod backend;
pub mod lifecycle;
pub mod channel;
pub mod facade;

// Re-export main types for convenience
pub use facade::{Bridge, BridgeBuilder, BridgeConfig};
pub use backend::Backend;
pub use core::{BridgeError, Result, ChannelKind, MethodCall, CallResult, CallError};

// Re-export channel API
pub use channel::{
    ChannelBinding,
    ChannelDispatcher,
    ChannelRegistry,
    registry::OperationTable,
};
pub use lifecycle::{ResourceHandle, ensure_directory};
