pub mod error;
pub mod call;

pub use error::{BridgeError, Result};
pub use call::{CallError, CallResult, ChannelKind, MethodCall};
