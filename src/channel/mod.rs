pub mod dispatcher;
pub mod registry;

pub use dispatcher::ChannelDispatcher;
pub use registry::{ChannelBinding, ChannelRegistry, OperationTable};
