use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::backend::Backend;
use crate::core::{BridgeError, CallResult, ChannelKind, MethodCall, Result};
use crate::lifecycle::ResourceHandle;

use super::registry::OperationTable;

/// Resolves a method name to a registered operation and invokes it against
/// the open backend.
///
/// One dispatcher per channel; both share the resource handle and the
/// operation table. Every call resolves to exactly one [`CallResult`] —
/// no failure escapes raw, no call is left pending.
pub struct ChannelDispatcher<B: Backend> {
    kind: ChannelKind,
    handle: Arc<Mutex<ResourceHandle<B>>>,
    operations: Arc<OperationTable<B>>,
}

impl<B: Backend> ChannelDispatcher<B> {
    pub(crate) fn new(
        kind: ChannelKind,
        handle: Arc<Mutex<ResourceHandle<B>>>,
        operations: Arc<OperationTable<B>>,
    ) -> Self {
        Self {
            kind,
            handle,
            operations,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Dispatch a call on this channel.
    ///
    /// The call's payload is read through [`MethodCall::request_bytes`], so
    /// an absent request reaches the handler as an empty slice. The call's
    /// channel field is informational here; the binding this dispatcher was
    /// registered under decides which operation set applies.
    pub fn dispatch(&self, call: &MethodCall) -> CallResult {
        debug!("dispatch {}:{}", self.kind.as_str(), call.method);
        match self.invoke(&call.method, call.request_bytes()) {
            Ok(bytes) => CallResult::success(bytes),
            Err(err) => {
                warn!("dispatch {}:{} failed: {}", self.kind.as_str(), call.method, err);
                CallResult::from(err)
            }
        }
    }

    /// Convenience shape for hosts that carry (method, payload) directly.
    pub fn call(&self, method: &str, request: Option<Vec<u8>>) -> CallResult {
        self.dispatch(&MethodCall {
            channel: self.kind,
            method: method.to_string(),
            request,
        })
    }

    fn invoke(&self, method: &str, payload: &[u8]) -> Result<Option<Vec<u8>>> {
        // One lock spans the state check and the backend call, so open and
        // close stay mutually exclusive with every in-flight dispatch.
        let mut guard = self.handle.lock()?;

        match self.kind {
            ChannelKind::Query => {
                let backend = guard.backend()?;
                let op = self
                    .operations
                    .query(method)
                    .ok_or_else(|| BridgeError::MethodNotFound(method.to_string()))?;
                catch_panics(AssertUnwindSafe(|| op(backend, payload)))
            }
            ChannelKind::Command => {
                let backend = guard.backend_mut()?;
                let op = self
                    .operations
                    .command(method)
                    .ok_or_else(|| BridgeError::MethodNotFound(method.to_string()))?;
                catch_panics(AssertUnwindSafe(|| op(backend, payload)))
            }
        }
    }
}

/// Run a handler, converting a panic into a backend error so mapping stays
/// total even over failures the handler author never anticipated.
fn catch_panics<F>(f: F) -> Result<Option<Vec<u8>>>
where
    F: FnOnce() -> Result<Option<Vec<u8>>> + std::panic::UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(outcome) => outcome,
        // as_ref reaches the payload itself; &cause would coerce the Box
        // into the trait object and defeat the downcasts below.
        Err(cause) => Err(BridgeError::Backend(panic_message(cause.as_ref()))),
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = cause.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = cause.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    }
}
