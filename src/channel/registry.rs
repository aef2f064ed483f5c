use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::backend::Backend;
use crate::core::{ChannelKind, Result};
use crate::lifecycle::ResourceHandle;

use super::dispatcher::ChannelDispatcher;

/// Read handler: borrows the open backend, returns optional response bytes.
pub type QueryHandler<B> = Box<dyn Fn(&B, &[u8]) -> Result<Option<Vec<u8>>> + Send + Sync>;

/// Write handler: may mutate the open backend.
pub type CommandHandler<B> = Box<dyn Fn(&mut B, &[u8]) -> Result<Option<Vec<u8>>> + Send + Sync>;

/// Lookup table from method name to handler, built once at registration.
///
/// Replaces string-keyed dynamic dispatch into the backend: an unknown
/// name has a defined `MethodNotFound` outcome instead of reaching the
/// backend at all.
pub struct OperationTable<B> {
    queries: HashMap<String, QueryHandler<B>>,
    commands: HashMap<String, CommandHandler<B>>,
}

impl<B: Backend> OperationTable<B> {
    pub fn new() -> Self {
        Self {
            queries: HashMap::new(),
            commands: HashMap::new(),
        }
    }

    pub fn register_query<F>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Fn(&B, &[u8]) -> Result<Option<Vec<u8>>> + Send + Sync + 'static,
    {
        self.queries.insert(method.into(), Box::new(handler));
    }

    pub fn register_command<F>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Fn(&mut B, &[u8]) -> Result<Option<Vec<u8>>> + Send + Sync + 'static,
    {
        self.commands.insert(method.into(), Box::new(handler));
    }

    pub(crate) fn query(&self, method: &str) -> Option<&QueryHandler<B>> {
        self.queries.get(method)
    }

    pub(crate) fn command(&self, method: &str) -> Option<&CommandHandler<B>> {
        self.commands.get(method)
    }

    /// Registered method names for one channel, unordered.
    pub fn methods(&self, kind: ChannelKind) -> Vec<&str> {
        match kind {
            ChannelKind::Query => self.queries.keys().map(String::as_str).collect(),
            ChannelKind::Command => self.commands.keys().map(String::as_str).collect(),
        }
    }
}

impl<B: Backend> Default for OperationTable<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// One public channel identifier bound to its dispatcher.
///
/// Two bindings exist for the bridge lifetime, created at registration and
/// never rebound.
pub struct ChannelBinding<B: Backend> {
    name: String,
    dispatcher: ChannelDispatcher<B>,
}

impl<B: Backend> ChannelBinding<B> {
    pub(crate) fn new(name: String, dispatcher: ChannelDispatcher<B>) -> Self {
        Self { name, dispatcher }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dispatcher(&self) -> &ChannelDispatcher<B> {
        &self.dispatcher
    }
}

/// Binds the two channel identifiers the host attaches callers to.
pub struct ChannelRegistry<B: Backend> {
    query: ChannelBinding<B>,
    command: ChannelBinding<B>,
}

impl<B: Backend> ChannelRegistry<B> {
    pub(crate) fn new(
        prefix: &str,
        handle: Arc<Mutex<ResourceHandle<B>>>,
        operations: Arc<OperationTable<B>>,
    ) -> Self {
        let query = ChannelBinding::new(
            format!("{}/{}", prefix, ChannelKind::Query.as_str()),
            ChannelDispatcher::new(ChannelKind::Query, handle.clone(), operations.clone()),
        );
        let command = ChannelBinding::new(
            format!("{}/{}", prefix, ChannelKind::Command.as_str()),
            ChannelDispatcher::new(ChannelKind::Command, handle, operations),
        );
        Self { query, command }
    }

    pub fn query(&self) -> &ChannelBinding<B> {
        &self.query
    }

    pub fn command(&self) -> &ChannelBinding<B> {
        &self.command
    }

    /// Resolve a public channel identifier to its binding.
    pub fn channel(&self, name: &str) -> Option<&ChannelBinding<B>> {
        if self.query.name() == name {
            Some(&self.query)
        } else if self.command.name() == name {
            Some(&self.command)
        } else {
            None
        }
    }

    pub fn names(&self) -> [&str; 2] {
        [self.query.name(), self.command.name()]
    }
}
