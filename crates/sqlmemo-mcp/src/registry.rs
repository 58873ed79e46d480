//! Method-name to handler routing table.

use std::collections::HashMap;

use sqlmemo_protocol::methods;

use crate::dispatch::{lifecycle, prompts, resources, tools};
use crate::handler::MethodHandler;

/// Maps method names to the handler that answers them.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<String, Box<dyn MethodHandler>>,
}

impl MethodRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The hub's routing table.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(methods::PING, lifecycle::ping);
        registry.register(methods::INITIALIZE, lifecycle::initialize);
        registry.register(methods::TOOLS_LIST, tools::list);
        registry.register(methods::TOOLS_CALL, tools::call);
        registry.register(methods::PROMPTS_LIST, prompts::list);
        registry.register(methods::PROMPTS_GET, prompts::get);
        registry.register(methods::RESOURCES_LIST, resources::list);
        registry.register(methods::RESOURCES_READ, resources::read);
        registry.register(methods::RESOURCES_WRITE, resources::write);
        registry
    }

    /// Registers a handler, replacing any previous one for the same method.
    pub fn register(&mut self, method: impl Into<String>, handler: impl MethodHandler + 'static) {
        self.handlers.insert(method.into(), Box::new(handler));
    }

    /// Looks up the handler for a method.
    pub fn get(&self, method: &str) -> Option<&dyn MethodHandler> {
        self.handlers.get(method).map(|h| h.as_ref())
    }

    /// Returns true if the method is routed.
    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Number of routed methods.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nothing is routed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("MethodRegistry").field("methods", &names).finish()
    }
}
