//! The set of logs a session can switch between.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::client::{LogClient, LogConfig, build_client};
use crate::error::LogError;

/// Log clients keyed by origin, in registration order.
///
/// Built once at startup and read-only afterwards. The first registered
/// log is the default selection.
#[derive(Default)]
pub struct LogRegistry {
    order: Vec<String>,
    clients: HashMap<String, Arc<dyn LogClient>>,
}

impl LogRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client per config and register them in order.
    pub fn from_configs(configs: &[LogConfig]) -> Result<Self, LogError> {
        let mut registry = Self::new();
        for config in configs {
            registry.register(build_client(config)?)?;
        }
        Ok(registry)
    }

    /// Add a client. Origins must be unique.
    pub fn register(&mut self, client: Arc<dyn LogClient>) -> Result<(), LogError> {
        let origin = client.origin().to_string();
        if self.clients.contains_key(&origin) {
            return Err(LogError::Config(format!("duplicate log origin {origin:?}")));
        }
        debug!(%origin, format = %client.format(), "registered log");
        self.order.push(origin.clone());
        self.clients.insert(origin, client);
        Ok(())
    }

    /// Look up a client by origin.
    pub fn get(&self, origin: &str) -> Option<Arc<dyn LogClient>> {
        self.clients.get(origin).cloned()
    }

    /// Registered origins in registration order.
    pub fn origins(&self) -> &[String] {
        &self.order
    }

    /// The first registered origin.
    pub fn default_origin(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
