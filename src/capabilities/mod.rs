//! Capability registry: the declarative tree of remotely invokable actions.
//!
//! The registry is built exactly once per session from an ordered list of
//! [`Capability`] definitions, then read-mostly: schema generation walks the
//! tree, and inbound function calls mutate leaf values through
//! [`CapabilityRegistry::dispatch`].

pub mod dispatch;
pub mod schema;
pub mod tree;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

pub use tree::{Attribute, AttributeHandler, AttributeUpdate, Capability};

use realtime_protocol::ToolDefinition;

/// Ordered collection of capabilities with one-shot construction.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    capabilities: Vec<Capability>,
    built: AtomicBool,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the capability tree.
    ///
    /// Idempotent: the first call wins, later calls are no-ops. The guard is
    /// a one-shot flag for a single owning thread, not a concurrency
    /// primitive — a process hosting several sessions gives each its own
    /// registry.
    pub fn build(&mut self, capabilities: Vec<Capability>) {
        if self.built.swap(true, Ordering::Relaxed) {
            debug!("capability registry already built, ignoring rebuild");
            return;
        }
        self.capabilities = capabilities;
    }

    pub fn is_built(&self) -> bool {
        self.built.load(Ordering::Relaxed)
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Function tools for every capability, in registration order.
    pub fn schema(&self) -> Vec<ToolDefinition> {
        self.capabilities.iter().map(schema::tool_for).collect()
    }

    /// Route a remote function call to the matching capability.
    ///
    /// Unregistered names, unparseable arguments, and per-field validation
    /// failures are logged and tolerated; this never fails.
    pub fn dispatch(&self, name: &str, arguments: &str) {
        dispatch::dispatch_call(&self.capabilities, name, arguments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door() -> Vec<Capability> {
        vec![Capability::new("OpenDoor", "Toggle the door state")
            .attribute(Attribute::bool("open", "Open or close the door").required())]
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut registry = CapabilityRegistry::new();
        registry.build(door());
        assert!(registry.is_built());
        assert_eq!(registry.capabilities().len(), 1);

        // second build is a no-op
        registry.build(vec![
            Capability::new("SetVolume", "volume"),
            Capability::new("SetLightState", "light"),
        ]);
        assert_eq!(registry.capabilities().len(), 1);
        assert_eq!(registry.capabilities()[0].name(), "OpenDoor");
    }

    #[test]
    fn test_schema_in_registration_order() {
        let mut registry = CapabilityRegistry::new();
        registry.build(vec![
            Capability::new("SetLightState", "light"),
            Capability::new("SetVolume", "volume"),
            Capability::new("OpenDoor", "door"),
        ]);
        let schema = registry.schema();
        let names: Vec<&str> = schema.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["SetLightState", "SetVolume", "OpenDoor"]);
    }

    #[test]
    fn test_empty_registry_schema_and_dispatch() {
        let registry = CapabilityRegistry::new();
        assert!(registry.schema().is_empty());
        // dispatch on an empty registry must be harmless
        registry.dispatch("SetVolume", r#"{"volume":1}"#);
    }
}
