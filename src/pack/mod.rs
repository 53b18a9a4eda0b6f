//! Script packs
//!
//! A script pack is a plugin that prepares a REPL session: it adds references
//! and namespace imports, publishes state the engine can hand to scripts, and
//! exposes a typed context object to host code.
//!
//! - [`catalog`]: which assemblies export which packs
//! - [`loader`]: turns a filtered assembly list into pack instances

pub mod catalog;
pub mod loader;

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

pub use catalog::{AssemblyCatalog, PackCatalog, PackModule};
pub use loader::ScriptPackLoader;

/// Plugin contributing setup and teardown behavior to a REPL session
pub trait ScriptPack: Send + Sync {
    /// Name scripts use to look the pack up
    fn name(&self) -> &str;

    /// Contribute references, namespaces and state to a starting session
    fn initialize(&self, session: &mut ScriptPackSession);

    /// Typed object exposed to host code through [`ScriptPackManager::get`]
    fn context(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        None
    }

    /// Called once when the session ends or is reset
    fn terminate(&self) {}
}

/// What packs contribute while a session starts
#[derive(Debug, Clone, Default)]
pub struct ScriptPackSession {
    script_args: Vec<String>,
    references: Vec<String>,
    namespaces: Vec<String>,
    state: BTreeMap<String, Value>,
}

impl ScriptPackSession {
    pub fn new(script_args: Vec<String>) -> Self {
        Self {
            script_args,
            ..Self::default()
        }
    }

    pub fn script_args(&self) -> &[String] {
        &self.script_args
    }

    pub fn add_reference(&mut self, reference: impl Into<String>) {
        let reference = reference.into();
        if !self.references.contains(&reference) {
            self.references.push(reference);
        }
    }

    pub fn import_namespace(&mut self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        if !self.namespaces.contains(&namespace) {
            self.namespaces.push(namespace);
        }
    }

    /// Publish a value under `key`; later writes win
    pub fn set_state(&mut self, key: impl Into<String>, value: Value) {
        self.state.insert(key.into(), value);
    }

    pub fn state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn all_state(&self) -> &BTreeMap<String, Value> {
        &self.state
    }
}

/// Typed access to the contexts exported by the loaded packs
#[derive(Default)]
pub struct ScriptPackManager {
    contexts: Vec<(String, Arc<dyn Any + Send + Sync>)>,
}

impl ScriptPackManager {
    pub fn new(packs: &[Arc<dyn ScriptPack>]) -> Self {
        let contexts = packs
            .iter()
            .filter_map(|pack| pack.context().map(|ctx| (pack.name().to_string(), ctx)))
            .collect();
        Self { contexts }
    }

    /// First context of type `T`
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.contexts
            .iter()
            .find_map(|(_, ctx)| Arc::clone(ctx).downcast::<T>().ok())
    }

    /// Context exported by the pack called `name`
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.contexts
            .iter()
            .find(|(pack, _)| pack.eq_ignore_ascii_case(name))
            .map(|(_, ctx)| Arc::clone(ctx))
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl std::fmt::Debug for ScriptPackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.contexts.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ScriptPackManager")
            .field("contexts", &names)
            .finish()
    }
}

/// Read-only view over the packs of the current session
#[derive(Clone, Default)]
pub struct ScriptPackResolver {
    packs: Vec<Arc<dyn ScriptPack>>,
}

impl ScriptPackResolver {
    pub fn new(packs: Vec<Arc<dyn ScriptPack>>) -> Self {
        Self { packs }
    }

    pub fn get_packs(&self) -> &[Arc<dyn ScriptPack>] {
        &self.packs
    }

    pub fn names(&self) -> Vec<&str> {
        self.packs.iter().map(|pack| pack.name()).collect()
    }
}

impl std::fmt::Debug for ScriptPackResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPackResolver")
            .field("packs", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        start: u32,
    }

    struct CounterPack;

    impl ScriptPack for CounterPack {
        fn name(&self) -> &str {
            "Counter"
        }

        fn initialize(&self, session: &mut ScriptPackSession) {
            session.add_reference("Acme.Counter");
            session.add_reference("Acme.Counter");
            session.import_namespace("Acme.Counting");
            session.set_state("Counter", serde_json::json!({ "start": 3 }));
        }

        fn context(&self) -> Option<Arc<dyn Any + Send + Sync>> {
            Some(Arc::new(Counter { start: 3 }))
        }
    }

    struct SilentPack;

    impl ScriptPack for SilentPack {
        fn name(&self) -> &str {
            "Silent"
        }

        fn initialize(&self, _session: &mut ScriptPackSession) {}
    }

    #[test]
    fn test_session_collects_contributions() {
        let mut session = ScriptPackSession::new(vec!["--fast".to_string()]);
        CounterPack.initialize(&mut session);

        assert_eq!(session.script_args(), ["--fast"]);
        assert_eq!(session.references(), ["Acme.Counter"]);
        assert_eq!(session.namespaces(), ["Acme.Counting"]);
        assert_eq!(session.state("Counter"), Some(&serde_json::json!({ "start": 3 })));
    }

    #[test]
    fn test_manager_returns_typed_context() {
        let packs: Vec<Arc<dyn ScriptPack>> = vec![Arc::new(SilentPack), Arc::new(CounterPack)];
        let manager = ScriptPackManager::new(&packs);

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get::<Counter>().map(|c| c.start), Some(3));
        assert!(manager.get::<String>().is_none());
        assert!(manager.get_by_name("counter").is_some());
        assert!(manager.get_by_name("Silent").is_none());
    }

    #[test]
    fn test_resolver_exposes_packs_in_order() {
        let packs: Vec<Arc<dyn ScriptPack>> = vec![Arc::new(SilentPack), Arc::new(CounterPack)];
        let resolver = ScriptPackResolver::new(packs);
        assert_eq!(resolver.get_packs().len(), 2);
        assert_eq!(resolver.names(), vec!["Silent", "Counter"]);
    }
}
