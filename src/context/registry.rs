//! Type name to context strategy registry.

use crate::context::glossary::GlossaryContextStrategy;
use crate::context::process::ProcessContextStrategy;
use crate::context::ContextStrategy;
use std::collections::HashMap;
use std::sync::Arc;

pub const GLOSSARY_TERM: &str = "GlossaryTerm";
pub const PROCESS: &str = "Process";

#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn ContextStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the glossary term and process strategies installed.
    pub fn with_defaults(max_depth: usize) -> Self {
        let mut registry = Self::new();
        registry.register(GLOSSARY_TERM, Arc::new(GlossaryContextStrategy::new(max_depth)));
        registry.register(PROCESS, Arc::new(ProcessContextStrategy::new(max_depth)));
        registry
    }

    pub fn register(&mut self, type_name: impl Into<String>, strategy: Arc<dyn ContextStrategy>) {
        self.strategies.insert(type_name.into(), strategy);
    }

    /// Route `alias` to the strategy already registered for `target`.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<(), String> {
        let strategy = self
            .strategies
            .get(target)
            .cloned()
            .ok_or_else(|| format!("no strategy registered for type '{}'", target))?;
        self.strategies.insert(alias.into(), strategy);
        Ok(())
    }

    pub fn resolve(&self, type_name: &str) -> Option<Arc<dyn ContextStrategy>> {
        self.strategies.get(type_name).cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.strategies.contains_key(type_name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
