//! The unit registry: one namespace's worth of definitions.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{CodeUnit, UnitDecl};
use crate::base::QualifiedName;
use crate::error::RegistryError;

/// A set of code units keyed by qualified name.
///
/// Pure data container. Iteration follows registration order.
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    units: IndexMap<QualifiedName, Arc<CodeUnit>>,
}

impl UnitRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from declarations, minting a fresh unit for each.
    pub fn from_decls<I>(decls: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = UnitDecl>,
    {
        let mut registry = Self::new();
        for decl in decls {
            registry.register(decl.build()?)?;
        }
        Ok(registry)
    }

    /// Register a unit. Fails if its qualified name is already taken here.
    pub fn register(&mut self, unit: CodeUnit) -> Result<Arc<CodeUnit>, RegistryError> {
        if self.units.contains_key(unit.qualified_name()) {
            return Err(RegistryError::DuplicateDefinition {
                name: unit.qualified_name().clone(),
            });
        }
        let unit = Arc::new(unit);
        self.units
            .insert(unit.qualified_name().clone(), Arc::clone(&unit));
        Ok(unit)
    }

    /// Look up a unit by qualified name.
    pub fn lookup(&self, name: &str) -> Option<&Arc<CodeUnit>> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Iterate over all registered units.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CodeUnit>> {
        self.units.values()
    }

    /// Iterate over all registered names.
    pub fn names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.units.keys()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
