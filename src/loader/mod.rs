//! Loader contexts: isolated namespaces with a delegation policy.
//!
//! # Architecture
//!
//! A [`LoaderContext`] owns a [`UnitRegistry`] of local definitions and may
//! reference a shared parent context. Loading a name walks the namespaces in
//! the order dictated by its [`DelegationPolicy`]:
//!
//! - **parent-first** - ask the parent, fall back to local units
//! - **child-first** - local units first, then the parent ("delegate last")
//! - **isolated** - local units only, any parent is ignored
//!
//! A loaded type remembers the context that *defined* it, and every name
//! that type refers to (its parent, its capabilities) is loaded through that
//! defining context. That is what makes a colliding definition observable:
//! the same name can denote different units depending on who asks.
//!
//! Contexts are immutable once built. The host context is built once and
//! shared read-only as the parent of scenario contexts.

mod host;
mod kind;

pub use host::{bundled_host_context, host_context};
pub use kind::LoaderKind;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{LoaderId, QualifiedName, UnitId};
use crate::error::{LoadError, PayloadError};
use crate::payload::{PayloadCache, parse_payload_bytes, read_and_parse};
use crate::unit::{CodeUnit, UnitDecl, UnitRegistry};

/// Default bound on delegation and supertype hops.
pub const DEFAULT_MAX_HOPS: usize = 32;

/// Order in which a context consults its parent and its local units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DelegationPolicy {
    ParentFirst,
    ChildFirst,
    /// Search local units only, even if a parent is present.
    Isolated,
}

impl DelegationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelegationPolicy::ParentFirst => "parent-first",
            DelegationPolicy::ChildFirst => "child-first",
            DelegationPolicy::Isolated => "none",
        }
    }
}

impl fmt::Display for DelegationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a context's local units come from.
#[derive(Clone, Debug)]
pub enum PayloadSource {
    /// Raw payload bytes, decoded at build time.
    Bytes(Arc<[u8]>),
    /// A payload file. `cached` reuses parsed declarations across builds.
    Path { path: PathBuf, cached: bool },
    /// Declarations already in memory.
    Decls(Arc<[UnitDecl]>),
}

impl PayloadSource {
    /// Decode the source into fresh local units.
    pub fn into_registry(self, cache: &PayloadCache) -> Result<UnitRegistry, PayloadError> {
        let registry = match self {
            PayloadSource::Bytes(bytes) => UnitRegistry::from_decls(parse_payload_bytes(&bytes)?)?,
            PayloadSource::Path { path, cached: true } => {
                UnitRegistry::from_decls(cache.get_or_parse(&path)?.iter().cloned())?
            }
            PayloadSource::Path { path, cached: false } => {
                UnitRegistry::from_decls(read_and_parse(&path)?)?
            }
            PayloadSource::Decls(decls) => UnitRegistry::from_decls(decls.iter().cloned())?,
        };
        Ok(registry)
    }
}

/// An isolated namespace of code units with a delegation policy.
#[derive(Debug)]
pub struct LoaderContext {
    id: LoaderId,
    label: SmolStr,
    policy: DelegationPolicy,
    parent: Option<Arc<LoaderContext>>,
    local: UnitRegistry,
    max_hops: usize,
}

impl LoaderContext {
    /// Create a context over `local` units.
    pub fn new(
        policy: DelegationPolicy,
        parent: Option<Arc<LoaderContext>>,
        local: UnitRegistry,
    ) -> Self {
        Self {
            id: LoaderId::fresh(),
            label: SmolStr::new_static("loader"),
            policy,
            parent,
            local,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Create a context whose local units are decoded from `source`.
    pub fn from_source(
        policy: DelegationPolicy,
        parent: Option<Arc<LoaderContext>>,
        source: PayloadSource,
        cache: &PayloadCache,
    ) -> Result<Self, PayloadError> {
        Ok(Self::new(policy, parent, source.into_registry(cache)?))
    }

    /// Set the human-readable label used in errors and logs.
    pub fn with_label(mut self, label: impl AsRef<str>) -> Self {
        self.label = SmolStr::new(label.as_ref());
        self
    }

    /// Set the bound on delegation hops before a load is abandoned.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn id(&self) -> LoaderId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn policy(&self) -> DelegationPolicy {
        self.policy
    }

    pub fn parent(&self) -> Option<&Arc<LoaderContext>> {
        self.parent.as_ref()
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// The units defined by this context itself.
    pub fn local_units(&self) -> &UnitRegistry {
        &self.local
    }

    /// Load a type by qualified name under this context's policy.
    pub fn load_type(&self, name: &str) -> Result<LoadedType<'_>, LoadError> {
        self.load_with_hops(name, 0).map_err(|err| match err {
            LoadError::ClassNotFound { name, .. } => LoadError::ClassNotFound {
                name,
                loader: self.label.clone(),
            },
            other => other,
        })
    }

    fn load_with_hops(&self, name: &str, hops: usize) -> Result<LoadedType<'_>, LoadError> {
        if hops > self.max_hops {
            return Err(LoadError::DelegationCycle {
                name: QualifiedName::new(name),
                limit: self.max_hops,
            });
        }

        match self.policy {
            DelegationPolicy::ParentFirst => {
                if let Some(parent) = &self.parent {
                    trace!(loader = %self.id, name, "delegating to parent first");
                    match parent.load_with_hops(name, hops + 1) {
                        Ok(found) => return Ok(found),
                        Err(LoadError::ClassNotFound { .. }) => {}
                        Err(err) => return Err(err),
                    }
                }
                self.find_local(name).ok_or_else(|| self.not_found(name))
            }
            DelegationPolicy::ChildFirst => {
                if let Some(found) = self.find_local(name) {
                    return Ok(found);
                }
                match &self.parent {
                    Some(parent) => {
                        trace!(loader = %self.id, name, "local miss, delegating to parent");
                        parent.load_with_hops(name, hops + 1)
                    }
                    None => Err(self.not_found(name)),
                }
            }
            DelegationPolicy::Isolated => self.find_local(name).ok_or_else(|| self.not_found(name)),
        }
    }

    fn find_local(&self, name: &str) -> Option<LoadedType<'_>> {
        self.local.lookup(name).map(|unit| {
            trace!(loader = %self.id, name, unit = %unit.id(), "defined locally");
            LoadedType { unit, loader: self }
        })
    }

    fn not_found(&self, name: &str) -> LoadError {
        LoadError::ClassNotFound {
            name: QualifiedName::new(name),
            loader: self.label.clone(),
        }
    }
}

/// A unit together with the context that defined it.
#[derive(Copy, Clone)]
pub struct LoadedType<'a> {
    unit: &'a Arc<CodeUnit>,
    loader: &'a LoaderContext,
}

impl<'a> LoadedType<'a> {
    pub fn unit(&self) -> &'a CodeUnit {
        self.unit
    }

    /// The context that defined this unit.
    pub fn loader(&self) -> &'a LoaderContext {
        self.loader
    }

    pub fn id(&self) -> UnitId {
        self.unit.id()
    }

    pub fn qualified_name(&self) -> &'a QualifiedName {
        self.unit.qualified_name()
    }

    /// Load this unit's parent through its defining context.
    pub fn parent_type(&self) -> Result<Option<LoadedType<'a>>, LoadError> {
        self.unit
            .parent()
            .map(|name| self.loader.load_type(name.as_str()))
            .transpose()
    }

    /// Load this unit's declared capabilities through its defining context.
    pub fn capability_types(&self) -> Result<Vec<LoadedType<'a>>, LoadError> {
        self.unit
            .capabilities()
            .iter()
            .map(|name| self.loader.load_type(name.as_str()))
            .collect()
    }

    /// Whether both handles denote the same unit instance.
    pub fn same_unit(&self, other: &LoadedType<'_>) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for LoadedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedType")
            .field("name", self.unit.qualified_name())
            .field("unit", &self.unit.id())
            .field("loader", &self.loader.label)
            .finish()
    }
}
