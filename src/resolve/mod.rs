//! Symbol resolution: binding a member name to a body under a dispatch kind.
//!
//! Resolution runs against a [`LoaderContext`]: the target type is loaded
//! through it, and every supertype or capability the walk visits is loaded
//! through the context that defined the referring unit.
//!
//! ## Dispatch kinds
//!
//! - [`DispatchKind::Virtual`] - receiver's own table, then its parent chain
//! - [`DispatchKind::Static`] - declared directly on the type, no receiver
//! - [`DispatchKind::InterfaceDefault`] - like virtual, then capability defaults
//! - [`DispatchKind::InterfaceStatic`] - declared on the interface itself
//! - [`DispatchKind::Inherited`] / [`DispatchKind::Overridden`] - virtual, plus a
//!   check of where the answering body sits relative to the receiver type
//! - [`DispatchKind::Factory`] - through a reference type the caller sees
//!
//! A [`ResolvedSymbol`] borrows from the contexts it was resolved in and is
//! never cached: every scenario resolves again.

mod subtype;

pub use subtype::is_assignable;

use std::fmt;

use smol_str::SmolStr;
use tracing::debug;

use crate::base::QualifiedName;
use crate::error::{LoadError, ResolutionError};
use crate::loader::{LoadedType, LoaderContext};
use crate::unit::{Body, Member, MemberKey, MemberKind, Signature};

// ============================================================================
// REQUESTS
// ============================================================================

/// The binding rule used to find a member's body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    Virtual,
    Static,
    InterfaceDefault,
    InterfaceStatic,
    Inherited,
    Overridden,
    /// Invoke through a reference of type `via`, loaded by the caller.
    Factory { via: QualifiedName },
}

impl DispatchKind {
    /// Whether the call needs a constructed receiver.
    pub fn needs_receiver(&self) -> bool {
        !matches!(self, DispatchKind::Static | DispatchKind::InterfaceStatic)
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchKind::Virtual => f.write_str("virtual"),
            DispatchKind::Static => f.write_str("static"),
            DispatchKind::InterfaceDefault => f.write_str("interface-default"),
            DispatchKind::InterfaceStatic => f.write_str("interface-static"),
            DispatchKind::Inherited => f.write_str("inherited"),
            DispatchKind::Overridden => f.write_str("overridden"),
            DispatchKind::Factory { via } => write!(f, "factory via {via}"),
        }
    }
}

/// What to resolve: a type, a member key, and the dispatch kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolRequest {
    pub type_name: QualifiedName,
    pub member: MemberKey,
    pub dispatch: DispatchKind,
}

impl SymbolRequest {
    pub fn new(
        type_name: impl Into<QualifiedName>,
        member: impl AsRef<str>,
        dispatch: DispatchKind,
        signature: Signature,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            member: MemberKey::new(member, signature),
            dispatch,
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Where the answering body sits relative to the resolved type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberOrigin {
    /// Declared on the resolved type and shadowing nothing.
    Declared,
    /// Declared on the resolved type, shadowing a supertype's body.
    Overridden { shadowed: QualifiedName },
    /// Declared on a supertype.
    Inherited { from: QualifiedName },
    /// Default body supplied by a capability.
    Default { capability: QualifiedName },
}

impl fmt::Display for MemberOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberOrigin::Declared => f.write_str("declared"),
            MemberOrigin::Overridden { shadowed } => write!(f, "overridden (shadows {shadowed})"),
            MemberOrigin::Inherited { from } => write!(f, "inherited from {from}"),
            MemberOrigin::Default { capability } => write!(f, "default from {capability}"),
        }
    }
}

/// The receiver a call needs.
#[derive(Copy, Clone, Debug)]
pub struct Receiver<'a> {
    /// Type to construct.
    pub runtime: LoadedType<'a>,
    /// Static type the caller holds the instance as, if it differs.
    pub reference: Option<LoadedType<'a>>,
}

/// A bound, invocable member.
#[derive(Clone, Debug)]
pub struct ResolvedSymbol<'a> {
    /// Unit whose body answers.
    pub owner: LoadedType<'a>,
    pub dispatch: DispatchKind,
    pub member: &'a Member,
    pub body: &'a Body,
    pub origin: MemberOrigin,
    /// Absent for static and interface-static dispatch.
    pub receiver: Option<Receiver<'a>>,
}

// ============================================================================
// RESOLVER
// ============================================================================

#[derive(Copy, Clone)]
struct Hit<'a> {
    owner: LoadedType<'a>,
    member: &'a Member,
    depth: usize,
}

/// Resolves [`SymbolRequest`]s against a loader context.
#[derive(Clone, Debug)]
pub struct Resolver<'a> {
    context: &'a LoaderContext,
    caller: &'a LoaderContext,
    static_interface_handles: bool,
    max_hops: usize,
}

impl<'a> Resolver<'a> {
    /// A resolver loading through `context`, which is also the caller.
    pub fn new(context: &'a LoaderContext) -> Self {
        Self {
            context,
            caller: context,
            static_interface_handles: false,
            max_hops: context.max_hops(),
        }
    }

    /// Set the context that loads reference types for factory dispatch.
    pub fn with_caller(mut self, caller: &'a LoaderContext) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_static_interface_handles(mut self, enabled: bool) -> Self {
        self.static_interface_handles = enabled;
        self
    }

    /// Set the bound on supertype-chain length.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Resolve a request to an invocable symbol.
    pub fn resolve(&self, request: &SymbolRequest) -> Result<ResolvedSymbol<'a>, ResolutionError> {
        let target = self.context.load_type(request.type_name.as_str())?;
        debug!(
            loader = %target.loader().id(),
            name = %request.type_name,
            unit = %target.id(),
            member = %request.member,
            dispatch = %request.dispatch,
            "resolving"
        );

        let key = &request.member;
        let dispatch = request.dispatch.clone();
        match &request.dispatch {
            DispatchKind::Virtual => {
                let (hit, body, origin) = self.dispatch_instance(target, key, false)?;
                Ok(instance_symbol(hit, body, origin, dispatch, target, None))
            }
            DispatchKind::InterfaceDefault => {
                let (hit, body, origin) = self.dispatch_instance(target, key, true)?;
                Ok(instance_symbol(hit, body, origin, dispatch, target, None))
            }
            DispatchKind::Inherited => {
                let (hit, body, origin) = self.dispatch_instance(target, key, false)?;
                if !matches!(origin, MemberOrigin::Inherited { .. }) {
                    return Err(ResolutionError::NotInherited {
                        owner: target.qualified_name().clone(),
                        member: key.name.clone(),
                    });
                }
                Ok(instance_symbol(hit, body, origin, dispatch, target, None))
            }
            DispatchKind::Overridden => {
                let (hit, body, origin) = self.dispatch_instance(target, key, false)?;
                if !matches!(origin, MemberOrigin::Overridden { .. }) {
                    return Err(ResolutionError::NotOverridden {
                        owner: target.qualified_name().clone(),
                        member: key.name.clone(),
                    });
                }
                Ok(instance_symbol(hit, body, origin, dispatch, target, None))
            }
            DispatchKind::Static => self.resolve_static(target, key, dispatch),
            DispatchKind::InterfaceStatic => self.resolve_interface_static(target, key, dispatch),
            DispatchKind::Factory { via } => {
                let reference = self.caller.load_type(via.as_str())?;
                // The slot must exist on the type the caller holds.
                let has_slot = self.find_in_chain(reference, key)?.is_some()
                    || !self.collect_defaults(reference, key)?.is_empty();
                if !has_slot {
                    return Err(no_such_member(reference, key));
                }
                let (hit, body, origin) = self.dispatch_instance(target, key, true)?;
                Ok(instance_symbol(hit, body, origin, dispatch, target, Some(reference)))
            }
        }
    }

    fn resolve_static(
        &self,
        target: LoadedType<'a>,
        key: &MemberKey,
        dispatch: DispatchKind,
    ) -> Result<ResolvedSymbol<'a>, ResolutionError> {
        let member = target
            .unit()
            .member(key)
            .filter(|member| member.kind == MemberKind::Static)
            .ok_or_else(|| no_such_member(target, key))?;
        Ok(ResolvedSymbol {
            owner: target,
            dispatch,
            member,
            body: body_of(target, member)?,
            origin: MemberOrigin::Declared,
            receiver: None,
        })
    }

    fn resolve_interface_static(
        &self,
        target: LoadedType<'a>,
        key: &MemberKey,
        dispatch: DispatchKind,
    ) -> Result<ResolvedSymbol<'a>, ResolutionError> {
        let member = Some(target.unit())
            .filter(|unit| unit.is_interface())
            .and_then(|unit| unit.member(key))
            .filter(|member| member.kind == MemberKind::InterfaceStatic)
            .ok_or_else(|| no_such_member(target, key))?;
        if !self.static_interface_handles {
            return Err(ResolutionError::UnsupportedStaticInterfaceDispatch {
                capability: target.qualified_name().clone(),
                member: key.name.clone(),
            });
        }
        Ok(ResolvedSymbol {
            owner: target,
            dispatch,
            member,
            body: body_of(target, member)?,
            origin: MemberOrigin::Declared,
            receiver: None,
        })
    }

    /// Find the body an instance of `target` answers `key` with.
    ///
    /// Walks the receiver's own table and its parent chain. A body found
    /// there always wins; capability defaults are only consulted when
    /// `with_defaults` is set and the chain has no body.
    fn dispatch_instance(
        &self,
        target: LoadedType<'a>,
        key: &MemberKey,
        with_defaults: bool,
    ) -> Result<(Hit<'a>, &'a Body, MemberOrigin), ResolutionError> {
        let chain_hit = self.find_in_chain(target, key)?;
        if let Some(hit) = chain_hit {
            if let Some(body) = hit.member.body.as_ref() {
                let origin = self.origin_of(target, hit)?;
                return Ok((hit, body, origin));
            }
        }

        if with_defaults {
            let mut defaults = self.collect_defaults(target, key)?;
            if defaults.len() > 1 {
                return Err(ResolutionError::AmbiguousDefault {
                    member: key.name.clone(),
                    candidates: defaults
                        .iter()
                        .map(|hit| hit.owner.qualified_name().clone())
                        .collect(),
                });
            }
            if let Some(hit) = defaults.pop() {
                let body = body_of(hit.owner, hit.member)?;
                let origin = MemberOrigin::Default {
                    capability: hit.owner.qualified_name().clone(),
                };
                return Ok((hit, body, origin));
            }
        }

        match chain_hit {
            Some(hit) => Err(ResolutionError::AbstractMember {
                owner: hit.owner.qualified_name().clone(),
                member: key.name.clone(),
            }),
            None => Err(no_such_member(target, key)),
        }
    }

    /// Classify a body found on the chain of `target`.
    fn origin_of(&self, target: LoadedType<'a>, hit: Hit<'a>) -> Result<MemberOrigin, ResolutionError> {
        if hit.depth > 0 {
            return Ok(MemberOrigin::Inherited {
                from: hit.owner.qualified_name().clone(),
            });
        }
        let shadowed = match target.parent_type()? {
            Some(parent) => self.find_in_chain(parent, &hit.member.key)?,
            None => None,
        };
        match shadowed {
            Some(shadowed) => Ok(MemberOrigin::Overridden {
                shadowed: shadowed.owner.qualified_name().clone(),
            }),
            None if hit.member.kind == MemberKind::Override => Err(ResolutionError::NotOverridden {
                owner: target.qualified_name().clone(),
                member: hit.member.key.name.clone(),
            }),
            None => Ok(MemberOrigin::Declared),
        }
    }

    /// First instance member matching `key` on `start` or its parent chain.
    fn find_in_chain(&self, start: LoadedType<'a>, key: &MemberKey) -> Result<Option<Hit<'a>>, ResolutionError> {
        let mut current = Some(start);
        let mut depth = 0;
        while let Some(ty) = current {
            if depth > self.max_hops {
                return Err(self.cycle(start));
            }
            if let Some(member) = ty.unit().member(key).filter(|m| m.kind.is_instance()) {
                return Ok(Some(Hit {
                    owner: ty,
                    member,
                    depth,
                }));
            }
            current = ty.parent_type()?;
            depth += 1;
        }
        Ok(None)
    }

    /// Default bodies for `key` supplied by capabilities of `start`'s chain,
    /// one per distinct capability unit.
    fn collect_defaults(&self, start: LoadedType<'a>, key: &MemberKey) -> Result<Vec<Hit<'a>>, ResolutionError> {
        let mut found: Vec<Hit<'a>> = Vec::new();
        let mut current = Some(start);
        let mut depth = 0;
        while let Some(ty) = current {
            if depth > self.max_hops {
                return Err(self.cycle(start));
            }
            for capability in ty.capability_types()? {
                let Some(member) = capability
                    .unit()
                    .member(key)
                    .filter(|m| m.kind == MemberKind::Default)
                else {
                    continue;
                };
                if found.iter().all(|hit| !hit.owner.same_unit(&capability)) {
                    found.push(Hit {
                        owner: capability,
                        member,
                        depth,
                    });
                }
            }
            current = ty.parent_type()?;
            depth += 1;
        }
        Ok(found)
    }

    fn cycle(&self, start: LoadedType<'a>) -> ResolutionError {
        LoadError::DelegationCycle {
            name: start.qualified_name().clone(),
            limit: self.max_hops,
        }
        .into()
    }
}

impl LoaderContext {
    /// A resolver loading through this context.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    /// Resolve `type_name.member(signature)` with plain virtual dispatch,
    /// falling back to a static member of that name.
    pub fn resolve(
        &self,
        type_name: &str,
        member: &str,
        signature: Signature,
    ) -> Result<ResolvedSymbol<'_>, ResolutionError> {
        let resolver = self.resolver();
        let request = SymbolRequest::new(type_name, member, DispatchKind::Virtual, signature);
        match resolver.resolve(&request) {
            Err(ResolutionError::NoSuchMember { .. }) => resolver.resolve(&SymbolRequest {
                dispatch: DispatchKind::Static,
                ..request
            }),
            other => other,
        }
    }
}

fn instance_symbol<'a>(
    hit: Hit<'a>,
    body: &'a Body,
    origin: MemberOrigin,
    dispatch: DispatchKind,
    target: LoadedType<'a>,
    reference: Option<LoadedType<'a>>,
) -> ResolvedSymbol<'a> {
    ResolvedSymbol {
        owner: hit.owner,
        dispatch,
        member: hit.member,
        body,
        origin,
        receiver: Some(Receiver {
            runtime: target,
            reference,
        }),
    }
}

fn body_of<'a>(owner: LoadedType<'a>, member: &'a Member) -> Result<&'a Body, ResolutionError> {
    member.body.as_ref().ok_or_else(|| ResolutionError::AbstractMember {
        owner: owner.qualified_name().clone(),
        member: member.key.name.clone(),
    })
}

fn no_such_member(owner: LoadedType<'_>, key: &MemberKey) -> ResolutionError {
    ResolutionError::NoSuchMember {
        owner: owner.qualified_name().clone(),
        member: SmolStr::new(&key.name),
        signature: key.signature.to_string(),
    }
}
