//! Code units: loadable type definitions and their member tables.
//!
//! A [`UnitDecl`] is pure data, as parsed from a payload or built in code.
//! Turning it into a [`CodeUnit`] validates it and mints a fresh
//! [`UnitId`], so the same declaration registered in two independent
//! registries yields two distinct units (a collision).
//!
//! Units refer to their parent and capabilities by name only; which unit a
//! name denotes is decided by the loader that defined the referring unit.

mod member;
mod registry;
mod signature;

pub use member::{Body, Member, MemberKey, MemberKind};
pub use registry::UnitRegistry;
pub use signature::{ParamType, Signature};

use std::fmt;

use rustc_hash::FxHashMap;

use crate::base::{QualifiedName, UnitId};
use crate::error::RegistryError;

/// Whether a unit is a class or an interface (capability).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Class,
    Interface,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Class => f.write_str("class"),
            UnitKind::Interface => f.write_str("interface"),
        }
    }
}

/// An identity-free unit declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitDecl {
    pub qualified_name: QualifiedName,
    pub kind: UnitKind,
    pub is_abstract: bool,
    pub parent: Option<QualifiedName>,
    pub capabilities: Vec<QualifiedName>,
    pub members: Vec<Member>,
}

impl UnitDecl {
    fn new(name: impl Into<QualifiedName>, kind: UnitKind, is_abstract: bool) -> Self {
        Self {
            qualified_name: name.into(),
            kind,
            is_abstract,
            parent: None,
            capabilities: Vec::new(),
            members: Vec::new(),
        }
    }

    /// A concrete class.
    pub fn class(name: impl Into<QualifiedName>) -> Self {
        Self::new(name, UnitKind::Class, false)
    }

    /// A class without a usable zero-arg constructor.
    pub fn abstract_class(name: impl Into<QualifiedName>) -> Self {
        Self::new(name, UnitKind::Class, true)
    }

    /// An interface.
    pub fn interface(name: impl Into<QualifiedName>) -> Self {
        Self::new(name, UnitKind::Interface, true)
    }

    pub fn extends(mut self, parent: impl Into<QualifiedName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn implements(mut self, capability: impl Into<QualifiedName>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Validate and mint a unit with a fresh identity.
    pub fn build(self) -> Result<CodeUnit, RegistryError> {
        CodeUnit::from_decl(self)
    }
}

/// A registered type definition.
#[derive(Clone, Debug)]
pub struct CodeUnit {
    id: UnitId,
    qualified_name: QualifiedName,
    kind: UnitKind,
    is_abstract: bool,
    parent: Option<QualifiedName>,
    capabilities: Vec<QualifiedName>,
    members: FxHashMap<MemberKey, Member>,
}

impl CodeUnit {
    /// Validate a declaration and mint a unit with a fresh identity.
    ///
    /// Fails if two members share a key, if a member kind is not allowed on
    /// the unit kind, if a body is missing or present against the member
    /// kind, or if an interface names a parent class.
    pub fn from_decl(decl: UnitDecl) -> Result<Self, RegistryError> {
        let UnitDecl {
            qualified_name,
            kind,
            is_abstract,
            parent,
            capabilities,
            members: declared,
        } = decl;

        let invalid = |reason: String| RegistryError::InvalidDeclaration {
            owner: qualified_name.clone(),
            reason,
        };

        if kind == UnitKind::Interface && parent.is_some() {
            return Err(invalid("an interface cannot extend a class".into()));
        }
        if parent.as_ref() == Some(&qualified_name) {
            return Err(invalid("a unit cannot extend itself".into()));
        }

        let mut members = FxHashMap::default();
        for member in declared {
            let allowed = match kind {
                UnitKind::Interface => matches!(
                    member.kind,
                    MemberKind::Abstract | MemberKind::Default | MemberKind::InterfaceStatic
                ),
                UnitKind::Class => match member.kind {
                    MemberKind::Virtual | MemberKind::Override | MemberKind::Static => true,
                    MemberKind::Abstract => is_abstract,
                    MemberKind::Default | MemberKind::InterfaceStatic => false,
                },
            };
            if !allowed {
                return Err(invalid(format!(
                    "{} member `{}` not allowed here",
                    member.kind, member.key
                )));
            }
            if (member.kind == MemberKind::Abstract) != member.body.is_none() {
                return Err(invalid(format!(
                    "{} member `{}` has the wrong body shape",
                    member.kind, member.key
                )));
            }
            if members.contains_key(&member.key) {
                return Err(RegistryError::DuplicateMember {
                    owner: qualified_name.clone(),
                    member: member.key.name.clone(),
                    signature: member.key.signature.to_string(),
                });
            }
            members.insert(member.key.clone(), member);
        }

        Ok(Self {
            id: UnitId::fresh(),
            qualified_name,
            kind,
            is_abstract,
            parent,
            capabilities,
            members,
        })
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == UnitKind::Interface
    }

    /// Whether a receiver can be built through a zero-arg constructor.
    pub fn is_constructible(&self) -> bool {
        self.kind == UnitKind::Class && !self.is_abstract
    }

    pub fn parent(&self) -> Option<&QualifiedName> {
        self.parent.as_ref()
    }

    /// Names of the interfaces this unit declares it implements.
    pub fn capabilities(&self) -> &[QualifiedName] {
        &self.capabilities
    }

    /// Look up a member declared directly on this unit.
    pub fn member(&self, key: &MemberKey) -> Option<&Member> {
        self.members.get(key)
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }
}
