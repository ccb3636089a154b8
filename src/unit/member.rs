//! Member declarations and their bodies.

use std::fmt;

use smol_str::SmolStr;

use super::signature::Signature;

/// How a member is declared on its unit.
///
/// Whether a member is *inherited* is not declared; it is a property of
/// where resolution finds it, reported as a
/// [`MemberOrigin`](crate::resolve::MemberOrigin).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Instance member dispatched on the receiver's runtime type.
    Virtual,
    /// Instance member that must shadow an identically-signed inherited member.
    Override,
    /// Class-level member with no receiver.
    Static,
    /// Default body supplied by an interface.
    Default,
    /// Static member declared on an interface.
    InterfaceStatic,
    /// Declared without a body.
    Abstract,
}

impl MemberKind {
    /// Whether the member is dispatched through a receiver.
    pub fn is_instance(&self) -> bool {
        matches!(
            self,
            MemberKind::Virtual | MemberKind::Override | MemberKind::Default | MemberKind::Abstract
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Virtual => "virtual",
            MemberKind::Override => "override",
            MemberKind::Static => "static",
            MemberKind::Default => "default",
            MemberKind::InterfaceStatic => "interface-static",
            MemberKind::Abstract => "abstract",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a member does when called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// Echo every argument back, prefixed by the owner tag.
    Transfer { tag: SmolStr },
    /// Raise with the given message.
    Raise { message: SmolStr },
    /// Echo the arguments with one scalar corrupted.
    Tamper { tag: SmolStr },
}

impl Body {
    pub fn transfer(tag: impl AsRef<str>) -> Self {
        Body::Transfer {
            tag: SmolStr::new(tag.as_ref()),
        }
    }
}

/// Lookup key of a member: name plus parameter signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberKey {
    pub name: SmolStr,
    pub signature: Signature,
}

impl MemberKey {
    pub fn new(name: impl AsRef<str>, signature: Signature) -> Self {
        Self {
            name: SmolStr::new(name.as_ref()),
            signature,
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.signature)
    }
}

/// A member declared on a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub key: MemberKey,
    pub kind: MemberKind,
    /// `None` exactly when `kind` is [`MemberKind::Abstract`].
    pub body: Option<Body>,
}

impl Member {
    pub fn new(name: impl AsRef<str>, kind: MemberKind, signature: Signature, body: Option<Body>) -> Self {
        Self {
            key: MemberKey::new(name, signature),
            kind,
            body,
        }
    }

    /// An abstract member with the given signature.
    pub fn abstract_member(name: impl AsRef<str>, signature: Signature) -> Self {
        Self::new(name, MemberKind::Abstract, signature, None)
    }

    /// A member with the canonical signature whose body is a transfer tagged `tag`.
    pub fn transfer(name: impl AsRef<str>, kind: MemberKind, tag: &str) -> Self {
        Self::new(name, kind, Signature::canonical(), Some(Body::transfer(tag)))
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn signature(&self) -> &Signature {
        &self.key.signature
    }
}
