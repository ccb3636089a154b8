//! The loader kinds a scenario can ask for.

use std::fmt;
use std::str::FromStr;

use super::DelegationPolicy;

/// Code-loading strategy used to build a scenario's context.
///
/// The kinds differ in where the payload comes from and in delegation
/// order; the storage medium never changes how names resolve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum LoaderKind {
    /// In-memory payload bytes, parent-first.
    #[cfg_attr(feature = "json", serde(rename = "byte-buffer-based"))]
    ByteBuffer,
    /// Payload file, parsed once per harness, parent-first.
    #[cfg_attr(feature = "json", serde(rename = "path-based-cached"))]
    PathCached,
    /// Payload file, parsed on every build, parent-first.
    #[cfg_attr(feature = "json", serde(rename = "path-based-uncached"))]
    PathUncached,
    /// Payload file, parsed on every build, child-first.
    DelegateLast,
}

impl LoaderKind {
    pub const ALL: [LoaderKind; 4] = [
        LoaderKind::ByteBuffer,
        LoaderKind::PathCached,
        LoaderKind::PathUncached,
        LoaderKind::DelegateLast,
    ];

    /// Delegation order used when the context has a parent.
    pub fn policy(&self) -> DelegationPolicy {
        match self {
            LoaderKind::DelegateLast => DelegationPolicy::ChildFirst,
            _ => DelegationPolicy::ParentFirst,
        }
    }

    /// Whether the payload is read from a file rather than passed as bytes.
    pub fn is_path_based(&self) -> bool {
        !matches!(self, LoaderKind::ByteBuffer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderKind::ByteBuffer => "byte-buffer-based",
            LoaderKind::PathCached => "path-based-cached",
            LoaderKind::PathUncached => "path-based-uncached",
            LoaderKind::DelegateLast => "delegate-last",
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoaderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoaderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown loader kind `{s}`"))
    }
}
