//! Identities for registered code units and loader namespaces.

use std::fmt;

use uuid::Uuid;

/// Identity of one registered [`CodeUnit`](crate::unit::CodeUnit) instance.
///
/// Two units registered under the same qualified name in independent
/// registries always get different ids. Comparing ids is how the harness
/// tells a colliding definition apart from the intended one.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct UnitId(Uuid);

impl UnitId {
    /// Mint a new identity, distinct from every other `UnitId` in the process.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying uuid.
    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", short(&self.0))
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", short(&self.0))
    }
}

/// Identity of a [`LoaderContext`](crate::loader::LoaderContext).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct LoaderId(Uuid);

impl LoaderId {
    /// Mint a new loader identity.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Debug for LoaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoaderId({})", short(&self.0))
    }
}

impl fmt::Display for LoaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loader#{}", short(&self.0))
    }
}

fn short(id: &Uuid) -> String {
    let mut text = id.simple().to_string();
    text.truncate(8);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_ids_are_distinct() {
        let a = UnitId::fresh();
        let b = UnitId::fresh();

        assert_eq!(a, a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unit_id_hash() {
        use std::collections::HashSet;

        let a = UnitId::fresh();
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(UnitId::fresh());
        set.insert(a); // duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_is_short() {
        let id = LoaderId::fresh();
        let text = id.to_string();

        assert!(text.starts_with("loader#"));
        assert_eq!(text.len(), "loader#".len() + 8);
    }
}
