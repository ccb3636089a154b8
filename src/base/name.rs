//! Dotted qualified names for types.

use std::borrow::Borrow;
use std::fmt;

use smol_str::SmolStr;

/// A fully qualified type name such as `com.example.theseus.dynandref.Collider`.
///
/// Cheap to clone. Hashes and compares like the underlying string, so maps
/// keyed by `QualifiedName` can be queried with a plain `&str`.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct QualifiedName(SmolStr);

impl QualifiedName {
    /// Create a name from its dotted text.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(SmolStr::new(text.as_ref()))
    }

    /// Qualify `name` with `package` unless it is already dotted.
    pub fn qualify(package: Option<&str>, name: &str) -> Self {
        match package {
            Some(package) if !name.contains('.') && !package.is_empty() => {
                Self(SmolStr::new(format!("{package}.{name}")))
            }
            _ => Self::new(name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last dotted segment (`Collider` for `com.example.Collider`).
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last dot, if any.
    pub fn package(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(package, _)| package)
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.as_str())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QualifiedName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for QualifiedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QualifiedName {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for QualifiedName {
    fn from(text: String) -> Self {
        Self(SmolStr::from(text))
    }
}
