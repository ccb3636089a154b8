//! Parameter types and member signatures.

use std::fmt;

/// The type of one formal parameter.
///
/// `StrVarargs` is the variable-length string group and is only meaningful
/// in the last position of a [`Signature`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    Bool,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Str,
    StrVarargs,
}

impl ParamType {
    /// Parse the spelling used in payload declarations (`boolean`, `String...`).
    pub fn from_source_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => ParamType::Bool,
            "byte" => ParamType::Byte,
            "short" => ParamType::Short,
            "char" => ParamType::Char,
            "int" => ParamType::Int,
            "long" => ParamType::Long,
            "float" => ParamType::Float,
            "double" => ParamType::Double,
            "String" => ParamType::Str,
            "String..." => ParamType::StrVarargs,
            _ => return None,
        })
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            ParamType::Bool => "boolean",
            ParamType::Byte => "byte",
            ParamType::Short => "short",
            ParamType::Char => "char",
            ParamType::Int => "int",
            ParamType::Long => "long",
            ParamType::Float => "float",
            ParamType::Double => "double",
            ParamType::Str => "String",
            ParamType::StrVarargs => "String...",
        }
    }

    /// The JVM-style type descriptor.
    pub fn descriptor(&self) -> &'static str {
        match self {
            ParamType::Bool => "Z",
            ParamType::Byte => "B",
            ParamType::Short => "S",
            ParamType::Char => "C",
            ParamType::Int => "I",
            ParamType::Long => "J",
            ParamType::Float => "F",
            ParamType::Double => "D",
            ParamType::Str => "Ljava/lang/String;",
            ParamType::StrVarargs => "[Ljava/lang/String;",
        }
    }
}

/// An ordered parameter list. Part of a member's lookup key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature(Vec<ParamType>);

impl Signature {
    pub fn new(params: Vec<ParamType>) -> Self {
        Self(params)
    }

    /// `(boolean, byte, short, char, int, long, float, double, String, String...)`,
    /// the signature every transfer member in the bundled payloads uses.
    pub fn canonical() -> Self {
        Self(vec![
            ParamType::Bool,
            ParamType::Byte,
            ParamType::Short,
            ParamType::Char,
            ParamType::Int,
            ParamType::Long,
            ParamType::Float,
            ParamType::Double,
            ParamType::Str,
            ParamType::StrVarargs,
        ])
    }

    pub fn params(&self) -> &[ParamType] {
        &self.0
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Whether the last parameter is a variable-length group.
    pub fn is_variadic(&self) -> bool {
        self.0.last() == Some(&ParamType::StrVarargs)
    }

    /// Parameters before the variable-length group (all of them if none).
    pub fn fixed_params(&self) -> &[ParamType] {
        if self.is_variadic() {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.0 {
            f.write_str(param.descriptor())?;
        }
        f.write_str(")")
    }
}
