//! Typed argument values and the canonical argument vector.

use std::fmt;

use smol_str::SmolStr;

use crate::unit::ParamType;

/// Index of the slot overwritten with the sensitive value before each call.
pub const SENSITIVE_SLOT: usize = 8;

/// Elements of the canonical variable-length group.
pub const CANONICAL_VARARGS: [&str; 2] = ["some", "strings"];

/// One argument value.
#[derive(Clone, Debug)]
pub enum ArgValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(SmolStr),
    /// A variable-length group passed as one contiguous sequence.
    StrArray(Vec<SmolStr>),
}

impl ArgValue {
    /// The parameter type this value binds to.
    pub fn param_type(&self) -> ParamType {
        match self {
            ArgValue::Bool(_) => ParamType::Bool,
            ArgValue::Byte(_) => ParamType::Byte,
            ArgValue::Short(_) => ParamType::Short,
            ArgValue::Char(_) => ParamType::Char,
            ArgValue::Int(_) => ParamType::Int,
            ArgValue::Long(_) => ParamType::Long,
            ArgValue::Float(_) => ParamType::Float,
            ArgValue::Double(_) => ParamType::Double,
            ArgValue::Str(_) => ParamType::Str,
            ArgValue::StrArray(_) => ParamType::StrVarargs,
        }
    }

    /// Exact equality. Floats compare by bit pattern.
    pub fn same_value(&self, other: &ArgValue) -> bool {
        match (self, other) {
            (ArgValue::Bool(a), ArgValue::Bool(b)) => a == b,
            (ArgValue::Byte(a), ArgValue::Byte(b)) => a == b,
            (ArgValue::Short(a), ArgValue::Short(b)) => a == b,
            (ArgValue::Char(a), ArgValue::Char(b)) => a == b,
            (ArgValue::Int(a), ArgValue::Int(b)) => a == b,
            (ArgValue::Long(a), ArgValue::Long(b)) => a == b,
            (ArgValue::Float(a), ArgValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ArgValue::Double(a), ArgValue::Double(b)) => a.to_bits() == b.to_bits(),
            (ArgValue::Str(a), ArgValue::Str(b)) => a == b,
            (ArgValue::StrArray(a), ArgValue::StrArray(b)) => a == b,
            _ => false,
        }
    }

    /// Parse the textual form produced by [`Display`](fmt::Display) back
    /// into a value of type `ty`. Not defined for variable-length groups.
    pub fn parse_as(ty: ParamType, text: &str) -> Option<ArgValue> {
        Some(match ty {
            ParamType::Bool => ArgValue::Bool(text.parse().ok()?),
            ParamType::Byte => ArgValue::Byte(text.parse().ok()?),
            ParamType::Short => ArgValue::Short(text.parse().ok()?),
            ParamType::Char => {
                let mut chars = text.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                ArgValue::Char(c)
            }
            ParamType::Int => ArgValue::Int(text.parse().ok()?),
            ParamType::Long => ArgValue::Long(text.parse().ok()?),
            ParamType::Float => ArgValue::Float(text.parse().ok()?),
            ParamType::Double => ArgValue::Double(text.parse().ok()?),
            ParamType::Str => ArgValue::Str(SmolStr::new(text)),
            ParamType::StrVarargs => return None,
        })
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(v) => write!(f, "{v}"),
            ArgValue::Byte(v) => write!(f, "{v}"),
            ArgValue::Short(v) => write!(f, "{v}"),
            ArgValue::Char(v) => write!(f, "{v}"),
            ArgValue::Int(v) => write!(f, "{v}"),
            ArgValue::Long(v) => write!(f, "{v}"),
            ArgValue::Float(v) => write!(f, "{v}"),
            ArgValue::Double(v) => write!(f, "{v}"),
            ArgValue::Str(v) => f.write_str(v),
            ArgValue::StrArray(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(item)?;
                }
                Ok(())
            }
        }
    }
}

/// An ordered argument list as the caller supplies it.
///
/// The trailing variable-length group may be given as one
/// [`ArgValue::StrArray`] or as loose [`ArgValue::Str`] values; the adapter
/// normalizes either form against the callee's signature.
#[derive(Clone, Debug, Default)]
pub struct ArgumentVector {
    values: Vec<ArgValue>,
}

impl ArgumentVector {
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    /// The ten-slot vector every scenario calls with.
    ///
    /// The sensitive slot holds an empty placeholder until the adapter
    /// injects the source value.
    pub fn canonical() -> Self {
        Self::new(vec![
            ArgValue::Bool(true),
            ArgValue::Byte(42),
            ArgValue::Short(666),
            ArgValue::Char('*'),
            ArgValue::Int(0xDEAD_BEEF_u32 as i32),
            ArgValue::Long(0x0D1A_B011_C5EA_F00D),
            ArgValue::Float(0.99),
            ArgValue::Double(std::f64::consts::PI),
            ArgValue::Str(SmolStr::default()),
            ArgValue::StrArray(CANONICAL_VARARGS.iter().map(|s| SmolStr::new(s)).collect()),
        ])
    }

    /// A copy with the sensitive slot replaced by `value`.
    ///
    /// Vectors too short to have the slot are returned unchanged.
    pub fn with_sensitive(&self, value: impl AsRef<str>) -> Self {
        let mut values = self.values.clone();
        if let Some(slot) = values.get_mut(SENSITIVE_SLOT) {
            *slot = ArgValue::Str(SmolStr::new(value.as_ref()));
        }
        Self { values }
    }

    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<ArgValue> for ArgumentVector {
    fn from_iter<I: IntoIterator<Item = ArgValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
