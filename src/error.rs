//! Error taxonomy for every layer of the harness.
//!
//! Component errors are plain `thiserror` enums that propagate with `?`.
//! Only the scenario driver folds them into a [`HarnessError`], which maps
//! each failure to a stable diagnostic code and a scenario status.

use std::fmt;
use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::QualifiedName;
use crate::scenario::ScenarioStatus;

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable codes attached to every scenario failure.
pub mod codes {
    /// A registry already holds a unit with this qualified name.
    pub const DUPLICATE_DEFINITION: &str = "DR0001";
    /// A unit declares two members with the same name and signature.
    pub const DUPLICATE_MEMBER: &str = "DR0002";
    /// A member or hierarchy declaration is not valid for its unit kind.
    pub const INVALID_DECLARATION: &str = "DR0003";
    /// The name is absent from every registry reachable under the policy.
    pub const CLASS_NOT_FOUND: &str = "DR0010";
    /// A delegation or supertype walk exceeded the hop bound.
    pub const DELEGATION_CYCLE: &str = "DR0011";
    /// Two capabilities supply the same default body and nothing overrides it.
    pub const AMBIGUOUS_DEFAULT: &str = "DR0020";
    /// Static-through-interface members cannot be bound on this runtime.
    pub const UNSUPPORTED_STATIC_INTERFACE: &str = "DR0021";
    /// No member with this name and signature is reachable.
    pub const NO_SUCH_MEMBER: &str = "DR0022";
    /// The answering member has no body.
    pub const ABSTRACT_MEMBER: &str = "DR0023";
    /// The answering member does not shadow an inherited body.
    pub const NOT_OVERRIDDEN: &str = "DR0024";
    /// The answering member is declared on the type itself, not inherited.
    pub const NOT_INHERITED: &str = "DR0025";
    /// The receiver could not be constructed.
    pub const CONSTRUCTION_FAILED: &str = "DR0030";
    /// Arguments or receiver could not be bound to the callee.
    pub const BINDING_FAILED: &str = "DR0031";
    /// The callee raised.
    pub const CALL_RAISED: &str = "DR0032";
    /// A non-sensitive argument came back changed.
    pub const ARGUMENT_MISMATCH: &str = "DR0040";
    /// The body that answered belongs to the wrong unit.
    pub const WRONG_OWNER: &str = "DR0041";
    /// The sensitive value never reached the sink.
    pub const TAINT_LOST: &str = "DR0042";
    /// The code payload could not be read or parsed.
    pub const PAYLOAD: &str = "DR0050";
}

// ============================================================================
// COMPONENT ERRORS
// ============================================================================

/// Errors raised while building a unit or a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate definition of `{name}`")]
    DuplicateDefinition { name: QualifiedName },

    #[error("`{owner}` declares `{member}{signature}` twice")]
    DuplicateMember {
        owner: QualifiedName,
        member: SmolStr,
        signature: String,
    },

    #[error("invalid declaration in `{owner}`: {reason}")]
    InvalidDeclaration { owner: QualifiedName, reason: String },
}

/// Errors raised by a loader context while loading a type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("class `{name}` not found by {loader}")]
    ClassNotFound { name: QualifiedName, loader: SmolStr },

    #[error("loading `{name}` exceeded {limit} delegation hops")]
    DelegationCycle { name: QualifiedName, limit: usize },
}

/// Errors raised while binding a member name to a body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("ambiguous default for `{member}`: supplied by {}", join(.candidates))]
    AmbiguousDefault {
        member: SmolStr,
        candidates: Vec<QualifiedName>,
    },

    #[error("static interface member `{capability}.{member}` cannot be bound to a handle")]
    UnsupportedStaticInterfaceDispatch {
        capability: QualifiedName,
        member: SmolStr,
    },

    #[error("no member `{member}{signature}` reachable from `{owner}`")]
    NoSuchMember {
        owner: QualifiedName,
        member: SmolStr,
        signature: String,
    },

    #[error("`{owner}.{member}` is abstract")]
    AbstractMember { owner: QualifiedName, member: SmolStr },

    #[error("`{owner}.{member}` does not override an inherited member")]
    NotOverridden { owner: QualifiedName, member: SmolStr },

    #[error("`{owner}.{member}` is declared locally, not inherited")]
    NotInherited { owner: QualifiedName, member: SmolStr },

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// The phase of an invocation in which a failure occurred.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum InvocationPhase {
    ConstructionFailed,
    BindingFailed,
    CallRaised,
}

impl InvocationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationPhase::ConstructionFailed => "construction failed",
            InvocationPhase::BindingFailed => "binding failed",
            InvocationPhase::CallRaised => "call raised",
        }
    }
}

impl fmt::Display for InvocationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure during construction, binding or the call itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{phase}: {cause}")]
pub struct InvocationError {
    pub phase: InvocationPhase,
    pub cause: String,
}

impl InvocationError {
    pub fn construction(cause: impl Into<String>) -> Self {
        Self {
            phase: InvocationPhase::ConstructionFailed,
            cause: cause.into(),
        }
    }

    pub fn binding(cause: impl Into<String>) -> Self {
        Self {
            phase: InvocationPhase::BindingFailed,
            cause: cause.into(),
        }
    }

    pub fn raised(cause: impl Into<String>) -> Self {
        Self {
            phase: InvocationPhase::CallRaised,
            cause: cause.into(),
        }
    }
}

/// Errors raised while fetching or decoding a code payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("failed to read payload `{}`: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("payload `{name}` not found")]
    Missing { name: SmolStr },

    #[error("payload `{name}` has no path in this store")]
    NoPath { name: SmolStr },

    #[error("payload is not valid UTF-8")]
    Encoding,

    #[error("payload syntax error: {message}")]
    Syntax { message: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ============================================================================
// HARNESS ERROR
// ============================================================================

/// Any failure a scenario can end in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("arguments changed across the call at slots {slots:?}")]
    ArgumentMismatch { slots: Vec<usize> },

    #[error("expected owner `{expected}`, answered by `{actual}`")]
    WrongOwner { expected: String, actual: String },

    #[error("sink never received the sensitive value")]
    TaintLost,
}

impl From<LoadError> for HarnessError {
    fn from(err: LoadError) -> Self {
        HarnessError::Resolution(ResolutionError::Load(err))
    }
}

impl HarnessError {
    /// The stable diagnostic code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            HarnessError::Payload(PayloadError::Registry(err)) => registry_code(err),
            HarnessError::Payload(_) => codes::PAYLOAD,
            HarnessError::Resolution(err) => match err {
                ResolutionError::AmbiguousDefault { .. } => codes::AMBIGUOUS_DEFAULT,
                ResolutionError::UnsupportedStaticInterfaceDispatch { .. } => {
                    codes::UNSUPPORTED_STATIC_INTERFACE
                }
                ResolutionError::NoSuchMember { .. } => codes::NO_SUCH_MEMBER,
                ResolutionError::AbstractMember { .. } => codes::ABSTRACT_MEMBER,
                ResolutionError::NotOverridden { .. } => codes::NOT_OVERRIDDEN,
                ResolutionError::NotInherited { .. } => codes::NOT_INHERITED,
                ResolutionError::Load(LoadError::ClassNotFound { .. }) => codes::CLASS_NOT_FOUND,
                ResolutionError::Load(LoadError::DelegationCycle { .. }) => {
                    codes::DELEGATION_CYCLE
                }
            },
            HarnessError::Invocation(err) => match err.phase {
                InvocationPhase::ConstructionFailed => codes::CONSTRUCTION_FAILED,
                InvocationPhase::BindingFailed => codes::BINDING_FAILED,
                InvocationPhase::CallRaised => codes::CALL_RAISED,
            },
            HarnessError::ArgumentMismatch { .. } => codes::ARGUMENT_MISMATCH,
            HarnessError::WrongOwner { .. } => codes::WRONG_OWNER,
            HarnessError::TaintLost => codes::TAINT_LOST,
        }
    }

    /// The scenario status this failure reports as.
    ///
    /// Payload failures happen before resolution can start, so they report
    /// as resolution failures.
    pub fn status(&self) -> ScenarioStatus {
        match self {
            HarnessError::Payload(_) | HarnessError::Resolution(_) => {
                ScenarioStatus::ResolutionFailure
            }
            HarnessError::Invocation(_) => ScenarioStatus::InvocationFailure,
            HarnessError::ArgumentMismatch { .. }
            | HarnessError::WrongOwner { .. }
            | HarnessError::TaintLost => ScenarioStatus::Mismatch,
        }
    }
}

fn registry_code(err: &RegistryError) -> &'static str {
    match err {
        RegistryError::DuplicateDefinition { .. } => codes::DUPLICATE_DEFINITION,
        RegistryError::DuplicateMember { .. } => codes::DUPLICATE_MEMBER,
        RegistryError::InvalidDeclaration { .. } => codes::INVALID_DECLARATION,
    }
}

fn join(names: &[QualifiedName]) -> String {
    names
        .iter()
        .map(QualifiedName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
