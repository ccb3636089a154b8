//! # dynref-harness
//!
//! Conformance harness for loader delegation and dispatch resolution.
//!
//! Every scenario builds an isolated loader context, resolves one member
//! through it under one dispatch kind, calls it with a fixed argument vector
//! and checks by round trip that the right unit answered with every
//! argument intact.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! scenario → Driver, oracle, matrix, reporting
//!   ↓
//! invoke   → Argument vector, normalization, call, source/sink
//!   ↓
//! resolve  → Dispatch kinds, member lookup, assignability
//!   ↓
//! loader   → Loader contexts, delegation policies, host context
//!   ↓
//! payload  → Unit payload format (pest), stores, parse cache
//!   ↓
//! unit     → Code units, members, signatures, registry
//!   ↓
//! base     → Primitives (UnitId, LoaderId, QualifiedName)
//! ```
//!
//! `error` and `config` are shared by every layer.

/// Foundation types: identities and qualified names
pub mod base;

/// Harness-wide configuration
pub mod config;

/// Error taxonomy and diagnostic codes
pub mod error;

/// Argument binding and calls
pub mod invoke;

/// Loader contexts and delegation
pub mod loader;

/// Textual unit payloads
pub mod payload;

/// Symbol resolution
pub mod resolve;

/// Scenario driver, oracle and reporting
pub mod scenario;

/// Code units and registries
pub mod unit;

pub use base::{LoaderId, QualifiedName, UnitId};
pub use config::HarnessConfig;
pub use error::{
    HarnessError, InvocationError, InvocationPhase, LoadError, PayloadError, RegistryError,
    ResolutionError,
};
pub use loader::{DelegationPolicy, LoadedType, LoaderContext, LoaderKind, PayloadSource};
pub use resolve::{DispatchKind, ResolvedSymbol, Resolver, SymbolRequest};
pub use scenario::{
    Harness, ScenarioConfig, ScenarioDispatch, ScenarioMatrix, ScenarioReport, ScenarioResult,
    ScenarioStatus,
};
pub use unit::{CodeUnit, UnitDecl, UnitRegistry};
