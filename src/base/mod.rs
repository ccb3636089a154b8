//! Foundation types for the harness.
//!
//! This module provides the primitives every other layer builds on:
//! - [`UnitId`], [`LoaderId`] - Identities of registered units and loader namespaces
//! - [`QualifiedName`] - Dotted type names (`com.example.Collider`)
//!
//! This module has NO dependencies on other harness modules.

mod ids;
mod name;

pub use ids::{LoaderId, UnitId};
pub use name::QualifiedName;
