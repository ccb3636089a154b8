//! The round-trip oracle.
//!
//! The expected owner is computed from the host's declared names alone, never
//! through loader logic, so a delegation bug cannot agree with itself.

use smol_str::SmolStr;

use crate::base::QualifiedName;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::invoke::{Echo, Invocation, echo_text};
use crate::loader::DelegationPolicy;
use crate::unit::{Signature, UnitRegistry};

use super::config::ScenarioConfig;

/// The owner tag that should answer `config`.
///
/// The host answers only when the scenario context has the host as parent,
/// delegates to it first, and the host defines the answering unit.
pub fn expected_owner(
    config: &ScenarioConfig,
    answering: &QualifiedName,
    host_units: &UnitRegistry,
    harness: &HarnessConfig,
) -> SmolStr {
    let host_answers = config.has_parent
        && config.loader_kind.policy() == DelegationPolicy::ParentFirst
        && host_units.contains(answering.as_str());
    if host_answers {
        harness.host_tag.clone()
    } else {
        harness.payload_tag.clone()
    }
}

/// What the oracle observed about one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Owner tag parsed from the result, if it parsed.
    pub actual_owner: Option<SmolStr>,
    /// Slots whose echoed value differs from the sent one.
    pub mismatched_slots: Vec<usize>,
    /// Whether the result carries the sensitive value.
    pub taint_reached: bool,
}

impl Verdict {
    /// Compare a call's echo against what the callee was bound with.
    ///
    /// An empty sensitive value never counts as reaching the sink, so a
    /// source that returns `""` always ends in `TaintLost`.
    pub fn of(invocation: &Invocation, signature: &Signature) -> Self {
        let sensitive = invocation.sensitive.as_str();
        let taint_reached = !sensitive.is_empty()
            && (invocation.result.contains(sensitive) || invocation.result.contains(&*echo_text(sensitive)));

        let Some(echo) = Echo::parse(&invocation.result) else {
            return Self {
                actual_owner: None,
                mismatched_slots: (0..signature.arity()).collect(),
                taint_reached,
            };
        };

        let echoed = echo.decode(signature);
        let mismatched_slots = (0..signature.arity())
            .filter(|&slot| match (invocation.bound.get(slot), echoed.get(slot)) {
                (Some(sent), Some(Some(echoed))) => !sent.same_value(echoed),
                _ => true,
            })
            .collect();

        Self {
            actual_owner: Some(echo.owner),
            mismatched_slots,
            taint_reached,
        }
    }

    pub fn arguments_matched(&self) -> bool {
        self.mismatched_slots.is_empty()
    }

    /// Fail unless `expected` answered with every argument intact.
    pub fn check(&self, expected: &str) -> Result<(), HarnessError> {
        match &self.actual_owner {
            Some(actual) if actual == expected => {}
            actual => {
                return Err(HarnessError::WrongOwner {
                    expected: expected.to_owned(),
                    actual: actual.as_deref().unwrap_or("<unreadable>").to_owned(),
                });
            }
        }
        if !self.arguments_matched() {
            return Err(HarnessError::ArgumentMismatch {
                slots: self.mismatched_slots.clone(),
            });
        }
        if !self.taint_reached {
            return Err(HarnessError::TaintLost);
        }
        Ok(())
    }
}
