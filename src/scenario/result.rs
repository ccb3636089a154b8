//! Scenario outcomes and the states a scenario passes through.

use std::fmt;

use smol_str::SmolStr;

use crate::error::HarnessError;

use super::config::ScenarioConfig;

/// The one-word outcome of a scenario.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
pub enum ScenarioStatus {
    Passed,
    Mismatch,
    ResolutionFailure,
    InvocationFailure,
}

impl ScenarioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioStatus::Passed => "pass",
            ScenarioStatus::Mismatch => "mismatch",
            ScenarioStatus::ResolutionFailure => "resolutionFailure",
            ScenarioStatus::InvocationFailure => "invocationFailure",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state of the scenario state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum ScenarioState {
    Configured,
    LoaderBuilt,
    Resolved,
    Invoked,
    Verified,
    Passed,
    Failed { status: ScenarioStatus, code: &'static str },
}

impl ScenarioState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScenarioState::Passed | ScenarioState::Failed { .. })
    }
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioState::Configured => f.write_str("configured"),
            ScenarioState::LoaderBuilt => f.write_str("loader-built"),
            ScenarioState::Resolved => f.write_str("resolved"),
            ScenarioState::Invoked => f.write_str("invoked"),
            ScenarioState::Verified => f.write_str("verified"),
            ScenarioState::Passed => f.write_str("passed"),
            ScenarioState::Failed { status, code } => write!(f, "failed ({status}, {code})"),
        }
    }
}

/// Why a scenario failed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Failure {
    pub code: &'static str,
    pub message: String,
    #[cfg_attr(feature = "json", serde(skip))]
    pub error: HarnessError,
}

impl From<HarnessError> for Failure {
    fn from(error: HarnessError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
            error,
        }
    }
}

/// The outcome of one scenario.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ScenarioResult {
    pub config: ScenarioConfig,
    pub expected_owner: SmolStr,
    pub actual_owner: Option<SmolStr>,
    pub arguments_matched: bool,
    pub status: ScenarioStatus,
    pub failure: Option<Failure>,
    /// States visited, ending in a terminal one.
    pub trace: Vec<ScenarioState>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }

    /// Diagnostic code of the failure, if any.
    pub fn code(&self) -> Option<&'static str> {
        self.failure.as_ref().map(|failure| failure.code)
    }
}
