//! Scenario configuration tuples.

use std::fmt;
use std::str::FromStr;

use crate::loader::LoaderKind;

/// The dispatch form a scenario exercises.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum ScenarioDispatch {
    Virtual,
    Static,
    /// Member inherited from the target's parent.
    Extended,
    /// Member of a capability, answered by an override or a default body.
    Interface,
    /// Static member declared on the target's capability.
    InterfaceStatic,
    /// Through a capability-typed reference held by the host.
    FactoryInterface,
    /// Through a supertype-typed reference held by the host.
    FactoryExtend,
    /// Member shadowing a supertype body.
    Overridden,
}

impl ScenarioDispatch {
    pub const ALL: [ScenarioDispatch; 8] = [
        ScenarioDispatch::Virtual,
        ScenarioDispatch::Static,
        ScenarioDispatch::Extended,
        ScenarioDispatch::Interface,
        ScenarioDispatch::InterfaceStatic,
        ScenarioDispatch::FactoryInterface,
        ScenarioDispatch::FactoryExtend,
        ScenarioDispatch::Overridden,
    ];

    pub fn is_factory(&self) -> bool {
        matches!(self, ScenarioDispatch::FactoryInterface | ScenarioDispatch::FactoryExtend)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioDispatch::Virtual => "virtual",
            ScenarioDispatch::Static => "static",
            ScenarioDispatch::Extended => "extended",
            ScenarioDispatch::Interface => "interface",
            ScenarioDispatch::InterfaceStatic => "interface-static",
            ScenarioDispatch::FactoryInterface => "factory-interface",
            ScenarioDispatch::FactoryExtend => "factory-extend",
            ScenarioDispatch::Overridden => "overridden",
        }
    }
}

impl fmt::Display for ScenarioDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioDispatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioDispatch::ALL
            .into_iter()
            .find(|dispatch| dispatch.as_str() == s)
            .ok_or_else(|| format!("unknown dispatch kind `{s}`"))
    }
}

/// One point of the scenario matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    pub loader_kind: LoaderKind,
    /// Target the unit defined by both host and payload.
    pub collision: bool,
    /// Give the scenario context the host as parent.
    pub has_parent: bool,
    pub dispatch: ScenarioDispatch,
}

impl ScenarioConfig {
    pub fn new(loader_kind: LoaderKind, collision: bool, has_parent: bool, dispatch: ScenarioDispatch) -> Self {
        Self {
            loader_kind,
            collision,
            has_parent,
            dispatch,
        }
    }
}

impl fmt::Display for ScenarioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.loader_kind,
            if self.collision { "collision" } else { "no-collision" },
            if self.has_parent { "parent" } else { "no-parent" },
            self.dispatch
        )
    }
}
