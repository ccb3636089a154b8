//! What each scenario resolves: target unit, member and dispatch kind.

use crate::base::QualifiedName;
use crate::payload::PACKAGE;
use crate::resolve::{DispatchKind, SymbolRequest};
use crate::unit::Signature;

use super::config::{ScenarioConfig, ScenarioDispatch};

/// Unit and capability names a scenario targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Targets {
    pub class: &'static str,
    pub parent: &'static str,
    pub capability: &'static str,
}

/// Defined by both host and payload.
pub const COLLIDING: Targets = Targets {
    class: "Collider",
    parent: "PCollider",
    capability: "ICollider",
};

/// Defined by the payload only.
pub const PAYLOAD_ONLY: Targets = Targets {
    class: "AReflectee",
    parent: "APReflectee",
    capability: "AIReflectee",
};

/// Reference type of `factory-interface` calls.
pub const FACTORY_INTERFACE: &str = "ICommonInterface";
/// Reference type of `factory-extend` calls.
pub const FACTORY_SUPERTYPE: &str = "PCommon";

/// A resolved-to-be request plus the unit whose body should answer it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioPlan {
    pub request: SymbolRequest,
    /// Unit expected to hold the answering body.
    pub answering: QualifiedName,
}

impl ScenarioPlan {
    pub fn for_config(config: &ScenarioConfig) -> Self {
        let targets = if config.collision { COLLIDING } else { PAYLOAD_ONLY };
        let class = qualified(targets.class);

        let (type_name, member, dispatch, answering) = match config.dispatch {
            ScenarioDispatch::Virtual => (class.clone(), "virtTransfer", DispatchKind::Virtual, class),
            ScenarioDispatch::Static => (class.clone(), "staticTransfer", DispatchKind::Static, class),
            ScenarioDispatch::Extended => (
                class,
                "extendedTransfer",
                DispatchKind::Inherited,
                qualified(targets.parent),
            ),
            ScenarioDispatch::Interface => {
                // Collider overrides the capability member, AReflectee takes the default.
                let answering = if config.collision {
                    class.clone()
                } else {
                    qualified(targets.capability)
                };
                (class, "interTransfer", DispatchKind::InterfaceDefault, answering)
            }
            ScenarioDispatch::InterfaceStatic => {
                let capability = qualified(targets.capability);
                (
                    capability.clone(),
                    "staticInterfaceTransfer",
                    DispatchKind::InterfaceStatic,
                    capability,
                )
            }
            ScenarioDispatch::FactoryInterface => (
                class.clone(),
                "commonInterTransfer",
                DispatchKind::Factory {
                    via: qualified(FACTORY_INTERFACE),
                },
                class,
            ),
            ScenarioDispatch::FactoryExtend => (
                class.clone(),
                "commonExtendedTransfer",
                DispatchKind::Factory {
                    via: qualified(FACTORY_SUPERTYPE),
                },
                class,
            ),
            ScenarioDispatch::Overridden => (
                class.clone(),
                "commonExtendedTransfer",
                DispatchKind::Overridden,
                class,
            ),
        };

        Self {
            request: SymbolRequest::new(type_name, member, dispatch, Signature::canonical()),
            answering,
        }
    }
}

fn qualified(simple: &str) -> QualifiedName {
    QualifiedName::qualify(Some(PACKAGE), simple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderKind;

    fn plan(collision: bool, dispatch: ScenarioDispatch) -> ScenarioPlan {
        ScenarioPlan::for_config(&ScenarioConfig::new(LoaderKind::ByteBuffer, collision, true, dispatch))
    }

    #[test]
    fn test_extended_answers_from_parent() {
        let plan = plan(true, ScenarioDispatch::Extended);
        assert_eq!(plan.request.type_name.simple_name(), "Collider");
        assert_eq!(plan.answering.simple_name(), "PCollider");
        assert_eq!(plan.request.dispatch, DispatchKind::Inherited);
    }

    #[test]
    fn test_interface_static_targets_capability() {
        let plan = plan(false, ScenarioDispatch::InterfaceStatic);
        assert_eq!(plan.request.type_name.simple_name(), "AIReflectee");
        assert_eq!(plan.answering, plan.request.type_name);
    }

    #[test]
    fn test_interface_answering_type() {
        assert_eq!(plan(true, ScenarioDispatch::Interface).answering.simple_name(), "Collider");
        assert_eq!(plan(false, ScenarioDispatch::Interface).answering.simple_name(), "AIReflectee");
    }

    #[test]
    fn test_factory_goes_through_common_types() {
        let plan = plan(false, ScenarioDispatch::FactoryExtend);
        match plan.request.dispatch {
            DispatchKind::Factory { via } => assert_eq!(via.simple_name(), "PCommon"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
