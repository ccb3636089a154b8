//! Delegation, isolation and collision properties of loader contexts.

use std::sync::Arc;

use dynref::error::{LoadError, ResolutionError};
use dynref::loader::{DelegationPolicy, LoaderContext, LoaderKind, bundled_host_context};
use dynref::payload::{MemoryPayloadStore, PACKAGE, parse_units};
use dynref::resolve::{DispatchKind, MemberOrigin, SymbolRequest};
use dynref::scenario::{Harness, ScenarioConfig, ScenarioDispatch};
use dynref::unit::{Signature, UnitRegistry};
use dynref::HarnessConfig;
use rstest::{fixture, rstest};

fn qualified(simple: &str) -> String {
    format!("{PACKAGE}.{simple}")
}

#[fixture]
fn harness() -> Harness<MemoryPayloadStore> {
    Harness::new(MemoryPayloadStore::bundled(), HarnessConfig::default()).unwrap()
}

fn scenario_context(harness: &Harness<MemoryPayloadStore>, kind: LoaderKind, has_parent: bool) -> LoaderContext {
    let config = ScenarioConfig::new(kind, true, has_parent, ScenarioDispatch::Virtual);
    harness.build_loader(&config).unwrap()
}

// ============================================================================
// ISOLATION
// ============================================================================

#[rstest]
fn test_no_parent_never_reaches_host(harness: Harness<MemoryPayloadStore>) {
    let context = scenario_context(&harness, LoaderKind::ByteBuffer, false);

    // Defined by the host only.
    let err = context.load_type(&qualified("MainReflectee")).unwrap_err();
    assert!(matches!(err, LoadError::ClassNotFound { .. }));

    // Defined by both: always the local one.
    let collider = context.load_type(&qualified("Collider")).unwrap();
    assert_eq!(collider.loader().id(), context.id());
}

#[test]
fn test_isolated_policy_ignores_structural_parent() {
    let host = bundled_host_context(&HarnessConfig::default()).unwrap();
    let context = LoaderContext::new(DelegationPolicy::Isolated, Some(host), UnitRegistry::new());

    assert!(context.load_type(&qualified("Collider")).is_err());
}

// ============================================================================
// COLLISION
// ============================================================================

#[rstest]
#[case(LoaderKind::ByteBuffer, true)]
#[case(LoaderKind::PathCached, true)]
#[case(LoaderKind::PathUncached, true)]
#[case(LoaderKind::DelegateLast, false)]
fn test_collision_follows_policy(#[case] kind: LoaderKind, #[case] host_wins: bool) {
    let dir = tempfile::tempdir().unwrap();
    let store = dynref::payload::DirPayloadStore::new(dir.path());
    store.install_bundled().unwrap();
    let harness = Harness::new(store, HarnessConfig::default()).unwrap();

    let context = harness
        .build_loader(&ScenarioConfig::new(kind, true, true, ScenarioDispatch::Virtual))
        .unwrap();
    let name = qualified("Collider");
    let loaded = context.load_type(&name).unwrap();
    let host_unit = harness.host().local_units().lookup(&name).unwrap();
    let local_unit = context.local_units().lookup(&name).unwrap();

    assert_ne!(host_unit.id(), local_unit.id());
    if host_wins {
        assert_eq!(loaded.id(), host_unit.id());
    } else {
        assert_eq!(loaded.id(), local_unit.id());
    }
}

#[rstest]
fn test_each_build_mints_fresh_identities(harness: Harness<MemoryPayloadStore>) {
    let first = scenario_context(&harness, LoaderKind::ByteBuffer, false);
    let second = scenario_context(&harness, LoaderKind::ByteBuffer, false);
    let name = qualified("AReflectee");

    assert_ne!(
        first.load_type(&name).unwrap().id(),
        second.load_type(&name).unwrap().id()
    );
}

#[rstest]
fn test_supertypes_load_through_defining_context(harness: Harness<MemoryPayloadStore>) {
    // Parent-first: AReflectee is local, but PCommon two levels up is the host's.
    let context = scenario_context(&harness, LoaderKind::ByteBuffer, true);
    let reflectee = context.load_type(&qualified("AReflectee")).unwrap();
    let parent = reflectee.parent_type().unwrap().unwrap();
    let grandparent = parent.parent_type().unwrap().unwrap();

    assert_eq!(reflectee.loader().id(), context.id());
    assert_eq!(parent.loader().id(), context.id());
    assert_eq!(grandparent.loader().id(), harness.host().id());
}

// ============================================================================
// CYCLE GUARD
// ============================================================================

#[test]
fn test_supertype_cycle_fails_instead_of_hanging() {
    let decls = parse_units(
        r#"
        package p;
        class A extends B { }
        class B extends A { }
        "#,
    )
    .unwrap();
    let context = LoaderContext::new(
        DelegationPolicy::Isolated,
        None,
        UnitRegistry::from_decls(decls).unwrap(),
    )
    .with_max_hops(6);

    let err = context
        .resolver()
        .with_max_hops(6)
        .resolve(&SymbolRequest::new("p.A", "run", DispatchKind::Virtual, Signature::canonical()))
        .unwrap_err();

    assert_eq!(
        err,
        ResolutionError::Load(LoadError::DelegationCycle {
            name: "p.A".into(),
            limit: 6,
        })
    );
}

#[test]
fn test_long_delegation_chain_hits_bound() {
    let mut context = Arc::new(LoaderContext::new(
        DelegationPolicy::Isolated,
        None,
        UnitRegistry::from_decls(parse_units("class Root { }").unwrap()).unwrap(),
    ));
    for _ in 0..10 {
        context = Arc::new(
            LoaderContext::new(DelegationPolicy::ParentFirst, Some(context), UnitRegistry::new())
                .with_max_hops(5),
        );
    }

    assert!(matches!(
        context.load_type("Root"),
        Err(LoadError::DelegationCycle { limit: 5, .. })
    ));
}

// ============================================================================
// DEFAULT RESOLUTION
// ============================================================================

const SIG: &str = "boolean, byte, short, char, int, long, float, double, String, String...";

fn defaults_payload(overrides: bool) -> LoaderContext {
    let body = if overrides {
        format!("virtual run({SIG}) = transfer \"Impl\";")
    } else {
        String::new()
    };
    let source = format!(
        r#"
        package p;
        interface Left {{ default run({SIG}) = transfer "Left"; }}
        interface Right {{ default run({SIG}) = transfer "Right"; }}
        class Impl implements Left, Right {{ {body} }}
        "#
    );
    LoaderContext::new(
        DelegationPolicy::Isolated,
        None,
        UnitRegistry::from_decls(parse_units(&source).unwrap()).unwrap(),
    )
}

#[test]
fn test_two_defaults_without_override_are_ambiguous() {
    let context = defaults_payload(false);
    let err = context
        .resolver()
        .resolve(&SymbolRequest::new(
            "p.Impl",
            "run",
            DispatchKind::InterfaceDefault,
            Signature::canonical(),
        ))
        .unwrap_err();

    match err {
        ResolutionError::AmbiguousDefault { member, candidates } => {
            assert_eq!(member, "run");
            let names: Vec<_> = candidates.iter().map(|c| c.as_str()).collect();
            assert_eq!(names, ["p.Left", "p.Right"]);
        }
        other => panic!("expected AmbiguousDefault, got {other:?}"),
    }
}

#[test]
fn test_override_resolves_default_ambiguity() {
    let context = defaults_payload(true);
    let symbol = context
        .resolver()
        .resolve(&SymbolRequest::new(
            "p.Impl",
            "run",
            DispatchKind::InterfaceDefault,
            Signature::canonical(),
        ))
        .unwrap();

    assert_eq!(symbol.owner.qualified_name().as_str(), "p.Impl");
    assert_eq!(symbol.origin, MemberOrigin::Declared);
}

#[rstest]
fn test_static_interface_member_unsupported_by_default(harness: Harness<MemoryPayloadStore>) {
    let context = scenario_context(&harness, LoaderKind::ByteBuffer, false);
    let request = SymbolRequest::new(
        qualified("ICollider"),
        "staticInterfaceTransfer",
        DispatchKind::InterfaceStatic,
        Signature::canonical(),
    );

    let err = context.resolver().resolve(&request).unwrap_err();
    assert!(matches!(err, ResolutionError::UnsupportedStaticInterfaceDispatch { .. }));

    let symbol = context
        .resolver()
        .with_static_interface_handles(true)
        .resolve(&request)
        .unwrap();
    assert!(symbol.receiver.is_none());
}
