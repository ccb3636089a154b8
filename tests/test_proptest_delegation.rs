//! Property tests for delegation over random registries.
//!
//! A host and a child context each define a random subset of a small name
//! pool. Whatever the subsets, the context answering a load must be the one
//! the delegation policy names, and assignability must agree with a walk
//! over declared names.
#![cfg(feature = "proptest")]

use std::sync::Arc;

use dynref::error::LoadError;
use dynref::loader::{DelegationPolicy, LoaderContext};
use dynref::resolve::is_assignable;
use dynref::unit::{UnitDecl, UnitRegistry};
use proptest::prelude::*;

const POOL: usize = 6;

fn name(i: usize) -> String {
    format!("p.T{i}")
}

fn arb_policy() -> impl Strategy<Value = DelegationPolicy> {
    prop_oneof![
        Just(DelegationPolicy::ParentFirst),
        Just(DelegationPolicy::ChildFirst),
        Just(DelegationPolicy::Isolated),
    ]
}

fn registry(defined: &[bool]) -> UnitRegistry {
    UnitRegistry::from_decls(
        defined
            .iter()
            .enumerate()
            .filter(|(_, defined)| **defined)
            .map(|(i, _)| UnitDecl::class(name(i))),
    )
    .unwrap()
}

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Host,
    Local,
    Missing,
}

fn expected(policy: DelegationPolicy, has_parent: bool, in_host: bool, in_local: bool) -> Answer {
    let in_host = in_host && has_parent;
    match policy {
        DelegationPolicy::ParentFirst if in_host => Answer::Host,
        DelegationPolicy::ParentFirst | DelegationPolicy::Isolated if in_local => Answer::Local,
        DelegationPolicy::ChildFirst if in_local => Answer::Local,
        DelegationPolicy::ChildFirst if in_host => Answer::Host,
        _ => Answer::Missing,
    }
}

proptest! {
    #[test]
    fn load_answers_per_policy(
        policy in arb_policy(),
        has_parent in any::<bool>(),
        host_defs in proptest::collection::vec(any::<bool>(), POOL),
        local_defs in proptest::collection::vec(any::<bool>(), POOL),
    ) {
        let host = Arc::new(LoaderContext::new(DelegationPolicy::Isolated, None, registry(&host_defs)));
        let parent = has_parent.then(|| Arc::clone(&host));
        let child = LoaderContext::new(policy, parent, registry(&local_defs));

        for i in 0..POOL {
            let answer = match child.load_type(&name(i)) {
                Ok(found) if found.loader().id() == host.id() => Answer::Host,
                Ok(found) => {
                    prop_assert_eq!(found.loader().id(), child.id());
                    Answer::Local
                }
                Err(LoadError::ClassNotFound { .. }) => Answer::Missing,
                Err(other) => return Err(TestCaseError::fail(format!("unexpected {other}"))),
            };
            prop_assert_eq!(answer, expected(policy, has_parent, host_defs[i], local_defs[i]));
        }
    }

    #[test]
    fn assignability_follows_declared_chain(
        parents in proptest::collection::vec(proptest::option::of(0..POOL), POOL),
    ) {
        // Only point at lower indices so the chain is acyclic.
        let decls = (0..POOL).map(|i| {
            let decl = UnitDecl::class(name(i));
            match parents[i] {
                Some(p) if p < i => decl.extends(name(p)),
                _ => decl,
            }
        });
        let context = LoaderContext::new(
            DelegationPolicy::Isolated,
            None,
            UnitRegistry::from_decls(decls).unwrap(),
        );

        for from in 0..POOL {
            let mut ancestors = vec![from];
            let mut current = from;
            while let Some(p) = parents[current].filter(|p| *p < current) {
                ancestors.push(p);
                current = p;
            }

            let runtime = context.load_type(&name(from)).unwrap();
            for to in 0..POOL {
                let reference = context.load_type(&name(to)).unwrap();
                prop_assert_eq!(
                    is_assignable(runtime, reference, POOL + 1).unwrap(),
                    ancestors.contains(&to)
                );
            }
        }
    }
}
