//! The invocation adapter.

use smol_str::SmolStr;
use tracing::{debug, trace};

use super::args::{ArgValue, ArgumentVector};
use super::echo::call_body;
use super::normalize::normalize;
use super::taint::{Sink, Source};
use crate::error::InvocationError;
use crate::loader::{DEFAULT_MAX_HOPS, LoadedType};
use crate::resolve::{Receiver, ResolvedSymbol, is_assignable};

/// A constructed receiver.
#[derive(Copy, Clone, Debug)]
pub struct Instance<'a> {
    runtime: LoadedType<'a>,
}

impl<'a> Instance<'a> {
    /// Construct an instance with the zero-argument constructor.
    pub fn construct(runtime: LoadedType<'a>) -> Result<Self, InvocationError> {
        if !runtime.unit().is_constructible() {
            return Err(InvocationError::construction(format!(
                "`{}` ({}) cannot be instantiated",
                runtime.qualified_name(),
                runtime.unit().kind()
            )));
        }
        trace!(unit = %runtime.id(), name = %runtime.qualified_name(), "constructed receiver");
        Ok(Self { runtime })
    }

    pub fn runtime_type(&self) -> LoadedType<'a> {
        self.runtime
    }

    /// View this instance as `reference`, failing if the identities differ.
    pub fn cast(&self, reference: LoadedType<'_>, max_hops: usize) -> Result<(), InvocationError> {
        match is_assignable(self.runtime, reference, max_hops) {
            Ok(true) => Ok(()),
            Ok(false) => Err(InvocationError::binding(format!(
                "`{}` from {} is not a `{}` from {}",
                self.runtime.qualified_name(),
                self.runtime.loader().label(),
                reference.qualified_name(),
                reference.loader().label()
            ))),
            Err(err) => Err(InvocationError::binding(err.to_string())),
        }
    }
}

/// The outcome of a successful call.
#[derive(Clone, Debug)]
pub struct Invocation {
    /// The callee's textual result, as forwarded to the sink.
    pub result: String,
    /// The arguments as sent, sensitive value included.
    pub sent: ArgumentVector,
    /// `sent` bound to the member's signature, as the callee received it.
    pub bound: Vec<ArgValue>,
    /// The sensitive value injected for this call.
    pub sensitive: SmolStr,
}

/// Calls resolved symbols, injecting the source value and feeding the sink.
pub struct InvocationAdapter<'s> {
    source: &'s dyn Source,
    sink: &'s dyn Sink,
    max_hops: usize,
}

impl<'s> InvocationAdapter<'s> {
    pub fn new(source: &'s dyn Source, sink: &'s dyn Sink) -> Self {
        Self {
            source,
            sink,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Set the bound on supertype walks during the cast check.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Invoke `symbol` with `args`.
    pub fn invoke(&self, symbol: &ResolvedSymbol<'_>, args: &ArgumentVector) -> Result<Invocation, InvocationError> {
        let instance = symbol.receiver.map(|receiver| self.bind_receiver(receiver)).transpose()?;

        let sensitive = self.source.source();
        let sent = args.with_sensitive(&sensitive);
        let bound = normalize(&sent, symbol.member.signature())?;

        debug!(
            owner = %symbol.owner.qualified_name(),
            unit = %symbol.owner.id(),
            member = %symbol.member.key,
            receiver = instance.is_some(),
            "calling"
        );
        let result = call_body(symbol.body, &bound)?;
        self.sink.sink(&result);

        Ok(Invocation {
            result,
            sent,
            bound,
            sensitive,
        })
    }

    fn bind_receiver<'a>(&self, receiver: Receiver<'a>) -> Result<Instance<'a>, InvocationError> {
        let instance = Instance::construct(receiver.runtime)?;
        if let Some(reference) = receiver.reference {
            instance.cast(reference, self.max_hops)?;
        }
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::base::QualifiedName;
    use crate::error::InvocationPhase;
    use crate::invoke::{FixedSource, RecordingSink};
    use crate::loader::{DelegationPolicy, LoaderContext};
    use crate::resolve::{DispatchKind, SymbolRequest};
    use crate::unit::{Body, Member, MemberKind, Signature, UnitDecl, UnitRegistry};

    fn context(decls: Vec<UnitDecl>) -> LoaderContext {
        LoaderContext::new(
            DelegationPolicy::Isolated,
            None,
            UnitRegistry::from_decls(decls).unwrap(),
        )
    }

    fn request(type_name: &str, member: &str, dispatch: DispatchKind) -> SymbolRequest {
        SymbolRequest::new(type_name, member, dispatch, Signature::canonical())
    }

    #[test]
    fn test_invoke_injects_and_sinks() {
        let ctx = context(vec![
            UnitDecl::class("p.T").member(Member::transfer("run", MemberKind::Virtual, "A")),
        ]);
        let symbol = ctx
            .resolver()
            .resolve(&request("p.T", "run", DispatchKind::Virtual))
            .unwrap();
        let source = FixedSource::new("Token");
        let sink = RecordingSink::new();

        let invocation = InvocationAdapter::new(&source, &sink)
            .invoke(&symbol, &ArgumentVector::canonical())
            .unwrap();

        assert_eq!(invocation.sensitive, "Token");
        assert_eq!(invocation.bound.len(), Signature::canonical().arity());
        assert!(invocation.result.ends_with(" Token)"));
        assert_eq!(sink.last(), Some(invocation.result));
    }

    #[test]
    fn test_abstract_receiver_fails_construction() {
        let ctx = context(vec![
            UnitDecl::abstract_class("p.Base").member(Member::transfer("run", MemberKind::Virtual, "A")),
        ]);
        let symbol = ctx
            .resolver()
            .resolve(&request("p.Base", "run", DispatchKind::Virtual))
            .unwrap();
        let sink = RecordingSink::new();

        let err = InvocationAdapter::new(&FixedSource::default(), &sink)
            .invoke(&symbol, &ArgumentVector::canonical())
            .unwrap_err();

        assert_eq!(err.phase, InvocationPhase::ConstructionFailed);
        assert!(sink.received().is_empty());
    }

    #[test]
    fn test_static_call_needs_no_receiver() {
        let ctx = context(vec![
            UnitDecl::abstract_class("p.Util").member(Member::transfer("make", MemberKind::Static, "A")),
        ]);
        let symbol = ctx
            .resolver()
            .resolve(&request("p.Util", "make", DispatchKind::Static))
            .unwrap();

        let invocation = InvocationAdapter::new(&FixedSource::default(), &RecordingSink::new())
            .invoke(&symbol, &ArgumentVector::canonical())
            .unwrap();
        assert!(invocation.result.starts_with("A:"));
    }

    #[test]
    fn test_foreign_reference_fails_binding() {
        let host = Arc::new(context(vec![
            UnitDecl::interface("p.Api").member(Member::abstract_member("run", Signature::canonical())),
        ]));
        let payload = LoaderContext::new(
            DelegationPolicy::ChildFirst,
            Some(Arc::clone(&host)),
            UnitRegistry::from_decls([
                UnitDecl::interface("p.Api").member(Member::abstract_member("run", Signature::canonical())),
                UnitDecl::class("p.Impl")
                    .implements("p.Api")
                    .member(Member::transfer("run", MemberKind::Virtual, "A")),
            ])
            .unwrap(),
        );
        let symbol = payload
            .resolver()
            .with_caller(&host)
            .resolve(&request(
                "p.Impl",
                "run",
                DispatchKind::Factory {
                    via: QualifiedName::new("p.Api"),
                },
            ))
            .unwrap();

        let err = InvocationAdapter::new(&FixedSource::default(), &RecordingSink::new())
            .invoke(&symbol, &ArgumentVector::canonical())
            .unwrap_err();
        assert_eq!(err.phase, InvocationPhase::BindingFailed);
    }

    #[test]
    fn test_raising_body() {
        let ctx = context(vec![UnitDecl::class("p.T").member(Member::new(
            "run",
            MemberKind::Virtual,
            Signature::canonical(),
            Some(Body::Raise {
                message: "boom".into(),
            }),
        ))]);
        let symbol = ctx
            .resolver()
            .resolve(&request("p.T", "run", DispatchKind::Virtual))
            .unwrap();
        let sink = RecordingSink::new();

        let err = InvocationAdapter::new(&FixedSource::default(), &sink)
            .invoke(&symbol, &ArgumentVector::canonical())
            .unwrap_err();
        assert_eq!(err.phase, InvocationPhase::CallRaised);
        assert!(sink.received().is_empty());
    }
}
