//! The scenario driver.

use std::sync::Arc;

use smol_str::SmolStr;
use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, PayloadError};
use crate::invoke::{ArgumentVector, FixedSource, InvocationAdapter, Sink, Source, TracingSink};
use crate::loader::{LoaderContext, LoaderKind, PayloadSource, host_context};
use crate::payload::{HOST_PAYLOAD_NAME, PayloadCache, PayloadStore};

use super::config::ScenarioConfig;
use super::oracle::{Verdict, expected_owner};
use super::plan::ScenarioPlan;
use super::report::ScenarioReporter;
use super::result::{Failure, ScenarioResult, ScenarioState, ScenarioStatus};

/// Runs scenarios against one host context and one payload store.
///
/// The host context is built once and shared read-only; every scenario
/// builds, resolves and invokes through a fresh context of its own.
pub struct Harness<S> {
    config: HarnessConfig,
    host: Arc<LoaderContext>,
    store: S,
    cache: PayloadCache,
    source: Arc<dyn Source>,
    sink: Arc<dyn Sink>,
}

impl<S: PayloadStore> Harness<S> {
    /// Build a harness whose host units come from the store's host payload.
    pub fn new(store: S, config: HarnessConfig) -> Result<Self, PayloadError> {
        let bytes = store.load_payload_bytes(HOST_PAYLOAD_NAME)?;
        let host = host_context(PayloadSource::Bytes(bytes.into()), &config)?;
        Ok(Self::with_host(store, host, config))
    }

    /// Build a harness around an existing host context.
    pub fn with_host(store: S, host: Arc<LoaderContext>, config: HarnessConfig) -> Self {
        Self {
            config,
            host,
            store,
            cache: PayloadCache::new(),
            source: Arc::new(FixedSource::default()),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn Source>) -> Self {
        self.source = source;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn host(&self) -> &Arc<LoaderContext> {
        &self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &PayloadCache {
        &self.cache
    }

    /// Build the scenario context `config` asks for.
    pub fn build_loader(&self, config: &ScenarioConfig) -> Result<LoaderContext, PayloadError> {
        let name = self.config.payload_name.as_str();
        let source = match config.loader_kind {
            LoaderKind::ByteBuffer => PayloadSource::Bytes(self.store.load_payload_bytes(name)?.into()),
            LoaderKind::PathCached => PayloadSource::Path {
                path: self.store.payload_path(name)?,
                cached: true,
            },
            LoaderKind::PathUncached | LoaderKind::DelegateLast => PayloadSource::Path {
                path: self.store.payload_path(name)?,
                cached: false,
            },
        };
        let parent = config.has_parent.then(|| Arc::clone(&self.host));

        let context = LoaderContext::from_source(config.loader_kind.policy(), parent, source, &self.cache)?
            .with_label(config.loader_kind.as_str())
            .with_max_hops(self.config.max_delegation_hops);
        Ok(context)
    }

    /// Run one scenario to completion. Never panics on a failing scenario.
    pub fn run_scenario(&self, config: ScenarioConfig) -> ScenarioResult {
        let plan = ScenarioPlan::for_config(&config);
        let expected = expected_owner(&config, &plan.answering, self.host.local_units(), &self.config);

        let mut run = Run::new(config);
        let outcome = self.drive(&plan, &expected, &mut run);
        run.finish(expected, outcome)
    }

    /// Run every scenario in order, reporting each result as it completes.
    pub fn run_matrix<I, R>(&self, configs: I, reporter: &mut R) -> Vec<ScenarioResult>
    where
        I: IntoIterator<Item = ScenarioConfig>,
        R: ScenarioReporter + ?Sized,
    {
        configs
            .into_iter()
            .map(|config| {
                let result = self.run_scenario(config);
                reporter.report(&result);
                result
            })
            .collect()
    }

    fn drive(&self, plan: &ScenarioPlan, expected: &str, run: &mut Run) -> Result<(), HarnessError> {
        let context = self.build_loader(&run.config)?;
        run.advance(ScenarioState::LoaderBuilt);

        let symbol = context
            .resolver()
            .with_caller(&self.host)
            .with_static_interface_handles(self.config.static_interface_handles)
            .with_max_hops(self.config.max_delegation_hops)
            .resolve(&plan.request)?;
        debug!(
            owner = %symbol.owner.qualified_name(),
            unit = %symbol.owner.id(),
            origin = %symbol.origin,
            "resolved"
        );
        run.advance(ScenarioState::Resolved);

        let invocation = InvocationAdapter::new(self.source.as_ref(), self.sink.as_ref())
            .with_max_hops(self.config.max_delegation_hops)
            .invoke(&symbol, &ArgumentVector::canonical())?;
        run.advance(ScenarioState::Invoked);

        let verdict = Verdict::of(&invocation, symbol.member.signature());
        run.actual_owner = verdict.actual_owner.clone();
        run.arguments_matched = verdict.arguments_matched();
        verdict.check(expected)?;
        run.advance(ScenarioState::Verified);
        Ok(())
    }
}

/// Mutable bookkeeping for one scenario run.
struct Run {
    config: ScenarioConfig,
    trace: Vec<ScenarioState>,
    actual_owner: Option<SmolStr>,
    arguments_matched: bool,
}

impl Run {
    fn new(config: ScenarioConfig) -> Self {
        debug!(scenario = %config, "configured");
        Self {
            config,
            trace: vec![ScenarioState::Configured],
            actual_owner: None,
            arguments_matched: false,
        }
    }

    fn advance(&mut self, state: ScenarioState) {
        debug!(scenario = %self.config, state = %state, "transition");
        self.trace.push(state);
    }

    fn finish(mut self, expected: SmolStr, outcome: Result<(), HarnessError>) -> ScenarioResult {
        let (status, failure) = match outcome {
            Ok(()) => {
                info!(scenario = %self.config, owner = %expected, "passed");
                self.advance(ScenarioState::Passed);
                (ScenarioStatus::Passed, None)
            }
            Err(err) => {
                let status = err.status();
                let failure = Failure::from(err);
                warn!(
                    scenario = %self.config,
                    status = %status,
                    code = failure.code,
                    "failed: {}",
                    failure.message
                );
                self.advance(ScenarioState::Failed {
                    status,
                    code: failure.code,
                });
                (status, Some(failure))
            }
        };

        ScenarioResult {
            config: self.config,
            expected_owner: expected,
            actual_owner: self.actual_owner,
            arguments_matched: self.arguments_matched,
            status,
            failure,
            trace: self.trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::RecordingSink;
    use crate::payload::MemoryPayloadStore;
    use crate::scenario::ScenarioDispatch;

    fn harness() -> Harness<MemoryPayloadStore> {
        Harness::new(MemoryPayloadStore::bundled(), HarnessConfig::default()).unwrap()
    }

    #[test]
    fn test_byte_buffer_virtual_passes() {
        let sink = Arc::new(RecordingSink::new());
        let harness = harness().with_sink(sink.clone());

        let result = harness.run_scenario(ScenarioConfig::new(
            LoaderKind::ByteBuffer,
            false,
            true,
            ScenarioDispatch::Virtual,
        ));

        assert_eq!(result.status, ScenarioStatus::Passed, "{:?}", result.failure);
        assert_eq!(result.expected_owner, "A");
        assert_eq!(result.actual_owner.as_deref(), Some("A"));
        assert!(result.arguments_matched);
        assert!(sink.saw("Secret"));
        assert_eq!(
            result.trace,
            [
                ScenarioState::Configured,
                ScenarioState::LoaderBuilt,
                ScenarioState::Resolved,
                ScenarioState::Invoked,
                ScenarioState::Verified,
                ScenarioState::Passed,
            ]
        );
    }

    #[test]
    fn test_collision_parent_first_answers_from_host() {
        let result = harness().run_scenario(ScenarioConfig::new(
            LoaderKind::ByteBuffer,
            true,
            true,
            ScenarioDispatch::Static,
        ));

        assert!(result.passed(), "{:?}", result.failure);
        assert_eq!(result.actual_owner.as_deref(), Some("MainAPK"));
    }

    #[test]
    fn test_path_kinds_fail_on_memory_store() {
        let result = harness().run_scenario(ScenarioConfig::new(
            LoaderKind::PathCached,
            false,
            true,
            ScenarioDispatch::Virtual,
        ));

        assert_eq!(result.status, ScenarioStatus::ResolutionFailure);
        assert_eq!(result.code(), Some(crate::error::codes::PAYLOAD));
        assert_eq!(
            result.trace.last(),
            Some(&ScenarioState::Failed {
                status: ScenarioStatus::ResolutionFailure,
                code: crate::error::codes::PAYLOAD,
            })
        );
    }

    #[test]
    fn test_interface_static_is_an_accepted_failure() {
        let result = harness().run_scenario(ScenarioConfig::new(
            LoaderKind::ByteBuffer,
            true,
            true,
            ScenarioDispatch::InterfaceStatic,
        ));

        assert_eq!(result.status, ScenarioStatus::ResolutionFailure);
        assert_eq!(result.code(), Some(crate::error::codes::UNSUPPORTED_STATIC_INTERFACE));
    }

    #[test]
    fn test_factory_without_parent_fails_binding() {
        let result = harness().run_scenario(ScenarioConfig::new(
            LoaderKind::ByteBuffer,
            false,
            false,
            ScenarioDispatch::FactoryInterface,
        ));

        assert_eq!(result.status, ScenarioStatus::InvocationFailure);
        assert_eq!(result.code(), Some(crate::error::codes::BINDING_FAILED));
    }

    #[test]
    fn test_run_matrix_continues_after_failures() {
        let configs = [
            ScenarioConfig::new(LoaderKind::PathCached, false, true, ScenarioDispatch::Virtual),
            ScenarioConfig::new(LoaderKind::ByteBuffer, false, true, ScenarioDispatch::Virtual),
        ];
        let mut seen = Vec::new();
        let results = harness().run_matrix(configs, &mut |result: &ScenarioResult| seen.push(result.status));

        assert_eq!(results.len(), 2);
        assert_eq!(seen, [ScenarioStatus::ResolutionFailure, ScenarioStatus::Passed]);
    }
}
