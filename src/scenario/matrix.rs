//! Enumerating scenario configurations.

use crate::config::HarnessConfig;
use crate::loader::LoaderKind;

use super::config::{ScenarioConfig, ScenarioDispatch};
use super::result::ScenarioStatus;

/// The loader-kind × collision × parent × dispatch matrix.
pub struct ScenarioMatrix;

impl ScenarioMatrix {
    /// Every configuration, loader kind outermost.
    pub fn full() -> Vec<ScenarioConfig> {
        let mut configs = Vec::with_capacity(LoaderKind::ALL.len() * 4 * ScenarioDispatch::ALL.len());
        for loader_kind in LoaderKind::ALL {
            for collision in [false, true] {
                for has_parent in [true, false] {
                    for dispatch in ScenarioDispatch::ALL {
                        configs.push(ScenarioConfig::new(loader_kind, collision, has_parent, dispatch));
                    }
                }
            }
        }
        configs
    }

    /// The configurations expected to pass under `harness`.
    pub fn supported(harness: &HarnessConfig) -> Vec<ScenarioConfig> {
        Self::full()
            .into_iter()
            .filter(|config| Self::is_supported(config, harness))
            .collect()
    }

    /// Whether `config` can pass.
    ///
    /// Factory calls need the payload's supertypes to be the host's own, so
    /// they need a parent consulted first. Interface-static calls need
    /// static interface handles.
    pub fn is_supported(config: &ScenarioConfig, harness: &HarnessConfig) -> bool {
        Self::expected_status(config, harness) == ScenarioStatus::Passed
    }

    /// The status a conforming resolver produces for `config`.
    pub fn expected_status(config: &ScenarioConfig, harness: &HarnessConfig) -> ScenarioStatus {
        if config.dispatch.is_factory()
            && (!config.has_parent || config.loader_kind == LoaderKind::DelegateLast)
        {
            return ScenarioStatus::InvocationFailure;
        }
        if config.dispatch == ScenarioDispatch::InterfaceStatic && !harness.static_interface_handles {
            return ScenarioStatus::ResolutionFailure;
        }
        ScenarioStatus::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_matrix_size() {
        let full = ScenarioMatrix::full();
        assert_eq!(full.len(), 4 * 2 * 2 * 8);

        let mut unique = full.clone();
        unique.sort_by_key(|config| config.to_string());
        unique.dedup();
        assert_eq!(unique.len(), full.len());
    }

    #[test]
    fn test_supported_excludes_known_failures() {
        let harness = HarnessConfig::default();
        let supported = ScenarioMatrix::supported(&harness);

        // 16 factory configs without a parent, 4 under delegate-last with one,
        // 16 interface-static.
        assert_eq!(supported.len(), 128 - 16 - 4 - 16);
        assert!(supported.iter().all(|c| c.dispatch != ScenarioDispatch::InterfaceStatic));
    }

    #[test]
    fn test_static_interface_handles_widen_support() {
        let harness = HarnessConfig::default().with_static_interface_handles(true);
        let supported = ScenarioMatrix::supported(&harness);

        assert_eq!(supported.len(), 128 - 20);
    }
}
