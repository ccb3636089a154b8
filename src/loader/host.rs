//! The process-wide host context.

use std::sync::Arc;

use tracing::debug;

use super::{DelegationPolicy, LoaderContext, PayloadSource};
use crate::config::HarnessConfig;
use crate::error::PayloadError;
use crate::payload::{HOST_UNITS, PayloadCache};

/// Build the host context from `source`.
///
/// The host is the root namespace: it has no parent and searches only its
/// own units. It is immutable once built and meant to be shared, read-only,
/// as the parent of every scenario context.
pub fn host_context(
    source: PayloadSource,
    config: &HarnessConfig,
) -> Result<Arc<LoaderContext>, PayloadError> {
    let host = LoaderContext::from_source(DelegationPolicy::Isolated, None, source, &PayloadCache::new())?
        .with_label("host")
        .with_max_hops(config.max_delegation_hops);
    debug!(loader = %host.id(), units = host.local_units().len(), "host context ready");
    Ok(Arc::new(host))
}

/// Build the host context from the bundled host units.
pub fn bundled_host_context(config: &HarnessConfig) -> Result<Arc<LoaderContext>, PayloadError> {
    host_context(PayloadSource::Bytes(Arc::from(HOST_UNITS.as_bytes())), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PACKAGE;

    #[test]
    fn test_bundled_host() {
        let host = bundled_host_context(&HarnessConfig::default()).unwrap();

        assert_eq!(host.label(), "host");
        assert!(host.parent().is_none());
        assert!(host.load_type(&format!("{PACKAGE}.Collider")).is_ok());
        assert!(host.load_type(&format!("{PACKAGE}.AReflectee")).is_err());
    }
}
