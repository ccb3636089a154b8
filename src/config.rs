//! Harness configuration.

use smol_str::SmolStr;

use crate::loader::DEFAULT_MAX_HOPS;
use crate::payload::DEFAULT_PAYLOAD_NAME;

/// Knobs shared by every scenario a harness runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Bound on delegation hops and on supertype-chain length.
    pub max_delegation_hops: usize,
    /// Whether static members declared on interfaces can be bound as handles.
    ///
    /// Off by default: the modeled runtime cannot represent them, and
    /// resolution reports `UnsupportedStaticInterfaceDispatch`.
    pub static_interface_handles: bool,
    /// Store name of the payload scenario contexts are built from.
    pub payload_name: SmolStr,
    /// Owner id answered by host-defined bodies.
    pub host_tag: SmolStr,
    /// Owner id answered by payload-defined bodies.
    pub payload_tag: SmolStr,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_delegation_hops: DEFAULT_MAX_HOPS,
            static_interface_handles: false,
            payload_name: SmolStr::new_static(DEFAULT_PAYLOAD_NAME),
            host_tag: SmolStr::new_static("MainAPK"),
            payload_tag: SmolStr::new_static("A"),
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_delegation_hops(mut self, hops: usize) -> Self {
        self.max_delegation_hops = hops;
        self
    }

    pub fn with_static_interface_handles(mut self, enabled: bool) -> Self {
        self.static_interface_handles = enabled;
        self
    }

    pub fn with_payload_name(mut self, name: impl AsRef<str>) -> Self {
        self.payload_name = SmolStr::new(name.as_ref());
        self
    }

    pub fn with_tags(mut self, host: impl AsRef<str>, payload: impl AsRef<str>) -> Self {
        self.host_tag = SmolStr::new(host.as_ref());
        self.payload_tag = SmolStr::new(payload.as_ref());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();

        assert_eq!(config.max_delegation_hops, 32);
        assert!(!config.static_interface_handles);
        assert_eq!(config.payload_name, "a.units");
        assert_eq!(config.host_tag, "MainAPK");
        assert_eq!(config.payload_tag, "A");
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::new()
            .with_max_delegation_hops(4)
            .with_static_interface_handles(true)
            .with_payload_name("b.units")
            .with_tags("Host", "B");

        assert_eq!(config.max_delegation_hops, 4);
        assert!(config.static_interface_handles);
        assert_eq!(config.payload_name, "b.units");
        assert_eq!(config.payload_tag, "B");
    }
}
