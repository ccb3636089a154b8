//! Payloads embedded in the crate.

/// Store name of the host namespace's units.
pub const HOST_PAYLOAD_NAME: &str = "host.units";

/// Store name of the dynamically loaded payload.
pub const DEFAULT_PAYLOAD_NAME: &str = "a.units";

/// Package every bundled unit lives in.
pub const PACKAGE: &str = "com.example.theseus.dynandref";

/// Host units. Every body answers with `MainAPK`.
pub const HOST_UNITS: &str = include_str!("../../payloads/host.units");

/// Payload units. Every body answers with `A`.
pub const A_UNITS: &str = include_str!("../../payloads/a.units");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::parse_units;
    use crate::unit::UnitRegistry;

    #[test]
    fn test_bundled_payloads_parse_and_register() {
        let host = UnitRegistry::from_decls(parse_units(HOST_UNITS).unwrap()).unwrap();
        let payload = UnitRegistry::from_decls(parse_units(A_UNITS).unwrap()).unwrap();

        let collider = format!("{PACKAGE}.Collider");
        assert!(host.contains(&collider));
        assert!(payload.contains(&collider));

        let reflectee = format!("{PACKAGE}.AReflectee");
        assert!(!host.contains(&reflectee));
        assert!(payload.contains(&reflectee));
    }
}
