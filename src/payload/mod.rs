//! Code payloads: the serialized form of unit definitions.
//!
//! A payload is UTF-8 text in a small declarative format (see `units.pest`).
//! Payloads reach a loader as raw bytes, as a file path, or already parsed,
//! and are always decoded before any scenario starts resolving.

mod bundled;
mod cache;
mod parser;
mod store;

pub use bundled::{A_UNITS, DEFAULT_PAYLOAD_NAME, HOST_PAYLOAD_NAME, HOST_UNITS, PACKAGE};
pub use cache::{PayloadCache, read_and_parse};
pub use parser::{parse_payload_bytes, parse_units};
pub use store::{DirPayloadStore, MemoryPayloadStore, PayloadStore};
