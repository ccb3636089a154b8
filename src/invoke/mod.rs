//! Invocation: calling a resolved symbol with an argument vector.
//!
//! A call runs in three phases, each with its own failure kind:
//!
//! 1. **construction** - build the receiver, if the dispatch needs one
//! 2. **binding** - view the receiver through the caller's reference type,
//!    inject the sensitive value, normalize arguments to the signature
//! 3. **call** - run the body; its result is forwarded to the sink

mod adapter;
mod args;
mod echo;
mod normalize;
mod taint;

pub use adapter::{Instance, Invocation, InvocationAdapter};
pub use args::{ArgValue, ArgumentVector, CANONICAL_VARARGS, SENSITIVE_SLOT};
pub use echo::{Echo, call_body, echo_text, owner_of, render_transfer};
pub use normalize::normalize;
pub use taint::{DEFAULT_SENSITIVE_VALUE, FixedSource, RecordingSink, Sink, Source, TracingSink};
