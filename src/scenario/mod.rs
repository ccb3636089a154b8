//! Scenarios: the matrix of loader, collision, parent and dispatch choices.
//!
//! Each scenario is a single deterministic attempt:
//!
//! ```text
//! Configured → LoaderBuilt → Resolved → Invoked → Verified → Passed
//!      └────────────┴────────────┴──────────┴─────────┴──→ Failed { status, code }
//! ```
//!
//! Any component error moves the scenario straight to `Failed`. A failed
//! scenario never aborts a matrix run.

mod config;
mod driver;
mod matrix;
mod oracle;
mod plan;
mod report;
mod result;

pub use config::{ScenarioConfig, ScenarioDispatch};
pub use driver::Harness;
pub use matrix::ScenarioMatrix;
pub use oracle::{Verdict, expected_owner};
pub use plan::{COLLIDING, FACTORY_INTERFACE, FACTORY_SUPERTYPE, PAYLOAD_ONLY, ScenarioPlan, Targets};
pub use report::{ReportSummary, ScenarioReport, ScenarioReporter};
pub use result::{Failure, ScenarioResult, ScenarioState, ScenarioStatus};
