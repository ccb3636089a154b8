//! Reporting scenario outcomes.

use super::result::{ScenarioResult, ScenarioStatus};

/// Receives each scenario result as soon as it completes.
pub trait ScenarioReporter {
    fn report(&mut self, result: &ScenarioResult);
}

impl<F> ScenarioReporter for F
where
    F: FnMut(&ScenarioResult),
{
    fn report(&mut self, result: &ScenarioResult) {
        self(result)
    }
}

/// Collects every result of a matrix run.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ScenarioReport {
    pub results: Vec<ScenarioResult>,
}

/// Counts per status.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub mismatched: usize,
    pub resolution_failures: usize,
    pub invocation_failures: usize,
}

impl ScenarioReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.results.len(),
            ..ReportSummary::default()
        };
        for result in &self.results {
            match result.status {
                ScenarioStatus::Passed => summary.passed += 1,
                ScenarioStatus::Mismatch => summary.mismatched += 1,
                ScenarioStatus::ResolutionFailure => summary.resolution_failures += 1,
                ScenarioStatus::InvocationFailure => summary.invocation_failures += 1,
            }
        }
        summary
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(ScenarioResult::passed)
    }

    /// Results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|result| !result.passed())
    }

    /// One line per failure: `<config>: <status> [<code>] <message>`.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failures()
            .map(|result| match &result.failure {
                Some(failure) => format!(
                    "{}: {} [{}] {}",
                    result.config, result.status, failure.code, failure.message
                ),
                None => format!("{}: {}", result.config, result.status),
            })
            .collect()
    }

    /// Serialize the report, summary first.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&serde_json::json!({
            "summary": self.summary(),
            "results": self.results,
        }))
    }
}

impl ScenarioReporter for ScenarioReport {
    fn report(&mut self, result: &ScenarioResult) {
        self.results.push(result.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use crate::loader::LoaderKind;
    use crate::scenario::{Failure, ScenarioConfig, ScenarioDispatch, ScenarioState};

    fn result(status: ScenarioStatus, failure: Option<HarnessError>) -> ScenarioResult {
        ScenarioResult {
            config: ScenarioConfig::new(LoaderKind::ByteBuffer, false, true, ScenarioDispatch::Virtual),
            expected_owner: "A".into(),
            actual_owner: None,
            arguments_matched: false,
            status,
            failure: failure.map(Failure::from),
            trace: vec![ScenarioState::Configured],
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut report = ScenarioReport::new();
        report.report(&result(ScenarioStatus::Passed, None));
        report.report(&result(ScenarioStatus::Mismatch, Some(HarnessError::TaintLost)));
        report.report(&result(ScenarioStatus::Passed, None));

        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.mismatched, 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_failure_lines_carry_codes() {
        let mut report = ScenarioReport::new();
        report.report(&result(ScenarioStatus::Mismatch, Some(HarnessError::TaintLost)));

        assert_eq!(
            report.failure_lines(),
            ["byte-buffer-based/no-collision/parent/virtual: mismatch [DR0042] sink never received the sensitive value"]
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_json() {
        let mut report = ScenarioReport::new();
        report.report(&result(ScenarioStatus::Passed, None));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"passed\": 1"));
        assert!(json.contains("\"byte-buffer-based\""));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_json_writes_failure_code_and_message() {
        let mut report = ScenarioReport::new();
        report.report(&result(ScenarioStatus::Mismatch, Some(HarnessError::TaintLost)));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let failure = &json["results"][0]["failure"];
        assert_eq!(failure["code"], "DR0042");
        assert_eq!(failure["message"], "sink never received the sensitive value");
        assert!(failure.get("error").is_none());
        assert_eq!(json["summary"]["mismatched"], 1);
    }
}
