//! Outcome Reporter
//!
//! Every invocation ends in exactly one [`TransferOutcome`], rendered as a
//! marker line followed by either the pretty-printed response body or the
//! failure diagnostic.

use serde_json::Value;
use std::io::Write;
use tracing::error;

pub const SUCCESS_MARKER: &str = "[VAULT] Transfer executed:";
pub const FAILURE_MARKER: &str = "[VAULT] Transfer failed ❌";
pub const DRY_RUN_MARKER: &str = "[VAULT] Dry run, nothing sent:";

#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// Parsed 2xx response body
    Success(Value),
    /// Diagnostic text, verbatim from the failing stage
    Failure(String),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success(_))
    }

    /// Success carrying the echo of a dry-run transport
    pub fn is_dry_run(&self) -> bool {
        match self {
            TransferOutcome::Success(body) => body.get("dry_run") == Some(&Value::Bool(true)),
            TransferOutcome::Failure(_) => false,
        }
    }

    pub fn render(&self) -> String {
        match self {
            TransferOutcome::Success(body) => {
                let marker = if self.is_dry_run() { DRY_RUN_MARKER } else { SUCCESS_MARKER };
                // Serializing a Value cannot fail: map keys are always strings
                let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
                format!("{}\n{}", marker, pretty)
            }
            TransferOutcome::Failure(diagnostic) => format!("{}\n{}", FAILURE_MARKER, diagnostic),
        }
    }

    /// Write the rendering to `out`. Write failures are logged, never raised.
    pub fn report<W: Write>(&self, out: &mut W) {
        let result = writeln!(out, "{}", self.render()).and_then(|_| out.flush());
        if let Err(e) = result {
            error!(error = %e, "Failed to write outcome");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;

    fn body_of(rendered: &str) -> &str {
        rendered.split_once('\n').map(|(_, rest)| rest).unwrap()
    }

    #[test]
    fn test_success_rendering_reparses_to_same_value() {
        let body = json!({
            "data": {
                "id": "tx_1",
                "amount": {"amount": "-500.00", "currency": "USDC"},
                "network": {"status": "pending", "hash": null},
                "tags": [1, 2.5, "three"]
            }
        });
        let rendered = TransferOutcome::Success(body.clone()).render();

        assert!(rendered.starts_with(SUCCESS_MARKER));
        let reparsed: Value = serde_json::from_str(body_of(&rendered)).unwrap();
        assert_eq!(reparsed, body);
    }

    #[test]
    fn test_success_uses_two_space_indent() {
        let rendered = TransferOutcome::Success(json!({"id": "tx_1", "status": "complete"})).render();
        assert_eq!(
            rendered,
            "[VAULT] Transfer executed:\n{\n  \"id\": \"tx_1\",\n  \"status\": \"complete\"\n}"
        );
        assert!(rendered.contains("\"status\": \"complete\""));
    }

    #[test]
    fn test_dry_run_echo_is_not_reported_as_executed() {
        let echo = json!({"dry_run": true, "method": "POST", "body": {"idem": "run-1"}});
        let outcome = TransferOutcome::Success(echo.clone());

        assert!(outcome.is_dry_run());
        let rendered = outcome.render();
        assert!(rendered.starts_with(DRY_RUN_MARKER));
        assert!(!rendered.contains(SUCCESS_MARKER));
        let reparsed: Value = serde_json::from_str(body_of(&rendered)).unwrap();
        assert_eq!(reparsed, echo);

        assert!(!TransferOutcome::Success(json!({"dry_run": false})).is_dry_run());
        assert!(!TransferOutcome::Failure("x".into()).is_dry_run());
    }

    #[test]
    fn test_failure_keeps_diagnostic_verbatim() {
        let diagnostic = "Remote API returned HTTP 400: {\"message\":\"bad\"}";
        let rendered = TransferOutcome::Failure(diagnostic.to_string()).render();
        assert_eq!(rendered, format!("{}\n{}", FAILURE_MARKER, diagnostic));
        assert!(!rendered.contains(SUCCESS_MARKER));
    }

    #[test]
    fn test_report_writes_rendering() {
        let mut out = Vec::new();
        TransferOutcome::Failure("boom".into()).report(&mut out);
        assert_eq!(String::from_utf8(out).unwrap(), "[VAULT] Transfer failed ❌\nboom\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_report_swallows_write_errors() {
        TransferOutcome::Success(json!({})).report(&mut BrokenPipe);
    }
}
