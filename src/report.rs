//! Aggregation and rendering of a finished run.

use crate::core::types::CheckResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
}

impl Summary {
    /// Pure fold over the ordered record sequence.
    pub fn from_results(results: &[CheckResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        let success_rate = if total == 0 {
            100.0
        } else {
            (passed as f64 / total as f64) * 100.0
        };
        Self {
            total,
            passed,
            failed,
            success_rate,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// 0 when every record passed, 1 otherwise.
pub fn exit_code(results: &[CheckResult]) -> i32 {
    if results.iter().all(|r| r.passed) {
        0
    } else {
        1
    }
}

/// Print the final summary: failures first with their diagnostics, then the
/// passing checks, then the totals.
pub fn print_summary(results: &[CheckResult], verbose: bool) {
    let summary = Summary::from_results(results);

    println!();
    println!("{}", "=".repeat(80));
    println!("VALIDATION SUMMARY");
    println!("{}", "=".repeat(80));
    println!();

    let failed: Vec<&CheckResult> = results.iter().filter(|r| !r.passed).collect();
    let passed: Vec<&CheckResult> = results.iter().filter(|r| r.passed).collect();

    if !failed.is_empty() {
        println!("FAILED:");
        for result in &failed {
            println!("  ❌ {}: {}", result.name, result.message);
            if let Some(details) = &result.details {
                println!("     Details: {}", truncate(details, 200));
            }
        }
        println!();
    }

    if !passed.is_empty() {
        println!("PASSED:");
        for result in &passed {
            println!("  ✅ {}: {}", result.name, result.message);
            if verbose {
                if let Some(details) = &result.details {
                    println!("     {}", truncate(details, 200));
                }
            }
        }
        println!();
    }

    println!("{}", "=".repeat(80));
    println!("Total Checks: {}", summary.total);
    println!("Passed: {}", summary.passed);
    println!("Failed: {}", summary.failed);
    println!("Success Rate: {:.1}%", summary.success_rate);
    if summary.all_passed() {
        println!("ALL CHECKS PASSED ({}/{})", summary.passed, summary.total);
    } else {
        println!(
            "SOME CHECKS FAILED ({}/{} passed, {} failed)",
            summary.passed, summary.total, summary.failed
        );
    }
    println!("{}", "=".repeat(80));
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, passed: bool) -> CheckResult {
        if passed {
            CheckResult::pass(name, "ok")
        } else {
            CheckResult::fail(name, "bad")
        }
    }

    #[test]
    fn test_summary_counts_match_record_count() {
        let results = vec![
            record("a", true),
            record("b", false),
            record("c", true),
            record("d", false),
            record("e", true),
        ];
        let summary = Summary::from_results(&results);
        assert_eq!(summary.total, results.len());
        assert_eq!(summary.passed + summary.failed, summary.total);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 2);
        assert!((summary.success_rate - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_exit_code_all_pass() {
        let results = vec![record("a", true), record("b", true), record("c", true)];
        assert_eq!(exit_code(&results), 0);
    }

    #[test]
    fn test_exit_code_one_fail_among_many() {
        let results = vec![
            record("a", true),
            record("b", true),
            record("c", false),
            record("d", true),
        ];
        assert_eq!(exit_code(&results), 1);
    }

    #[test]
    fn test_empty_run_summary() {
        let summary = Summary::from_results(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.all_passed());
        assert_eq!(exit_code(&[]), 0);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "aé".repeat(200);
        let cut = truncate(&text, 201);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 204);
    }
}
