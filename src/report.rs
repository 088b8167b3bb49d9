//! Report rendering for validation results.
//!
//! One line per evaluated rule: a pass or fail icon, the rule id, and the
//! message (which carries the offending value on failure), followed by a
//! summary line. JSON output serializes the full result for machine
//! consumers.

use anyhow::Result;
use colored::Colorize;

use crate::rules::{RuleOutcome, Severity, ValidationResult};

/// Print the human-readable report. With `quiet`, pass lines are skipped
/// and only failures plus the summary are shown.
pub fn print_human(result: &ValidationResult, quiet: bool) {
    for outcome in &result.outcomes {
        print_outcome(outcome, quiet);
    }

    let total = result.outcomes.len();
    let failed = result.outcomes.iter().filter(|o| !o.passed()).count();

    if result.passed {
        println!("\n{} {} checks passed", "✓".green(), total);
    } else {
        println!(
            "\n{} {} of {} checks failed",
            "✗".red(),
            failed,
            total
        );
    }
}

fn print_outcome(outcome: &RuleOutcome, quiet: bool) {
    match outcome.severity {
        Severity::Pass => {
            if !quiet {
                println!(
                    "{} {} {}",
                    "✓".green(),
                    outcome.rule.cyan(),
                    outcome.text.dimmed()
                );
            }
        }
        Severity::Fail => {
            println!("{} {} {}", "✗".red(), outcome.rule.cyan(), outcome.text);
        }
    }
}

/// Print the result as pretty JSON.
pub fn print_json(result: &ValidationResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
