//! Human-readable console summary of a run document.
//!
//! Purely presentational: renders per-test, per-step details and an aggregate
//! tally. Rendering is separated from printing so it can be asserted on.

use crate::report::types::{StepStatus, TestRecord, TestRun};

/// Maximum stack-trace lines shown per failed step
const MAX_STACK_LINES: usize = 3;

/// Print the run summary to stdout
pub fn print_test_run(run: &TestRun) {
    println!("{}", render_test_run(run));
}

/// Render the full run summary as a string
pub fn render_test_run(run: &TestRun) -> String {
    let mut out = String::new();
    out.push_str("\n=== Test results ===\n");

    for test in &run.tests {
        render_test(&mut out, test);
    }

    render_tally(&mut out, run);
    out
}

fn render_test(out: &mut String, test: &TestRecord) {
    let key = test.key.as_deref().unwrap_or("(no key)");
    out.push_str(&format!("\n{}: {} [{}]\n", key, test.title, test.project_name));

    if test.steps.is_empty() {
        out.push_str("  Steps: none\n");
        return;
    }

    let executed = test
        .steps
        .iter()
        .filter(|s| s.status != StepStatus::InProgress)
        .count();
    out.push_str(&format!("  Steps ({}/{}):\n", executed, test.steps.len()));

    for (index, step) in test.steps.iter().enumerate() {
        let marker = match step.status {
            StepStatus::Passed => "passed - ✅",
            StepStatus::Failed => "failed - ❌",
            StepStatus::InProgress => "not executed - ⏭️",
        };
        out.push_str(&format!("    {}. {}\n", index + 1, step.title));

        if let Some(error) = &step.error {
            out.push_str(&format!("       ❌ Error: {}\n", error.message));
            if let Some(stack) = &error.stack {
                for line in stack.lines().take(MAX_STACK_LINES) {
                    out.push_str(&format!("          {}\n", line));
                }
            }
        }

        for attachment in &step.attachments {
            let (emoji, display) = if attachment.is_error_artifact {
                ("💥", attachment.file_name.as_str())
            } else if attachment.media_type == "image/png" {
                ("📸", attachment.file_name.as_str())
            } else {
                ("📄", attachment.file_name.as_str())
            };
            out.push_str(&format!("       {} {}\n", emoji, display));
            if attachment.media_type == "text/plain" {
                if let Some(body) = &attachment.payload {
                    out.push_str(&format!("         {}\n", body));
                }
            }
        }

        out.push_str(&format!("       Status: {}\n\n", marker));
    }
}

fn render_tally(out: &mut String, run: &TestRun) {
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut unfinished = 0usize;

    for test in &run.tests {
        if test.steps.iter().any(|s| s.status == StepStatus::Failed) {
            failed += 1;
        } else if test.steps.iter().any(|s| s.status == StepStatus::InProgress) {
            unfinished += 1;
        } else {
            passed += 1;
        }
    }

    out.push_str(&format!(
        "=== {} tests: {} passed, {} failed, {} unfinished ===\n",
        run.tests.len(),
        passed,
        failed,
        unfinished
    ));
}
