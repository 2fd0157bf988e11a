//! Best-effort static extraction of planned step titles from test sources.
//!
//! The scanner walks the test file line by line, finds the declaration of the
//! target test by title, then collects `test.step("...")` titles while a brace
//! counter says it is still inside that test's body. Braces inside strings or
//! comments can mis-align the counter; this is an accepted limitation of the
//! heuristic, which is why it lives behind the `PlannedStepSource` trait and
//! any failure degrades to an empty list.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use tracing::warn;

/// Source of the full intended step list for a test
pub trait PlannedStepSource: Send + Sync {
    /// Ordered planned step titles for `test_title` declared in `source`.
    /// Best-effort: unreadable or unparsable input yields an empty list.
    fn planned_steps(&self, source: &Path, test_title: &str) -> Vec<String>;
}

/// Brace-counting text scanner over runner test files
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceScanner;

impl SourceScanner {
    /// Create a scanner
    pub fn new() -> Self {
        Self
    }
}

impl PlannedStepSource for SourceScanner {
    fn planned_steps(&self, source: &Path, test_title: &str) -> Vec<String> {
        let src = match fs::read_to_string(source) {
            Ok(src) => src,
            Err(err) => {
                warn!(path = %source.display(), error = %err, "planned-step scan skipped");
                return Vec::new();
            }
        };
        scan_planned_steps(&src, test_title)
    }
}

/// A planned-step source that always returns nothing (location unknown)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlannedSteps;

impl PlannedStepSource for NoPlannedSteps {
    fn planned_steps(&self, _source: &Path, _test_title: &str) -> Vec<String> {
        Vec::new()
    }
}

fn test_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Quote styles spelled out as alternation; the regex crate has no
    // backreferences to pair the closing quote with the opening one.
    RE.get_or_init(|| {
        Regex::new(
            r#"\btest(?:\.only|\.skip|\.fixme)?\s*\(\s*(?:"([^"]+)"|'([^']+)'|`([^`]+)`)\s*,"#,
        )
        .expect("test declaration pattern")
    })
}

fn step_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"\b(?:await\s+)?test\.step\s*\(\s*(?:"([^"]+)"|'([^']+)'|`([^`]+)`)\s*,"#,
        )
        .expect("step declaration pattern")
    })
}

fn quoted_title(captures: &regex::Captures<'_>) -> Option<String> {
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))
        .map(|m| m.as_str().to_string())
}

fn brace_delta(line: &str) -> i32 {
    let opens = line.matches('{').count() as i32;
    let closes = line.matches('}').count() as i32;
    opens - closes
}

/// Scan source text for step titles declared inside the named test
pub fn scan_planned_steps(src: &str, test_title: &str) -> Vec<String> {
    let mut steps: Vec<String> = Vec::new();
    let mut inside_target = false;
    let mut brace_count: i32 = 0;
    let mut test_start_line: usize = 0;

    for (line_no, line) in src.lines().enumerate() {
        if let Some(captures) = test_decl_regex().captures(line) {
            let found_title = match quoted_title(&captures) {
                Some(title) => title,
                None => continue,
            };

            if found_title == test_title {
                // Re-entering the target declaration restarts the collection
                inside_target = true;
                steps.clear();
                test_start_line = line_no;
                brace_count = brace_delta(line);
            } else {
                inside_target = false;
                brace_count = 0;
            }
            continue;
        }

        if inside_target {
            brace_count += brace_delta(line);
            if brace_count <= 0 && line_no > test_start_line {
                break;
            }
            if let Some(captures) = step_decl_regex().captures(line) {
                if let Some(title) = quoted_title(&captures) {
                    steps.push(title);
                }
            }
        }
    }

    steps
}
