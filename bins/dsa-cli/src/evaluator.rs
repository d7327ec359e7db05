// Output normalization and comparison.
//
// Pure functions: (actual output, expected output) -> Comparison. Knows
// nothing about languages, processes, or the filesystem, which keeps
// scoring deterministic regardless of how the program was executed.
use dsa_common::types::{Comparison, LineDiff};

/// Splits captured output into comparison lines.
///
/// The string is trimmed as a whole first (so a final newline never counts
/// as an extra blank line), then each line loses its surrounding whitespace.
/// Internal blank lines, case, and inner spacing are preserved.
pub fn normalize(output: &str) -> Vec<String> {
    output
        .trim()
        .lines()
        .map(|line| line.trim().to_string())
        .collect()
}

/// Compares actual against expected output after normalization.
///
/// Pass/fail is exact sequence equality. The diff enumerates every index
/// where the sides disagree: differing pairs, lines the program never
/// printed (`actual: None`), and extra lines it printed (`expected: None`).
/// Matching lines are not recorded; the diff is reporting only.
pub fn compare(actual: &str, expected: &str) -> Comparison {
    let actual = normalize(actual);
    let expected = normalize(expected);

    let mut diffs = Vec::new();
    for index in 0..actual.len().max(expected.len()) {
        match (expected.get(index), actual.get(index)) {
            (Some(exp), Some(act)) if exp == act => {}
            (exp, act) => diffs.push(LineDiff {
                line: index + 1,
                expected: exp.cloned(),
                actual: act.cloned(),
            }),
        }
    }

    Comparison {
        passed: diffs.is_empty(),
        diffs,
    }
}
