// Test-document loading and shape adaptation.
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use dsa_common::error::{HarnessError, Result};
use dsa_common::types::TestCase;

/// Reads and parses the test document at `path`.
///
/// The canonical shape is a JSON array of `{"input": [..], "output": [..]}`
/// objects, with `expected` accepted for `output`. Two legacy shapes are
/// converted through explicit adapters rather than guessed: a map of literal
/// input string to expected scalar, and case objects whose `input` is a list
/// of scalar arguments. Anything else is `InvalidTestFormat`.
pub fn load(path: &Path) -> Result<Vec<TestCase>> {
    if !path.exists() {
        return Err(HarnessError::MissingTestFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content).map_err(|e| invalid(path, format!("not valid JSON: {}", e)))?;

    let cases = match document {
        Value::Array(cases) => case_list(path, cases)?,
        Value::Object(map) => literal_map(path, map)?,
        other => {
            return Err(invalid(
                path,
                format!(
                    "expected an array of cases or a literal map, found {}",
                    type_name(&other)
                ),
            ))
        }
    };

    debug!(path = %path.display(), cases = cases.len(), "loaded test document");
    Ok(cases)
}

/// Canonical shape (and the legacy args-list variant of `input`).
fn case_list(path: &Path, cases: Vec<Value>) -> Result<Vec<TestCase>> {
    cases
        .into_iter()
        .enumerate()
        .map(|(index, case)| {
            let Value::Object(fields) = &case else {
                return Err(invalid(
                    path,
                    format!("case {}: expected an object, found {}", index, type_name(&case)),
                ));
            };

            let input = fields
                .get("input")
                .ok_or_else(|| invalid(path, format!("case {}: missing `input`", index)))?;
            let output = fields
                .get("output")
                .or_else(|| fields.get("expected"))
                .ok_or_else(|| {
                    invalid(path, format!("case {}: missing `output` (or `expected`)", index))
                })?;

            Ok(TestCase {
                input: lines_from(input)
                    .map_err(|e| invalid(path, format!("case {}: bad `input`: {}", index, e)))?,
                expected: lines_from(output)
                    .map_err(|e| invalid(path, format!("case {}: bad `output`: {}", index, e)))?,
            })
        })
        .collect()
}

/// Legacy shape: `{"some input": expected, ...}` — one input line, one
/// expected line per entry, in document order.
fn literal_map(path: &Path, map: serde_json::Map<String, Value>) -> Result<Vec<TestCase>> {
    map.into_iter()
        .map(|(input, expected)| {
            let expected = scalar_line(&expected).map_err(|e| {
                invalid(path, format!("entry {:?}: bad expected value: {}", input, e))
            })?;
            Ok(TestCase {
                input: vec![input],
                expected: vec![expected],
            })
        })
        .collect()
}

/// Renders a JSON value as lines: an array of scalars becomes one line per
/// element, a bare scalar a single line.
fn lines_from(value: &Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::Array(items) => items.iter().map(scalar_line).collect(),
        scalar => Ok(vec![scalar_line(scalar)?]),
    }
}

fn scalar_line(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("{} is not usable as a line", type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid(path: &Path, detail: String) -> HarnessError {
    HarnessError::InvalidTestFormat {
        path: path.to_path_buf(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_document(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().expect("create tempdir");
        let path = dir.path().join("Case.json");
        fs::write(&path, content).expect("write test document");
        (dir, path)
    }

    #[test]
    fn test_canonical_shape() {
        let (_dir, path) = write_document(
            r#"[
                {"input": ["abc"], "output": ["true"]},
                {"input": ["aab"], "output": ["false"]}
            ]"#,
        );

        let cases = load(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].input, vec!["abc"]);
        assert_eq!(cases[0].expected, vec!["true"]);
        assert_eq!(cases[1].input, vec!["aab"]);
        assert_eq!(cases[1].expected, vec!["false"]);
    }

    #[test]
    fn test_expected_key_is_an_alias_for_output() {
        let (_dir, path) = write_document(r#"[{"input": ["5"], "expected": ["120"]}]"#);

        let cases = load(&path).unwrap();
        assert_eq!(cases[0].expected, vec!["120"]);
    }

    #[test]
    fn test_multi_line_input_and_output() {
        let (_dir, path) = write_document(
            r#"[{"input": ["3", "1 2 3"], "output": ["6", "done"]}]"#,
        );

        let cases = load(&path).unwrap();
        assert_eq!(cases[0].input, vec!["3", "1 2 3"]);
        assert_eq!(cases[0].expected, vec!["6", "done"]);
    }

    #[test]
    fn test_scalar_literals_become_single_lines() {
        let (_dir, path) = write_document(r#"[{"input": ["abc", 2], "expected": true}]"#);

        let cases = load(&path).unwrap();
        assert_eq!(cases[0].input, vec!["abc", "2"]);
        assert_eq!(cases[0].expected, vec!["true"]);
    }

    #[test]
    fn test_legacy_literal_map() {
        let (_dir, path) = write_document(
            r#"{
                "you shall not pass": false,
                "you can": true
            }"#,
        );

        let cases = load(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].input, vec!["you shall not pass"]);
        assert_eq!(cases[0].expected, vec!["false"]);
        assert_eq!(cases[1].input, vec!["you can"]);
        assert_eq!(cases[1].expected, vec!["true"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Nope.json");

        match load(&path) {
            Err(HarnessError::MissingTestFile(p)) => assert_eq!(p, path),
            other => panic!("expected MissingTestFile, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_json() {
        let (_dir, path) = write_document("not json at all");
        assert!(matches!(
            load(&path),
            Err(HarnessError::InvalidTestFormat { .. })
        ));
    }

    #[test]
    fn test_rejects_scalar_document() {
        let (_dir, path) = write_document(r#""just a string""#);
        assert!(matches!(
            load(&path),
            Err(HarnessError::InvalidTestFormat { .. })
        ));
    }

    #[test]
    fn test_rejects_non_object_case() {
        let (_dir, path) = write_document(r#"[["abc", "true"]]"#);

        let err = load(&path).unwrap_err();
        let HarnessError::InvalidTestFormat { detail, .. } = err else {
            panic!("expected InvalidTestFormat");
        };
        assert!(detail.contains("case 0"), "detail was {:?}", detail);
    }

    #[test]
    fn test_rejects_case_without_output() {
        let (_dir, path) = write_document(r#"[{"input": ["abc"]}]"#);

        let err = load(&path).unwrap_err();
        let HarnessError::InvalidTestFormat { detail, .. } = err else {
            panic!("expected InvalidTestFormat");
        };
        assert!(detail.contains("output"), "detail was {:?}", detail);
    }

    #[test]
    fn test_rejects_nested_structures_in_lines() {
        let (_dir, path) = write_document(r#"[{"input": [["nested"]], "output": ["x"]}]"#);
        assert!(matches!(
            load(&path),
            Err(HarnessError::InvalidTestFormat { .. })
        ));
    }
}
