use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Languages the harness knows how to build and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Java,
    Python,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Cpp,
        Language::Java,
        Language::Python,
        Language::JavaScript,
    ];

    /// Folds user-facing aliases (`c++`, `node`, `javac`, ...) into a variant.
    pub fn from_alias(raw: &str) -> Option<Language> {
        match raw.to_lowercase().as_str() {
            "cpp" | "c++" => Some(Language::Cpp),
            "java" | "javac" => Some(Language::Java),
            "python" | "py" => Some(Language::Python),
            "js" | "javascript" | "node" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Source folder under a category directory; doubles as the file extension.
    pub fn folder(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "py",
            Language::JavaScript => "js",
        }
    }

    pub fn extension(self) -> &'static str {
        self.folder()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
            Language::JavaScript => "javascript",
        };
        write!(f, "{}", name)
    }
}

/// One practice problem instance: category, name, and the implementation
/// language to run. Immutable once constructed; aliases are folded before
/// this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemId {
    pub category: String,
    pub name: String,
    pub language: Language,
}

impl ProblemId {
    /// Bytecode entry point, `<category>.<language-folder>.<name>`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.category, self.language.folder(), self.name)
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.category, self.name, self.language)
    }
}

/// Filesystem layout of a practice workspace.
///
/// Solutions live at `<category>/<lang-folder>/<name>.<ext>`, test documents
/// at `tests/<category>/<name>.json`, shared helper code under `helpers/`,
/// and build output under `build/`.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    pub fn tests_dir(&self) -> PathBuf {
        self.root.join("tests")
    }

    pub fn helpers_dir(&self) -> PathBuf {
        self.root.join("helpers")
    }

    pub fn source_path(&self, problem: &ProblemId) -> PathBuf {
        self.source_path_for(&problem.category, &problem.name, problem.language)
    }

    pub fn source_path_for(&self, category: &str, name: &str, language: Language) -> PathBuf {
        self.root
            .join(category)
            .join(language.folder())
            .join(format!("{}.{}", name, language.extension()))
    }

    pub fn test_file_path(&self, problem: &ProblemId) -> PathBuf {
        self.tests_dir()
            .join(&problem.category)
            .join(format!("{}.json", problem.name))
    }

    /// Fixed build-output location for a natively compiled problem.
    pub fn native_binary_path(&self, problem: &ProblemId) -> PathBuf {
        self.build_dir().join(format!("{}.out", problem.name))
    }
}

/// One (input, expected-output) pair, both as ordered line sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Vec<String>,
    pub expected: Vec<String>,
}

/// Captured outcome of one child-process invocation (compile or run).
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// One disagreeing line in a comparison. `None` on the actual side means the
/// program printed fewer lines than expected (`<missing>`); `None` on the
/// expected side means it printed extra lines (`<none>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Outcome of comparing one case's output against its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub passed: bool,
    pub diffs: Vec<LineDiff>,
}

/// Aggregate result of one run: how many cases passed out of how many ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_aliases() {
        assert_eq!(Language::from_alias("cpp"), Some(Language::Cpp));
        assert_eq!(Language::from_alias("C++"), Some(Language::Cpp));
        assert_eq!(Language::from_alias("py"), Some(Language::Python));
        assert_eq!(Language::from_alias("python"), Some(Language::Python));
        assert_eq!(Language::from_alias("node"), Some(Language::JavaScript));
        assert_eq!(Language::from_alias("javascript"), Some(Language::JavaScript));
        assert_eq!(Language::from_alias("javac"), Some(Language::Java));
        assert_eq!(Language::from_alias("ruby"), None);
        assert_eq!(Language::from_alias(""), None);
    }

    #[test]
    fn test_source_path_layout() {
        let workspace = Workspace::new("/ws");
        let problem = ProblemId {
            category: "arrays".to_string(),
            name: "IsUnique".to_string(),
            language: Language::Cpp,
        };

        assert_eq!(
            workspace.source_path(&problem),
            PathBuf::from("/ws/arrays/cpp/IsUnique.cpp")
        );
        assert_eq!(
            workspace.test_file_path(&problem),
            PathBuf::from("/ws/tests/arrays/IsUnique.json")
        );
        assert_eq!(
            workspace.native_binary_path(&problem),
            PathBuf::from("/ws/build/IsUnique.out")
        );
    }

    #[test]
    fn test_python_uses_py_folder() {
        let workspace = Workspace::new("/ws");
        let path = workspace.source_path_for("graphs", "Bfs", Language::Python);
        assert_eq!(path, PathBuf::from("/ws/graphs/py/Bfs.py"));
    }

    #[test]
    fn test_qualified_name() {
        let problem = ProblemId {
            category: "arrays".to_string(),
            name: "IsUnique".to_string(),
            language: Language::Java,
        };
        assert_eq!(problem.qualified_name(), "arrays.java.IsUnique");
    }

    #[test]
    fn test_run_summary() {
        assert!(RunSummary { passed: 2, total: 2 }.all_passed());
        assert!(!RunSummary { passed: 1, total: 2 }.all_passed());
        assert!(RunSummary { passed: 0, total: 0 }.all_passed());
    }
}
