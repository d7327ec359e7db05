// Per-language build/run strategies.
use std::path::{Path, PathBuf};

use dsa_common::config::HarnessConfig;
use dsa_common::types::{Language, ProblemId, Workspace};

/// A build step, for languages that need one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSpec {
    pub command: Vec<String>,
}

/// One program invocation, plus any environment the interpreter needs
/// (library search paths for shared helper code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub command: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// Compile step and cleanup obligations for one run.
#[derive(Debug, Clone, Default)]
pub struct Preparation {
    pub compile: Option<CompileSpec>,
    /// Build artifacts this run must delete, success or not.
    pub cleanup: Vec<PathBuf>,
}

/// Strategy for building and running one language's solutions.
///
/// Implementations are pure command construction; nothing here touches the
/// filesystem or spawns processes. Adding a language means adding an
/// implementation and one entry in [`ADAPTERS`].
pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Build step (if any) and the artifacts this run owns.
    fn prepare(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        config: &HarnessConfig,
    ) -> Preparation;

    /// Invocation for one run. `test_file`, when given, is appended as the
    /// trailing argument for solutions that read the document themselves.
    fn run_spec(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        config: &HarnessConfig,
        test_file: Option<&Path>,
    ) -> RunSpec;
}

static ADAPTERS: &[&dyn LanguageAdapter] = &[
    &CppAdapter,
    &JavaAdapter,
    &PythonAdapter,
    &JavaScriptAdapter,
];

/// Looks up the adapter registered for `language`.
pub fn adapter_for(language: Language) -> Option<&'static dyn LanguageAdapter> {
    ADAPTERS
        .iter()
        .copied()
        .find(|adapter| adapter.language() == language)
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Compiled-to-native: build a binary into `build/`, run it, delete it.
struct CppAdapter;

impl LanguageAdapter for CppAdapter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn prepare(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        config: &HarnessConfig,
    ) -> Preparation {
        let binary = workspace.native_binary_path(problem);
        Preparation {
            compile: Some(CompileSpec {
                command: vec![
                    config.cpp_compiler.clone(),
                    "-std=c++17".to_string(),
                    "-O2".to_string(),
                    path_arg(&workspace.source_path(problem)),
                    "-o".to_string(),
                    path_arg(&binary),
                ],
            }),
            cleanup: vec![binary],
        }
    }

    fn run_spec(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        _config: &HarnessConfig,
        test_file: Option<&Path>,
    ) -> RunSpec {
        let mut command = vec![path_arg(&workspace.native_binary_path(problem))];
        if let Some(path) = test_file {
            command.push(path_arg(path));
        }
        RunSpec {
            command,
            env: Vec::new(),
        }
    }
}

/// Compiled-to-bytecode: class output lands in `build/` and is reclaimed by
/// `clean`, not per run.
struct JavaAdapter;

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn prepare(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        config: &HarnessConfig,
    ) -> Preparation {
        Preparation {
            compile: Some(CompileSpec {
                command: vec![
                    config.java_compiler.clone(),
                    "-d".to_string(),
                    path_arg(&workspace.build_dir()),
                    path_arg(&workspace.source_path(problem)),
                ],
            }),
            cleanup: Vec::new(),
        }
    }

    fn run_spec(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        config: &HarnessConfig,
        _test_file: Option<&Path>,
    ) -> RunSpec {
        RunSpec {
            command: vec![
                config.java_runner.clone(),
                "-cp".to_string(),
                path_arg(&workspace.build_dir()),
                problem.qualified_name(),
            ],
            env: Vec::new(),
        }
    }
}

/// Interpreted: no build step; `helpers/` is exported on the interpreter's
/// library search path so shared helper code stays importable.
struct PythonAdapter;

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn prepare(
        &self,
        _problem: &ProblemId,
        _workspace: &Workspace,
        _config: &HarnessConfig,
    ) -> Preparation {
        Preparation::default()
    }

    fn run_spec(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        config: &HarnessConfig,
        test_file: Option<&Path>,
    ) -> RunSpec {
        let mut command = vec![
            config.python_runner.clone(),
            path_arg(&workspace.source_path(problem)),
        ];
        if let Some(path) = test_file {
            command.push(path_arg(path));
        }
        RunSpec {
            command,
            env: vec![("PYTHONPATH".to_string(), path_arg(&workspace.helpers_dir()))],
        }
    }
}

struct JavaScriptAdapter;

impl LanguageAdapter for JavaScriptAdapter {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn prepare(
        &self,
        _problem: &ProblemId,
        _workspace: &Workspace,
        _config: &HarnessConfig,
    ) -> Preparation {
        Preparation::default()
    }

    fn run_spec(
        &self,
        problem: &ProblemId,
        workspace: &Workspace,
        config: &HarnessConfig,
        test_file: Option<&Path>,
    ) -> RunSpec {
        let mut command = vec![
            config.js_runner.clone(),
            path_arg(&workspace.source_path(problem)),
        ];
        if let Some(path) = test_file {
            command.push(path_arg(path));
        }
        RunSpec {
            command,
            env: vec![("NODE_PATH".to_string(), path_arg(&workspace.helpers_dir()))],
        }
    }
}
