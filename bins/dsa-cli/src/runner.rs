// Test-run orchestration: resolve paths, compile once, execute cases,
// aggregate, clean up.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use dsa_common::config::HarnessConfig;
use dsa_common::error::{HarnessError, Result};
use dsa_common::types::{ProblemId, RunSummary, TestCase, Workspace};

use crate::colours::{paint, Colour};
use crate::evaluator;
use crate::executor;
use crate::language::{self, CompileSpec, LanguageAdapter};
use crate::loader;

/// How a run treats the test document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Load the document, feed each case on stdin, verify output.
    Checked,
    /// Run the program once without verification; the document path is
    /// handed to the program when the document exists, and its absence is
    /// tolerated.
    Unchecked,
}

/// Result of one orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Verified(RunSummary),
    Unverified { exit_code: i32 },
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        match self {
            RunOutcome::Verified(summary) => summary.all_passed(),
            RunOutcome::Unverified { exit_code } => *exit_code == 0,
        }
    }
}

/// Removes build artifacts when the run leaves scope, on every exit path.
/// Removal is best-effort; failures are logged and discarded.
struct CleanupGuard {
    paths: Vec<PathBuf>,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed build artifact"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "failed to remove build artifact")
                }
            }
        }
    }
}

/// Drives one problem through compile, test execution, and cleanup.
pub struct TestRunner<'a> {
    workspace: &'a Workspace,
    config: &'a HarnessConfig,
}

impl<'a> TestRunner<'a> {
    pub fn new(workspace: &'a Workspace, config: &'a HarnessConfig) -> Self {
        Self { workspace, config }
    }

    /// RESOLVE_PATHS -> (COMPILE)? -> LOAD_CASES -> per-case EXECUTE/COMPARE
    /// -> CLEANUP -> REPORT. Precondition violations abort before any
    /// process is spawned; per-case failures never abort the run.
    pub async fn run(&self, problem: &ProblemId, mode: RunMode) -> Result<RunOutcome> {
        let adapter = language::adapter_for(problem.language)
            .ok_or_else(|| HarnessError::UnsupportedLanguage(problem.language.to_string()))?;

        let source = self.workspace.source_path(problem);
        if !source.exists() {
            return Err(HarnessError::SourceNotFound(source));
        }
        let test_file = self.workspace.test_file_path(problem);

        info!(problem = %problem, "starting run");

        let preparation = adapter.prepare(problem, self.workspace, self.config);
        // The guard owns the cleanup obligations from here on; it fires on
        // every exit path below, compile failure included.
        let _cleanup = CleanupGuard {
            paths: preparation.cleanup,
        };

        if let Some(compile) = &preparation.compile {
            self.compile(compile).await?;
        }

        match mode {
            RunMode::Checked => {
                let cases = loader::load(&test_file)?;
                let summary = self.run_cases(adapter, problem, &cases).await;
                Ok(RunOutcome::Verified(summary))
            }
            RunMode::Unchecked => {
                let test_file = test_file.exists().then_some(test_file);
                Ok(self.run_raw(adapter, problem, test_file.as_deref()).await)
            }
        }
    }

    /// Invoked at most once per run, never per test case.
    async fn compile(&self, spec: &CompileSpec) -> Result<()> {
        fs::create_dir_all(self.workspace.build_dir())?;

        println!(
            "{}",
            self.paint(
                &format!("Compiling with: {}", spec.command.join(" ")),
                Colour::Cyan
            )
        );

        let result = executor::execute(
            &spec.command,
            None,
            Some(self.workspace.root()),
            &[],
            self.config.timeout,
        )
        .await;

        print!("{}", result.stdout);
        if !result.stderr.is_empty() {
            eprint!("{}", self.paint(&result.stderr, Colour::Red));
        }

        if !result.success() {
            println!("{}", self.paint("Compilation failed", Colour::Red));
            return Err(HarnessError::CompilationFailed);
        }
        Ok(())
    }

    async fn run_cases(
        &self,
        adapter: &dyn LanguageAdapter,
        problem: &ProblemId,
        cases: &[TestCase],
    ) -> RunSummary {
        let spec = adapter.run_spec(problem, self.workspace, self.config, None);
        let mut passed = 0;

        for (index, case) in cases.iter().enumerate() {
            let stdin = case.input.join("\n");
            let result = executor::execute(
                &spec.command,
                Some(stdin.as_str()),
                Some(self.workspace.root()),
                &spec.env,
                self.config.timeout,
            )
            .await;

            if result.timed_out {
                println!(
                    "{}",
                    self.paint(
                        &format!(
                            "Test case {} timed out after {}ms",
                            index, result.duration_ms
                        ),
                        Colour::Red
                    )
                );
                continue;
            }

            if result.exit_code != 0 {
                println!(
                    "{}",
                    self.paint(&format!("Test case {} failed", index), Colour::Red)
                );
                println!(
                    "  exited with code {}: {}",
                    result.exit_code,
                    result.stderr.lines().next().unwrap_or("")
                );
                continue;
            }

            let comparison = evaluator::compare(&result.stdout, &case.expected.join("\n"));
            if comparison.passed {
                println!(
                    "{}",
                    self.paint(&format!("Test case {} passed", index), Colour::Green)
                );
                passed += 1;
            } else {
                println!(
                    "{}",
                    self.paint(&format!("Test case {} failed", index), Colour::Red)
                );
                for diff in &comparison.diffs {
                    println!("  Line {}:", diff.line);
                    println!(
                        "{}",
                        self.paint(
                            &format!(
                                "    Expected: {}",
                                diff.expected.as_deref().unwrap_or("<none>")
                            ),
                            Colour::Yellow
                        )
                    );
                    println!(
                        "{}",
                        self.paint(
                            &format!(
                                "    Got     : {}",
                                diff.actual.as_deref().unwrap_or("<missing>")
                            ),
                            Colour::Cyan
                        )
                    );
                }
            }
        }

        let summary = RunSummary {
            passed,
            total: cases.len(),
        };

        println!();
        println!(
            "Result: {}/{} test cases passed.",
            summary.passed, summary.total
        );
        if !summary.all_passed() {
            println!("{}", self.paint("Some test cases failed.", Colour::Yellow));
        }
        summary
    }

    /// Unverified run: execute once and echo the program's own output.
    async fn run_raw(
        &self,
        adapter: &dyn LanguageAdapter,
        problem: &ProblemId,
        test_file: Option<&Path>,
    ) -> RunOutcome {
        let spec = adapter.run_spec(problem, self.workspace, self.config, test_file);

        println!(
            "{}",
            self.paint(
                &format!("Running command: {}", spec.command.join(" ")),
                Colour::Cyan
            )
        );

        let result = executor::execute(
            &spec.command,
            None,
            Some(self.workspace.root()),
            &spec.env,
            self.config.timeout,
        )
        .await;

        print!("{}", result.stdout);
        if !result.stderr.is_empty() {
            eprint!("{}", self.paint(&result.stderr, Colour::Red));
        }
        if result.timed_out {
            println!("{}", self.paint("Execution timed out", Colour::Red));
        }

        RunOutcome::Unverified {
            exit_code: result.exit_code,
        }
    }

    fn paint(&self, text: &str, colour: Colour) -> String {
        paint(text, colour, self.config.colour)
    }
}
