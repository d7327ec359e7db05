mod colours;
mod commands;
mod evaluator;
mod executor;
mod language;
mod loader;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use dsa_common::config::HarnessConfig;
use dsa_common::error::HarnessError;
use dsa_common::types::{Language, ProblemId, Workspace};

use crate::colours::Colour;
use crate::runner::{RunMode, TestRunner};

/// Category aliases folded before problem resolution.
const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("cf", "codeforces"),
    ("linkedlists", "linkedlist"),
    ("graph", "graphs"),
    ("dp", "DP"),
];

#[derive(Parser)]
#[command(name = "dsa")]
#[command(about = "Test harness for algorithm-practice solutions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a problem's solution against its test cases
    Run {
        /// Problem category (e.g. arrays, graphs, dp)
        category: String,

        /// Problem name (e.g. IsUnique)
        problem: String,

        /// Implementation language (cpp, java, python, js and their aliases)
        #[arg(default_value = "cpp")]
        language: String,

        /// Skip verification: run the program once and echo its output
        #[arg(long)]
        unchecked: bool,

        /// Per-test timeout in milliseconds (overrides DSA_TIMEOUT_MS)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List problems and the languages they are solved in
    List {
        /// Restrict the listing to one category
        category: Option<String>,
    },

    /// Remove the shared build directory
    Clean,
}

fn fold_category(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(lowered)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = HarnessConfig::from_env();
    let colour = config.colour;
    let workspace = Workspace::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    match dispatch(cli, &workspace, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!(
                "{}",
                colours::paint(&format!("{:#}", error), Colour::Red, colour)
            );
            if let Some(HarnessError::UnsupportedLanguage(_)) =
                error.downcast_ref::<HarnessError>()
            {
                eprintln!("Supported languages: cpp, java, python, js");
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli, workspace: &Workspace, mut config: HarnessConfig) -> Result<bool> {
    match cli.command {
        Commands::Run {
            category,
            problem,
            language,
            unchecked,
            timeout_ms,
        } => {
            if let Some(ms) = timeout_ms {
                config.timeout = Duration::from_millis(ms);
            }
            let language = Language::from_alias(&language)
                .ok_or(HarnessError::UnsupportedLanguage(language))?;
            let problem = ProblemId {
                category: fold_category(&category),
                name: problem,
                language,
            };

            let mode = if unchecked {
                RunMode::Unchecked
            } else {
                RunMode::Checked
            };
            let outcome = TestRunner::new(workspace, &config)
                .run(&problem, mode)
                .await?;
            Ok(outcome.succeeded())
        }
        Commands::List { category } => {
            let category = category.map(|c| fold_category(&c));
            commands::list_problems(workspace, &config, category.as_deref())?;
            Ok(true)
        }
        Commands::Clean => {
            commands::clean(workspace, &config)?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!(fold_category("cf"), "codeforces");
        assert_eq!(fold_category("CF"), "codeforces");
        assert_eq!(fold_category("dp"), "DP");
        assert_eq!(fold_category("graph"), "graphs");
        assert_eq!(fold_category("linkedlists"), "linkedlist");
        assert_eq!(fold_category("arrays"), "arrays");
        assert_eq!(fold_category("Arrays"), "arrays");
    }
}
