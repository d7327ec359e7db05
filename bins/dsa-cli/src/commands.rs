// Collaborator commands around the core runner: `list` and `clean`.
use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};

use dsa_common::config::HarnessConfig;
use dsa_common::types::{Language, Workspace};

use crate::colours::{paint, Colour};

/// Categories scanned by `list` when none is given.
pub const CATEGORIES: &[&str] = &["arrays", "graphs", "DP", "linkedlist", "codeforces"];

/// Enumerates problems per category (from their test documents) and the
/// languages each is solved in.
pub fn list_problems(
    workspace: &Workspace,
    config: &HarnessConfig,
    category: Option<&str>,
) -> Result<()> {
    let colour = config.colour;
    let categories: Vec<&str> = match category {
        Some(c) if CATEGORIES.contains(&c) => vec![c],
        Some(c) => {
            println!(
                "{}",
                paint(&format!("Unknown problem category: {}", c), Colour::Red, colour)
            );
            println!(
                "{}",
                paint(
                    &format!("Available categories: {}", CATEGORIES.join(", ")),
                    Colour::Yellow,
                    colour
                )
            );
            return Ok(());
        }
        None => CATEGORIES.to_vec(),
    };

    for category in categories {
        let test_dir = workspace.tests_dir().join(category);
        if !test_dir.exists() {
            continue;
        }

        println!();
        println!(
            "{}",
            paint(&format!("{}:", category.to_lowercase()), Colour::Bold, colour)
        );

        let mut problems: BTreeMap<String, Vec<&'static str>> = BTreeMap::new();
        for entry in fs::read_dir(&test_dir)
            .with_context(|| format!("Failed to read {}", test_dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    problems.insert(stem.to_string(), Vec::new());
                }
            }
        }

        for (problem, languages) in &mut problems {
            for language in Language::ALL {
                if workspace
                    .source_path_for(category, problem, language)
                    .exists()
                {
                    languages.push(language.folder());
                }
            }
            languages.sort_unstable();

            if languages.is_empty() {
                println!(
                    "{}",
                    paint(
                        &format!("  {} (test cases only)", problem),
                        Colour::Yellow,
                        colour
                    )
                );
            } else {
                print!("{}", paint(&format!("  {}", problem), Colour::Green, colour));
                println!(" ({})", languages.join(", "));
            }
        }
    }

    Ok(())
}

/// Removes the shared build directory.
pub fn clean(workspace: &Workspace, config: &HarnessConfig) -> Result<()> {
    let build_dir = workspace.build_dir();
    if build_dir.is_dir() {
        fs::remove_dir_all(&build_dir)
            .with_context(|| format!("Failed to remove {}", build_dir.display()))?;
        println!(
            "{}",
            paint("Build directory cleaned.", Colour::Green, config.colour)
        );
    } else {
        println!(
            "{}",
            paint(
                "No build directory found to clean.",
                Colour::Yellow,
                config.colour
            )
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_build_dir() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path());
        fs::create_dir_all(workspace.build_dir().join("nested")).unwrap();
        fs::write(workspace.build_dir().join("IsUnique.out"), b"bin").unwrap();

        clean(&workspace, &HarnessConfig::default()).unwrap();
        assert!(!workspace.build_dir().exists());
    }

    #[test]
    fn test_clean_without_build_dir_is_fine() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path());
        clean(&workspace, &HarnessConfig::default()).unwrap();
    }

    #[test]
    fn test_list_handles_missing_categories() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path());
        list_problems(&workspace, &HarnessConfig::default(), None).unwrap();
        list_problems(&workspace, &HarnessConfig::default(), Some("arrays")).unwrap();
    }
}
