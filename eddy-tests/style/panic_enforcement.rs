//! Panic Enforcement
//!
//! Production code must not call `unwrap()` or `expect()`. Everything from the
//! first `#[cfg(test)]` line of a file onward is treated as test code.

use std::fs;
use std::path::{Path, PathBuf};

const PRODUCTION_CRATES: &[&str] = &["eddy-core", "eddy-search", "eddy-web", "eddy-cli"];

/// A panicking call found in production code
#[derive(Debug)]
struct PanicViolation {
    file_path: String,
    line_number: usize,
    context: String,
}

/// Checker for panicking calls in production code
struct PanicChecker {
    violations: Vec<PanicViolation>,
    files_checked: usize,
}

impl PanicChecker {
    fn new() -> Self {
        Self {
            violations: Vec::new(),
            files_checked: 0,
        }
    }

    fn find_rust_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::find_rust_files(&path, files)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
        Ok(())
    }

    fn check_source(&mut self, file_path: &str, content: &str) {
        self.files_checked += 1;

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("#[cfg(test)]") {
                break;
            }
            if trimmed.starts_with("//") {
                continue;
            }
            if trimmed.contains(".unwrap()") || trimmed.contains(".expect(") {
                self.violations.push(PanicViolation {
                    file_path: file_path.to_string(),
                    line_number: index + 1,
                    context: trimmed.to_string(),
                });
            }
        }
    }

    fn check_workspace(&mut self) -> std::io::Result<()> {
        for krate in PRODUCTION_CRATES {
            let mut files = Vec::new();
            Self::find_rust_files(&Path::new("..").join(krate).join("src"), &mut files)?;
            for file in files {
                let content = fs::read_to_string(&file)?;
                self.check_source(&file.to_string_lossy(), &content);
            }
        }
        Ok(())
    }

    fn report_violations(&self) -> bool {
        if self.violations.is_empty() {
            println!(
                "Panic enforcement: {} files checked, no violations found",
                self.files_checked
            );
            return true;
        }

        println!("Panicking calls found in production code:");
        for violation in &self.violations {
            println!("{}:{}", violation.file_path, violation.line_number);
            println!("  {}", violation.context);
        }
        false
    }
}
