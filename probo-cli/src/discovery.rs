//! Filesystem Discovery
//!
//! Directory targets expand into test binaries: every regular file under the
//! tree whose stem starts with the configured prefix is treated as an
//! executable unit and run as a child process. Hidden directories and common
//! build-output directories are never descended into.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

const SKIP_DIRS: [&str; 4] = ["target", "node_modules", ".git", "__pycache__"];

/// Collect executable test files under `root`, sorted by path.
///
/// A file qualifies when its stem starts with `prefix`. Directories are
/// walked recursively; hidden entries and build-output directories are
/// skipped.
pub fn collect_test_files(root: &Path, prefix: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(root, prefix, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, prefix: &str, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if SKIP_DIRS.contains(&name.as_ref()) {
                continue;
            }
            walk(&path, prefix, found)?;
        } else if file_type.is_file() {
            let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());
            if stem.is_some_and(|s| s.starts_with(prefix)) {
                found.push(path);
            }
        }
    }
    Ok(())
}

/// Run one test file as a child process, forwarding the selection flags.
///
/// The child inherits stdout and stderr so its own output interleaves with
/// the parent's banners.
pub fn spawn_unit(path: &Path, prefix: &str, run_all: bool) -> io::Result<ExitStatus> {
    let mut command = Command::new(path);
    command.arg("--prefix").arg(prefix);
    if run_all {
        command.arg("--all");
    }
    tracing::debug!(unit = %path.display(), "spawning test unit");
    command.status()
}
