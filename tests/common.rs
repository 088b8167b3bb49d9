//! Common test helpers for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Switches the process working directory and restores the previous one
/// when dropped, so a failing assertion cannot strand the next serial
/// test inside a deleted temp directory.
pub struct DirGuard {
    original: PathBuf,
}

impl DirGuard {
    pub fn change_to(dir: &Path) -> std::io::Result<Self> {
        let original = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        Ok(DirGuard { original })
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Initialize a git repo with an initial commit on `main`.
pub fn setup_test_repo(repo_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(repo_dir)?;

    let output = Command::new("git")
        .args(["init", "-b", "main"])
        .current_dir(repo_dir)
        .output()?;
    assert!(output.status.success(), "git init failed");

    Command::new("git")
        .args(["config", "user.email", "test@example.com"])
        .current_dir(repo_dir)
        .output()?;

    Command::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(repo_dir)
        .output()?;

    fs::write(repo_dir.join("README.md"), "# Test Repo")?;
    Command::new("git")
        .args(["add", "."])
        .current_dir(repo_dir)
        .output()?;

    Command::new("git")
        .args(["commit", "-m", "Initial commit"])
        .current_dir(repo_dir)
        .output()?;

    Ok(())
}

/// Create a file and commit it with the given message.
pub fn commit_file(repo_dir: &Path, name: &str, message: &str) -> std::io::Result<()> {
    fs::write(repo_dir.join(name), name)?;
    Command::new("git")
        .args(["add", name])
        .current_dir(repo_dir)
        .output()?;
    Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(repo_dir)
        .output()?;
    Ok(())
}

/// Run a git command in the repo, asserting nothing about its output.
pub fn git(repo_dir: &Path, args: &[&str]) -> std::io::Result<()> {
    Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()?;
    Ok(())
}
