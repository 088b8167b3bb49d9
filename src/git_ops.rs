//! Low-level git operations.
//!
//! Pure command wrappers with no dependency on the rule or metadata
//! modules. Everything here runs against the repository in the current
//! working directory. Failures are operational errors: an unresolvable
//! ref aborts the run before any rule verdict is produced.

use anyhow::{Context, Result};
use std::process::Command;

/// Run a git command with arguments and return stdout on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute or exits with non-zero status.
fn run_git(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .context(format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Get the current branch name.
/// Returns "HEAD" for detached HEAD state.
pub fn get_current_branch() -> Result<String> {
    let branch = run_git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(branch.trim().to_string())
}

/// Resolve a ref to its full commit hash.
pub fn rev_parse(reference: &str) -> Result<String> {
    let hash = run_git(&["rev-parse", reference])
        .with_context(|| format!("Failed to resolve ref '{}'", reference))?;
    Ok(hash.trim().to_string())
}

/// Find the merge-base (most recent common ancestor) of two refs.
pub fn merge_base(a: &str, b: &str) -> Result<String> {
    let hash = run_git(&["merge-base", a, b])
        .with_context(|| format!("Failed to find merge base of '{}' and '{}'", a, b))?;
    Ok(hash.trim().to_string())
}

/// Check whether `head` is rebased on the current tip of `base`.
///
/// True when the merge-base of the two refs equals the tip of `base`,
/// i.e. `head` is a strict fast-forward-able descendant of `base`.
pub fn is_rebased_on(base: &str, head: &str) -> Result<bool> {
    let base_tip = rev_parse(base)?;
    let ancestor = merge_base(base, head)?;
    Ok(ancestor == base_tip)
}

/// Information about a single git commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub hash: String,
    /// Full commit message, trailing whitespace stripped.
    pub message: String,
    /// Number of parents; more than one marks a merge commit.
    pub parent_count: usize,
}

/// Get commits in the range `from_ref..to_ref`, oldest first.
///
/// Messages are full multi-line bodies, so the log format uses the unit
/// separator between fields and the record separator between commits
/// instead of line-based parsing.
///
/// # Errors
/// Returns error if the refs are invalid or the git command fails.
pub fn commits_in_range(from_ref: &str, to_ref: &str) -> Result<Vec<CommitInfo>> {
    let range = format!("{}..{}", from_ref, to_ref);

    let stdout = run_git(&["log", "--reverse", "--format=%H%x1f%P%x1f%B%x1e", &range])
        .with_context(|| format!("Failed to resolve commit range {}", range))?;

    let mut commits = Vec::new();

    for record in stdout.split('\x1e') {
        if record.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = record.splitn(3, '\x1f').collect();
        if parts.len() != 3 {
            continue;
        }

        commits.push(CommitInfo {
            hash: parts[0].trim().to_string(),
            parent_count: parts[1].split_whitespace().count(),
            message: parts[2].trim_end().to_string(),
        });
    }

    Ok(commits)
}
