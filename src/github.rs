//! Pull request queries through the GitHub CLI.
//!
//! Metadata owned by the hosting platform (title, body, labels, assignees,
//! branch names) is read with `gh pr view --json`. The `gh` binary handles
//! authentication and host selection, so no HTTP client is needed here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::Command;

/// Fields requested from `gh pr view --json`.
const PR_VIEW_FIELDS: &str = "title,body,labels,assignees,headRefName,baseRefName";

#[derive(Debug, Clone, Deserialize)]
pub struct PrLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrUser {
    pub login: String,
}

/// Shape of the `gh pr view --json` response for the fields we request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrView {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<PrLabel>,
    #[serde(default)]
    pub assignees: Vec<PrUser>,
    pub head_ref_name: String,
    pub base_ref_name: String,
}

/// Run a gh command with arguments and return stdout on success.
fn run_gh(args: &[&str]) -> Result<String> {
    let output = Command::new("gh")
        .args(args)
        .output()
        .context(format!("Failed to run gh {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("gh {} failed: {}", args.join(" "), stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Fetch the pull request view for `pr`, or for the pull request associated
/// with the current branch when `pr` is `None`.
pub fn fetch_pr_view(pr: Option<u64>) -> Result<PrView> {
    let number;
    let mut args = vec!["pr", "view"];
    if let Some(n) = pr {
        number = n.to_string();
        args.push(&number);
    }
    args.extend(["--json", PR_VIEW_FIELDS]);

    let stdout = run_gh(&args)?;
    serde_json::from_str(&stdout).context("Failed to parse gh pr view output")
}
