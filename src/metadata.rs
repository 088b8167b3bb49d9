//! Pull request metadata resolution.
//!
//! Builds the read-only [`PullRequestMetadata`] snapshot the validator
//! consumes: hosting-platform fields from `gh`, history from local git,
//! with command-line overrides taking precedence. All I/O happens here;
//! once the snapshot exists, validation is pure and synchronous.
//!
//! Any failure in this module is operational (the run cannot proceed) and
//! is reported distinctly from rule violations.

use anyhow::{Context, Result};

use crate::{git_ops, github};

/// Base branch assumed when neither `--base` nor a gh query provides one.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// One commit unique to the pull request branch.
#[derive(Debug, Clone)]
pub struct Commit {
    pub id: String,
    /// Full multi-line commit message.
    pub message: String,
    /// True when the commit has more than one parent.
    pub is_merge: bool,
}

/// Snapshot of everything the validator needs, constructed fresh per run
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct PullRequestMetadata {
    pub title: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub branch_name: String,
    pub base_branch: String,
    /// Commits in `base..head`, oldest first.
    pub commits: Vec<Commit>,
    /// Whether the merge-base of base and head equals the current tip of
    /// the base branch.
    pub base_up_to_date: bool,
}

/// Values supplied on the command line that take precedence over the
/// corresponding gh-queried fields.
#[derive(Debug, Default, Clone)]
pub struct MetadataOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub branch: Option<String>,
}

impl MetadataOverrides {
    /// True when every platform-owned field is supplied, so a gh query
    /// would contribute nothing.
    fn covers_all_fields(&self) -> bool {
        self.title.is_some()
            && self.description.is_some()
            && self.branch.is_some()
            && !self.labels.is_empty()
            && !self.assignees.is_empty()
    }
}

/// Resolve the metadata for one pull request.
///
/// `gh` is only invoked for fields the overrides do not cover: when every
/// platform-owned field is supplied, or with `offline` set, the query is
/// skipped entirely and only local git is consulted for the commit range.
/// With `offline`, the overrides are additionally the full truth (missing
/// description means absent, missing labels mean none), and `--title` is
/// mandatory.
pub fn resolve(
    base: Option<&str>,
    head: Option<&str>,
    pr: Option<u64>,
    overrides: &MetadataOverrides,
    offline: bool,
) -> Result<PullRequestMetadata> {
    let view = if offline || overrides.covers_all_fields() {
        None
    } else {
        Some(github::fetch_pr_view(pr).context("Failed to query pull request metadata via gh")?)
    };

    let title = match (&overrides.title, &view) {
        (Some(title), _) => title.clone(),
        (None, Some(view)) => view.title.clone(),
        (None, None) => anyhow::bail!("--title is required with --offline"),
    };

    let description = overrides.description.clone().or_else(|| {
        view.as_ref().and_then(|v| {
            if v.body.trim().is_empty() {
                None
            } else {
                Some(v.body.clone())
            }
        })
    });

    let labels = if overrides.labels.is_empty() {
        view.as_ref()
            .map(|v| v.labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    } else {
        overrides.labels.clone()
    };

    let assignees = if overrides.assignees.is_empty() {
        view.as_ref()
            .map(|v| v.assignees.iter().map(|a| a.login.clone()).collect())
            .unwrap_or_default()
    } else {
        overrides.assignees.clone()
    };

    let branch_name = match (&overrides.branch, &view) {
        (Some(branch), _) => branch.clone(),
        (None, Some(view)) => view.head_ref_name.clone(),
        (None, None) => {
            git_ops::get_current_branch().context("Failed to determine current branch")?
        }
    };

    let base_branch = base
        .map(str::to_string)
        .or_else(|| view.as_ref().map(|v| v.base_ref_name.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string());

    let head_ref = head.unwrap_or("HEAD");

    let commits = git_ops::commits_in_range(&base_branch, head_ref)
        .with_context(|| {
            format!(
                "Failed to resolve commit range {}..{}",
                base_branch, head_ref
            )
        })?
        .into_iter()
        .map(|c| Commit {
            is_merge: c.parent_count > 1,
            id: c.hash,
            message: c.message,
        })
        .collect();

    let base_up_to_date = git_ops::is_rebased_on(&base_branch, head_ref).with_context(|| {
        format!(
            "Failed to compare '{}' with the merge base of {}",
            base_branch, head_ref
        )
    })?;

    Ok(PullRequestMetadata {
        title,
        description,
        labels,
        assignees,
        branch_name,
        base_branch,
        commits,
        base_up_to_date,
    })
}
