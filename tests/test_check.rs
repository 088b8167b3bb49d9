//! End-to-end validation tests: resolve metadata from a real scratch repo
//! in offline mode and run the full rule set over it.

mod common;

use anyhow::Result;
use serial_test::serial;
use tempfile::TempDir;

use prlint::metadata::{self, MetadataOverrides};
use prlint::rules::{self, CHERRY_PICK_PREFIX};

const CHECKED_DESCRIPTION: &str = "Adds image upload to user profiles.\n\n\
    - [x] I have added tests, or done manual regression tests\n\
    - [x] I have updated the documentation, if necessary\n";

fn overrides(title: &str) -> MetadataOverrides {
    MetadataOverrides {
        title: Some(title.to_string()),
        description: Some(CHECKED_DESCRIPTION.to_string()),
        labels: vec!["enhancement".to_string()],
        assignees: vec!["octocat".to_string()],
        branch: None,
    }
}

fn failed_rules(result: &rules::ValidationResult) -> Vec<&'static str> {
    result
        .outcomes
        .iter()
        .filter(|o| !o.passed())
        .map(|o| o.rule)
        .collect()
}

#[test]
#[serial]
fn test_clean_branch_passes_all_rules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = temp_dir.path();
    common::setup_test_repo(repo)?;

    common::git(repo, &["checkout", "-b", "profile-image-upload"])?;
    common::commit_file(repo, "upload.txt", "Add profile image upload")?;
    common::commit_file(repo, "tests.txt", "Add upload regression tests")?;

    let _cwd = common::DirGuard::change_to(repo)?;

    let meta = metadata::resolve(
        Some("main"),
        None,
        None,
        &overrides("Add user profile image upload functionality"),
        true,
    )?;

    assert_eq!(meta.branch_name, "profile-image-upload");
    assert_eq!(meta.commits.len(), 2);
    assert!(meta.base_up_to_date);

    let result = rules::validate(&meta, CHERRY_PICK_PREFIX);
    assert!(result.passed, "unexpected failures: {:?}", failed_rules(&result));
    Ok(())
}

#[test]
#[serial]
fn test_violating_branch_reports_every_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = temp_dir.path();
    common::setup_test_repo(repo)?;

    // Branch with a badly formed message, then a merge commit, while main
    // moves ahead so the branch is also stale.
    common::git(repo, &["checkout", "-b", "Feature/NewLogin"])?;
    common::commit_file(repo, "login.txt", "fix login stuff.")?;

    common::git(repo, &["checkout", "main"])?;
    common::commit_file(repo, "main.txt", "Advance main")?;

    common::git(repo, &["checkout", "Feature/NewLogin"])?;
    common::git(repo, &["merge", "--no-ff", "main", "-m", "Merge branch 'main'"])?;

    let _cwd = common::DirGuard::change_to(repo)?;

    let meta = metadata::resolve(
        Some("main"),
        None,
        None,
        &overrides("Add new login flow"),
        true,
    )?;

    let result = rules::validate(&meta, CHERRY_PICK_PREFIX);
    assert!(!result.passed);

    let failed = failed_rules(&result);
    assert!(failed.contains(&"branch/name-format"));
    assert!(failed.contains(&"history/linear"));
    assert!(failed.contains(&"commits/capitalized"));
    assert!(failed.contains(&"commits/no-trailing-period"));
    // The merge commit brought main's tip in, so the merge-base equals the
    // base tip; the up-to-date rule is about rebasing, and a merge does not
    // satisfy linearity even when it catches the branch up.
    assert!(failed.contains(&"history/linear"));

    // Title and description rules still ran and passed.
    assert!(result
        .outcomes
        .iter()
        .any(|o| o.rule == "title/capitalized" && o.passed()));
    Ok(())
}

#[test]
#[serial]
fn test_stale_branch_fails_up_to_date_rule() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = temp_dir.path();
    common::setup_test_repo(repo)?;

    common::git(repo, &["checkout", "-b", "stale-work"])?;
    common::commit_file(repo, "work.txt", "Add work")?;

    common::git(repo, &["checkout", "main"])?;
    common::commit_file(repo, "main.txt", "Advance main")?;
    common::git(repo, &["checkout", "stale-work"])?;

    let _cwd = common::DirGuard::change_to(repo)?;

    let meta = metadata::resolve(Some("main"), None, None, &overrides("Add work"), true)?;

    assert!(!meta.base_up_to_date);
    let result = rules::validate(&meta, CHERRY_PICK_PREFIX);
    assert!(failed_rules(&result).contains(&"history/up-to-date"));
    Ok(())
}

#[test]
#[serial]
fn test_unresolvable_base_is_operational_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = temp_dir.path();
    common::setup_test_repo(repo)?;

    common::git(repo, &["checkout", "-b", "some-work"])?;
    common::commit_file(repo, "work.txt", "Add work")?;

    let _cwd = common::DirGuard::change_to(repo)?;

    let result = metadata::resolve(
        Some("no-such-base"),
        None,
        None,
        &overrides("Add work"),
        true,
    );

    // Acquisition failure: no rule verdicts, just an error.
    assert!(result.is_err());
    Ok(())
}

#[test]
#[serial]
fn test_full_overrides_skip_platform_query() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = temp_dir.path();
    common::setup_test_repo(repo)?;

    common::git(repo, &["checkout", "-b", "covered-work"])?;
    common::commit_file(repo, "work.txt", "Add work")?;

    let _cwd = common::DirGuard::change_to(repo)?;

    // Not offline, but every platform-owned field is supplied. The scratch
    // repo has no remote, so a gh query would fail and surface as an error
    // here if it were still issued.
    let mut overrides = overrides("Add fully specified work");
    overrides.branch = Some("covered-work".to_string());
    let meta = metadata::resolve(Some("main"), None, None, &overrides, false)?;

    assert_eq!(meta.branch_name, "covered-work");
    let result = rules::validate(&meta, CHERRY_PICK_PREFIX);
    assert!(result.passed, "unexpected failures: {:?}", failed_rules(&result));
    Ok(())
}
