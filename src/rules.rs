//! Convention rules for pull request metadata.
//!
//! The validator is a fixed, ordered list of independent checks. Every check
//! runs regardless of earlier failures so a contributor sees all violations
//! in one run, and the aggregate verdict is the AND of all outcomes. Checks
//! are pure predicates over [`PullRequestMetadata`]; no check performs I/O
//! or depends on another check's outcome.

use regex::Regex;
use serde::Serialize;

use crate::metadata::{Commit, PullRequestMetadata};

/// Default prefix marking commits cherry-picked from an upstream pull
/// request. Such messages originate from a non-rewritable source and are
/// exempt from the single-line and single-sentence rules.
pub const CHERRY_PICK_PREFIX: &str = "PlatformPlatform PR ";

/// Trailer line marking a co-authored commit (written by external tooling).
const CO_AUTHOR_TRAILER: &str = "Co-authored-by:";

/// Abbreviations that may legitimately end a sentence-boundary-looking token.
const ALLOWED_ABBREVIATIONS: [&str; 4] = ["incl.", "e.g.", "etc.", "i.e."];

const TESTS_CHECKLIST_LINE: &str =
    "- [x] I have added tests, or done manual regression tests";
const DOCS_CHECKLIST_LINE: &str =
    "- [x] I have updated the documentation, if necessary";
const PLACEHOLDER_TEXT: &str = "Please delete this paragraph";

/// Verdict of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Pass,
    Fail,
}

/// Outcome of one evaluated rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    /// Stable rule identifier, e.g. `title/capitalized`.
    pub rule: &'static str,
    pub severity: Severity,
    /// Human-readable line; on failure includes the offending value.
    pub text: String,
}

impl RuleOutcome {
    fn pass(rule: &'static str, text: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Pass,
            text: text.into(),
        }
    }

    fn fail(rule: &'static str, text: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Fail,
            text: text.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.severity == Severity::Pass
    }
}

/// Aggregate result of a validation run.
///
/// Invariant: `passed` is true iff every outcome is a pass.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    /// One entry per rule, in evaluation order.
    pub outcomes: Vec<RuleOutcome>,
}

/// Exemption flags for a commit message, computed once per message and
/// consumed by the rules that honor them.
#[derive(Debug, Clone, Copy)]
pub struct Exemption {
    /// Message starts with the cherry-pick marker prefix.
    pub cherry_picked: bool,
    /// Message carries a co-authorship trailer line.
    pub co_authored: bool,
}

impl Exemption {
    pub fn of(message: &str, cherry_pick_prefix: &str) -> Self {
        Self {
            cherry_picked: message.starts_with(cherry_pick_prefix),
            co_authored: message
                .lines()
                .any(|line| line.trim_start().starts_with(CO_AUTHOR_TRAILER)),
        }
    }

    pub fn any(&self) -> bool {
        self.cherry_picked || self.co_authored
    }
}

/// Evaluate every rule against the metadata and return the full outcome list.
///
/// Rules never short-circuit; the final verdict is the AND of all outcomes.
pub fn validate(meta: &PullRequestMetadata, cherry_pick_prefix: &str) -> ValidationResult {
    let description = meta.description.as_deref().unwrap_or("");

    let outcomes = vec![
        check_title_capitalized(&meta.title),
        check_title_no_trailing_period(&meta.title),
        check_title_single_sentence(&meta.title),
        check_title_not_branch_name(&meta.title),
        check_description_no_self_reference(description),
        check_description_no_placeholder(description),
        check_description_checklist(
            "description/tests-checklist",
            description,
            TESTS_CHECKLIST_LINE,
        ),
        check_description_checklist(
            "description/docs-checklist",
            description,
            DOCS_CHECKLIST_LINE,
        ),
        check_labels_present(&meta.labels),
        check_assignees_present(&meta.assignees),
        check_branch_name_format(&meta.branch_name),
        check_history_linear(&meta.commits),
        check_history_up_to_date(meta.base_up_to_date, &meta.base_branch),
        check_commits_single_line(&meta.commits, cherry_pick_prefix),
        check_commits_capitalized(&meta.commits),
        check_commits_no_trailing_period(&meta.commits),
        check_commits_single_sentence(&meta.commits, cherry_pick_prefix),
    ];

    let passed = outcomes.iter().all(RuleOutcome::passed);
    ValidationResult { passed, outcomes }
}

// --- shared predicates ---

fn starts_with_uppercase(text: &str) -> bool {
    text.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// True when `text` ends with `token` as a whole token: at the start of
/// the string or preceded by a space. A bare suffix match is not enough,
/// otherwise words merely ending in an abbreviation (e.g. "libetc.")
/// would slip through.
fn ends_with_token(text: &str, token: &str) -> bool {
    match text.strip_suffix(token) {
        Some(head) => head.is_empty() || head.ends_with(' '),
        None => false,
    }
}

/// True if `text` ends with a period that does not terminate `etc.`.
fn has_forbidden_trailing_period(text: &str) -> bool {
    text.ends_with('.') && !ends_with_token(text, "etc.")
}

/// True if `text` contains a period-space-uppercase sequence that is not
/// preceded by an allowed abbreviation. Such a sequence signals a second
/// sentence.
fn has_second_sentence(text: &str) -> bool {
    let boundary = Regex::new(r"\. [A-Z]").unwrap();
    for m in boundary.find_iter(text) {
        // Slice up to and including the period, then check whether the
        // token it terminates is an allowed abbreviation.
        let head = &text[..m.start() + 1];
        if !ALLOWED_ABBREVIATIONS
            .iter()
            .any(|abbr| ends_with_token(head, abbr))
        {
            return true;
        }
    }
    false
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(7)]
}

fn list_ids(commits: impl Iterator<Item = impl AsRef<str>>) -> String {
    commits
        .map(|id| short_id(id.as_ref()).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// --- title rules ---

fn check_title_capitalized(title: &str) -> RuleOutcome {
    const RULE: &str = "title/capitalized";
    if starts_with_uppercase(title) {
        RuleOutcome::pass(RULE, "title starts with an uppercase letter")
    } else {
        RuleOutcome::fail(
            RULE,
            format!("title '{}' must start with an uppercase letter", title),
        )
    }
}

fn check_title_no_trailing_period(title: &str) -> RuleOutcome {
    const RULE: &str = "title/no-trailing-period";
    if has_forbidden_trailing_period(title) {
        RuleOutcome::fail(RULE, format!("title '{}' must not end with a period", title))
    } else {
        RuleOutcome::pass(RULE, "title does not end with a period")
    }
}

fn check_title_single_sentence(title: &str) -> RuleOutcome {
    const RULE: &str = "title/single-sentence";
    if has_second_sentence(title) {
        RuleOutcome::fail(
            RULE,
            format!("title '{}' must be a single sentence", title),
        )
    } else {
        RuleOutcome::pass(RULE, "title is a single sentence")
    }
}

fn check_title_not_branch_name(title: &str) -> RuleOutcome {
    const RULE: &str = "title/not-branch-name";
    // Heuristic for titles left as the auto-generated branch name: a short
    // alphanumeric prefix, a space, then digits (e.g. "Xyz 123").
    let branch_shape = Regex::new(r"(?i)^[a-z0-9]{1,4} [0-9]+").unwrap();
    if branch_shape.is_match(title) {
        RuleOutcome::fail(
            RULE,
            format!(
                "title '{}' looks like an auto-generated branch name; describe the change instead",
                title
            ),
        )
    } else {
        RuleOutcome::pass(RULE, "title does not look like a branch name")
    }
}

// --- description rules ---

fn check_description_no_self_reference(description: &str) -> RuleOutcome {
    const RULE: &str = "description/no-self-reference";
    let phrase = Regex::new(r"(?i)\bpull[- ]request\b").unwrap();
    if phrase.is_match(description) {
        RuleOutcome::fail(
            RULE,
            "description must describe the change, not refer to itself as a pull request",
        )
    } else {
        RuleOutcome::pass(RULE, "description does not refer to itself")
    }
}

fn check_description_no_placeholder(description: &str) -> RuleOutcome {
    const RULE: &str = "description/no-placeholder";
    if description.contains(PLACEHOLDER_TEXT) {
        RuleOutcome::fail(
            RULE,
            format!(
                "description still contains the template placeholder '{}'",
                PLACEHOLDER_TEXT
            ),
        )
    } else {
        RuleOutcome::pass(RULE, "description contains no template placeholder")
    }
}

fn check_description_checklist(
    rule: &'static str,
    description: &str,
    line: &str,
) -> RuleOutcome {
    if description.contains(line) {
        RuleOutcome::pass(rule, "checklist line is checked")
    } else {
        RuleOutcome::fail(
            rule,
            format!("description is missing the checked line '{}'", line),
        )
    }
}

// --- metadata rules ---

fn check_labels_present(labels: &[String]) -> RuleOutcome {
    const RULE: &str = "labels/present";
    if labels.is_empty() {
        RuleOutcome::fail(RULE, "pull request must have at least one label")
    } else {
        RuleOutcome::pass(RULE, format!("{} label(s) set", labels.len()))
    }
}

fn check_assignees_present(assignees: &[String]) -> RuleOutcome {
    const RULE: &str = "assignees/present";
    if assignees.is_empty() {
        RuleOutcome::fail(RULE, "pull request must have at least one assignee")
    } else {
        RuleOutcome::pass(RULE, format!("{} assignee(s) set", assignees.len()))
    }
}

// --- branch rule ---

fn check_branch_name_format(branch_name: &str) -> RuleOutcome {
    const RULE: &str = "branch/name-format";
    let format = Regex::new(r"^[a-z0-9-]+$").unwrap();
    if format.is_match(branch_name) {
        RuleOutcome::pass(RULE, "branch name uses lowercase letters, digits, and hyphens")
    } else {
        RuleOutcome::fail(
            RULE,
            format!(
                "branch name '{}' must contain only lowercase letters, digits, and hyphens",
                branch_name
            ),
        )
    }
}

// --- history rules ---

fn check_history_linear(commits: &[Commit]) -> RuleOutcome {
    const RULE: &str = "history/linear";
    let merges: Vec<&str> = commits
        .iter()
        .filter(|c| c.is_merge)
        .map(|c| c.id.as_str())
        .collect();
    if merges.is_empty() {
        RuleOutcome::pass(RULE, "branch history contains no merge commits")
    } else {
        RuleOutcome::fail(
            RULE,
            format!(
                "branch must be linear; merge commits found: {}",
                list_ids(merges.into_iter())
            ),
        )
    }
}

fn check_history_up_to_date(base_up_to_date: bool, base_branch: &str) -> RuleOutcome {
    const RULE: &str = "history/up-to-date";
    if base_up_to_date {
        RuleOutcome::pass(RULE, format!("branch is rebased on the latest '{}'", base_branch))
    } else {
        RuleOutcome::fail(
            RULE,
            format!("branch is not rebased on the latest '{}'", base_branch),
        )
    }
}

// --- commit message rules ---

fn check_commits_single_line(commits: &[Commit], cherry_pick_prefix: &str) -> RuleOutcome {
    const RULE: &str = "commits/single-line";
    let offenders: Vec<&str> = commits
        .iter()
        .filter(|c| c.message.trim().contains('\n'))
        .filter(|c| !Exemption::of(&c.message, cherry_pick_prefix).any())
        .map(|c| c.id.as_str())
        .collect();
    if offenders.is_empty() {
        RuleOutcome::pass(RULE, "all commit messages are single-line")
    } else {
        RuleOutcome::fail(
            RULE,
            format!(
                "commit messages must be a single line: {}",
                list_ids(offenders.into_iter())
            ),
        )
    }
}

fn check_commits_capitalized(commits: &[Commit]) -> RuleOutcome {
    const RULE: &str = "commits/capitalized";
    let offenders: Vec<&str> = commits
        .iter()
        .filter(|c| !starts_with_uppercase(&c.message))
        .map(|c| c.id.as_str())
        .collect();
    if offenders.is_empty() {
        RuleOutcome::pass(RULE, "all commit messages start with an uppercase letter")
    } else {
        RuleOutcome::fail(
            RULE,
            format!(
                "commit messages must start with an uppercase letter: {}",
                list_ids(offenders.into_iter())
            ),
        )
    }
}

fn check_commits_no_trailing_period(commits: &[Commit]) -> RuleOutcome {
    const RULE: &str = "commits/no-trailing-period";
    // Applied to the subject line only: exempt multi-line messages
    // legitimately end in trailer lines.
    let offenders: Vec<&str> = commits
        .iter()
        .filter(|c| has_forbidden_trailing_period(c.message.lines().next().unwrap_or("")))
        .map(|c| c.id.as_str())
        .collect();
    if offenders.is_empty() {
        RuleOutcome::pass(RULE, "no commit subject ends with a period")
    } else {
        RuleOutcome::fail(
            RULE,
            format!(
                "commit subjects must not end with a period: {}",
                list_ids(offenders.into_iter())
            ),
        )
    }
}

fn check_commits_single_sentence(commits: &[Commit], cherry_pick_prefix: &str) -> RuleOutcome {
    const RULE: &str = "commits/single-sentence";
    let offenders: Vec<&str> = commits
        .iter()
        .filter(|c| has_second_sentence(&c.message))
        .filter(|c| !Exemption::of(&c.message, cherry_pick_prefix).cherry_picked)
        .map(|c| c.id.as_str())
        .collect();
    if offenders.is_empty() {
        RuleOutcome::pass(RULE, "all commit messages are a single sentence")
    } else {
        RuleOutcome::fail(
            RULE,
            format!(
                "commit messages must be a single sentence: {}",
                list_ids(offenders.into_iter())
            ),
        )
    }
}
