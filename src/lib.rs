//! # prlint - pull request convention checker
//!
//! prlint validates the metadata of a single pull request against a fixed
//! set of contribution conventions and reports every violation in one run,
//! so a contributor never has to fix issues one CI round-trip at a time.
//!
//! ## What gets checked
//!
//! - **Title**: capitalization, terminal punctuation, single sentence, and
//!   not an auto-generated branch-name shape
//! - **Description**: no self-reference, no leftover template placeholder,
//!   required checklist lines checked
//! - **Metadata**: labels and assignees present
//! - **Branch name**: lowercase letters, digits, and hyphens only
//! - **History**: no merge commits; rebased on the latest base branch tip
//! - **Commit messages**: same sentence rules as titles, with exemptions
//!   for cherry-picked and co-authored commits
//!
//! ## Modules
//!
//! - [`metadata`] - `PullRequestMetadata` and its resolution from git and gh
//! - [`rules`] - the convention rules and the `validate` entry point
//! - [`report`] - human and JSON rendering of validation results
//! - [`git_ops`] - low-level git command wrappers
//! - [`github`] - `gh pr view --json` queries
//!
//! ## Example
//!
//! ```no_run
//! use prlint::metadata::{self, MetadataOverrides};
//! use prlint::rules::{self, CHERRY_PICK_PREFIX};
//!
//! let overrides = MetadataOverrides::default();
//! let meta = metadata::resolve(Some("main"), None, None, &overrides, false)
//!     .expect("Failed to resolve pull request metadata");
//!
//! let result = rules::validate(&meta, CHERRY_PICK_PREFIX);
//! if !result.passed {
//!     for outcome in result.outcomes.iter().filter(|o| !o.passed()) {
//!         eprintln!("{}: {}", outcome.rule, outcome.text);
//!     }
//! }
//! ```

pub mod git_ops;
pub mod github;
pub mod metadata;
pub mod report;
pub mod rules;
