//! CLI entry point for prlint.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

use prlint::metadata::{self, MetadataOverrides};
use prlint::report;
use prlint::rules;

#[derive(Parser)]
#[command(name = "prlint")]
#[command(version)]
#[command(about = "Pull request convention checker", long_about = None)]
#[command(
    after_help = "EXIT CODES:\n    0  all rules passed\n    1  at least one rule violation\n    2  metadata could not be resolved (infrastructure error, not a convention error)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a pull request against the convention rules
    ///
    /// Platform-owned fields (title, description, labels, assignees, branch
    /// name) are queried with `gh pr view`; the commit range comes from the
    /// local repository. Any flag below overrides the queried value, and
    /// with --offline gh is never invoked.
    Check {
        /// Base branch the pull request targets (default: gh's baseRefName, then "main")
        #[arg(long)]
        base: Option<String>,
        /// Head ref of the pull request (default: HEAD)
        #[arg(long)]
        head: Option<String>,
        /// Pull request number (default: the PR for the current branch)
        #[arg(long)]
        pr: Option<u64>,
        /// Pull request title (overrides the value queried via gh)
        #[arg(long)]
        title: Option<String>,
        /// Pull request description (overrides the value queried via gh)
        #[arg(long)]
        body: Option<String>,
        /// Read the pull request description from a file
        #[arg(long, value_name = "PATH", conflicts_with = "body")]
        body_file: Option<PathBuf>,
        /// Pull request label (can be specified multiple times)
        #[arg(long = "label")]
        labels: Vec<String>,
        /// Pull request assignee (can be specified multiple times)
        #[arg(long = "assignee")]
        assignees: Vec<String>,
        /// Head branch name (overrides the value queried via gh)
        #[arg(long)]
        branch: Option<String>,
        /// Commit message prefix marking cherry-picked commits
        #[arg(long, value_name = "PREFIX")]
        cherry_pick_prefix: Option<String>,
        /// Do not invoke gh; use only the supplied flags and local git history
        #[arg(long)]
        offline: bool,
        /// JSON output
        #[arg(long)]
        json: bool,
        /// Only print failures and the summary
        #[arg(long, short)]
        quiet: bool,
    },
    /// Show version information
    Version {
        /// Show additional build information
        #[arg(long, short)]
        verbose: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Keep CI logs free of escape codes when output is piped.
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            2
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check {
            base,
            head,
            pr,
            title,
            body,
            body_file,
            labels,
            assignees,
            branch,
            cherry_pick_prefix,
            offline,
            json,
            quiet,
        } => {
            let description = match body_file {
                Some(path) => Some(std::fs::read_to_string(&path).map_err(|e| {
                    anyhow::anyhow!("Failed to read body file {}: {}", path.display(), e)
                })?),
                None => body,
            };

            let overrides = MetadataOverrides {
                title,
                description,
                labels,
                assignees,
                branch,
            };

            let meta = metadata::resolve(
                base.as_deref(),
                head.as_deref(),
                pr,
                &overrides,
                offline,
            )?;

            let prefix = cherry_pick_prefix
                .as_deref()
                .unwrap_or(rules::CHERRY_PICK_PREFIX);
            let result = rules::validate(&meta, prefix);

            if json {
                report::print_json(&result)?;
            } else {
                report::print_human(&result, quiet);
            }

            Ok(if result.passed { 0 } else { 1 })
        }
        Commands::Version { verbose } => {
            cmd_version(verbose);
            Ok(0)
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "prlint", &mut io::stdout());
            Ok(0)
        }
    }
}

fn cmd_version(verbose: bool) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("prlint {}", VERSION);

    if verbose {
        const GIT_SHA: &str = env!("GIT_SHA");
        const BUILD_DATE: &str = env!("BUILD_DATE");
        println!("commit: {}", GIT_SHA);
        println!("built: {}", BUILD_DATE);
    }
}
