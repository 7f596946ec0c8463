//! CLI module for the CODEOWNERS review analyser.
//!
//! This module provides command-line argument parsing using Clap with
//! environment variable support.

pub mod config;
pub mod output;
pub mod source;

use clap::{Parser, ValueEnum};
use codeowners_review_core::UnreviewedAccountPolicy;
use std::path::PathBuf;

/// CODEOWNERS review analyser - reports which owners still have to review a change.
///
/// Matches the changed files against the CODEOWNERS rules, resolves every
/// owner's review state from a review snapshot, and recommends the smallest
/// groups of reviewers that would satisfy the outstanding rules.
#[derive(Parser, Debug)]
#[command(name = "codeowners-review")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the repository root.
    #[arg(long, env = "REPOSITORY_PATH", default_value = ".")]
    pub repository_path: PathBuf,

    /// Path to the CODEOWNERS file.
    /// Defaults to .github/CODEOWNERS, CODEOWNERS or docs/CODEOWNERS in the repository.
    #[arg(long, env = "CODEOWNERS_PATH")]
    pub codeowners: Option<PathBuf>,

    /// File listing the changed paths, one per line.
    /// Blank lines and lines starting with '#' are ignored.
    #[arg(long, env = "CHANGED_FILES")]
    pub changed_files: PathBuf,

    /// JSON file holding the current review snapshot, or a review log with a
    /// `reviews` list (oldest first).
    /// Without it every owner is treated as not yet reviewed.
    #[arg(long, env = "REVIEW_SNAPSHOT")]
    pub review_snapshot: Option<PathBuf>,

    /// How to report named accounts that have neither reviewed nor been requested.
    #[arg(long, env = "UNREVIEWED_ACCOUNTS", default_value = "pending")]
    pub unreviewed_accounts: UnreviewedAccounts,

    /// Abort on the first CODEOWNERS problem instead of reporting it and
    /// carrying on.
    #[arg(long, env = "STRICT_PARSING")]
    pub strict: bool,

    /// Output results as JSON instead of human-readable format.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Handling of accounts with no review activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum UnreviewedAccounts {
    /// Report them as pending.
    #[default]
    Pending,
    /// Leave them out.
    Omit,
}

impl From<UnreviewedAccounts> for UnreviewedAccountPolicy {
    fn from(value: UnreviewedAccounts) -> Self {
        match value {
            UnreviewedAccounts::Pending => UnreviewedAccountPolicy::Pending,
            UnreviewedAccounts::Omit => UnreviewedAccountPolicy::Omit,
        }
    }
}
