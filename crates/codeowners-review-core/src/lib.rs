//! CODEOWNERS Review Core
//!
//! A library for working out who still has to approve a change, given a
//! CODEOWNERS file, the changed paths and the current review status.
//!
//! # Features
//!
//! - **Parser**: Parse CODEOWNERS files into an AST with typed owner tokens
//! - **Matching**: Compile CODEOWNERS glob patterns into path matchers
//! - **Ownership**: Assign each changed file to its governing rule
//! - **Review**: Resolve owners to review states and aggregate them
//! - **Recommendations**: Find every smallest group of reviewers that would
//!   satisfy the outstanding rules
//!
//! # Quick Start
//!
//! ```rust
//! use codeowners_review_core::{
//!     EvaluationConfig, ReviewSnapshot, ReviewState, compile_rules, evaluate, parse_codeowners,
//! };
//!
//! let input = r#"
//! # CODEOWNERS file
//! *.rs @rustacean
//! /docs/ @acme/docs-team
//! "#;
//!
//! let parsed = parse_codeowners(input);
//! let compiled = compile_rules(&parsed.ast);
//! assert!(compiled.is_ok());
//!
//! let snapshot = ReviewSnapshot::new()
//!     .with_user_review("rustacean", ReviewState::Approved)
//!     .with_pending_team("docs-team");
//!
//! let files = ["src/lib.rs", "docs/guide.md"];
//! let evaluation = evaluate(&compiled.rules, &files, &snapshot, &EvaluationConfig::default());
//!
//! assert_eq!(evaluation.overall, ReviewState::Pending);
//! for group in &evaluation.recommendations {
//!     let names: Vec<String> = group.iter().map(|owner| owner.to_string()).collect();
//!     println!("Request review from: {}", names.join(", "));
//! }
//! ```
//!
//! # Modules
//!
//! - [`parse`]: Parser for CODEOWNERS files
//! - [`matching`]: Pattern matching for CODEOWNERS files
//! - [`ownership`]: Rule compilation and file ownership
//! - [`review`]: Review states, snapshots and aggregation
//! - [`solver`]: Minimum hitting sets for reviewer recommendations
//! - [`evaluate`]: The end-to-end evaluation pipeline
//! - [`source`]: Async seam for loading review data

pub mod evaluate;
#[cfg(feature = "generate")]
pub mod generate;
pub mod matching;
pub mod ownership;
pub mod parse;
pub mod review;
pub mod solver;
pub mod source;

// Re-export commonly used types at the crate root
pub use evaluate::{Evaluation, EvaluationConfig, RuleEvaluation, evaluate};
pub use ownership::{CompiledRules, Ownership, Rule, compile_rules, resolve_ownership};
pub use parse::{CodeownersFile, OwnerToken, ParseResult, parse_codeowners};
pub use review::{
    OwnerReviewStatus, ReviewSnapshot, ReviewState, UnreviewedAccountPolicy, resolve_owner,
};
pub use solver::minimum_hitting_sets;
pub use source::{ReviewSource, SourceError, evaluate_from_source};
