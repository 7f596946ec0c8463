//! Configuration handling for the CLI.
//!
//! This module converts CLI arguments into the library's configuration
//! types and locates the input files.

use crate::cli::Args;
use codeowners_review_core::parse::{ParseError, ParserConfig, parse_codeowners_with_config};
use codeowners_review_core::{Evaluation, EvaluationConfig, Rule, compile_rules};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Failed to locate the CODEOWNERS file.
    #[error("failed to read CODEOWNERS file: {0}")]
    ReadCodeowners(String),

    /// The CODEOWNERS file has problems and strict parsing is on.
    #[error("invalid CODEOWNERS file ({} issue(s))", .0.len())]
    InvalidCodeowners(Vec<ParseError>),
}

/// Application exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every rule governing a changed file is approved.
    Success = 0,
    /// Application startup failed (wrong configuration or unreadable input).
    StartupFailure = 1,
    /// Application terminated by signal (SIGINT/SIGTERM).
    Terminated = 2,
    /// At least one rule still needs review.
    ReviewsOutstanding = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Compiled CODEOWNERS rules and the problems tolerated while loading them.
#[derive(Debug)]
pub struct LoadedRules {
    /// Rules in declaration order.
    pub rules: Vec<Rule>,
    /// Invalid lines, owners and patterns.
    pub issues: Vec<ParseError>,
}

/// Validated and processed configuration for running the analyser.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Path to the repository root.
    pub repo_path: PathBuf,
    /// Path to the CODEOWNERS file.
    pub codeowners_path: PathBuf,
    /// Path to the changed files list.
    pub changed_files_path: PathBuf,
    /// Path to the review snapshot, if one was given.
    pub snapshot_path: Option<PathBuf>,
    /// Configuration for the CODEOWNERS parser.
    pub parser_config: ParserConfig,
    /// Configuration for the evaluation.
    pub evaluation_config: EvaluationConfig,
    /// Whether to output JSON.
    pub json_output: bool,
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let repo_path = args.repository_path.canonicalize().map_err(|e| {
            ConfigError::Invalid(format!(
                "repository path '{}' is invalid: {}",
                args.repository_path.display(),
                e
            ))
        })?;

        let codeowners_path = match &args.codeowners {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                return Err(ConfigError::ReadCodeowners(format!(
                    "'{}' is not a file",
                    path.display()
                )));
            }
            None => find_codeowners_file(&repo_path)?,
        };

        if !args.changed_files.is_file() {
            return Err(ConfigError::Invalid(format!(
                "changed files list '{}' is not a file",
                args.changed_files.display()
            )));
        }

        if let Some(snapshot) = args.review_snapshot.as_ref().filter(|p| !p.is_file()) {
            return Err(ConfigError::Invalid(format!(
                "review snapshot '{}' is not a file",
                snapshot.display()
            )));
        }

        let parser_config = if args.strict {
            ParserConfig::strict()
        } else {
            ParserConfig::lenient()
        };

        let evaluation_config =
            EvaluationConfig::new().with_unreviewed_accounts(args.unreviewed_accounts.into());

        Ok(Self {
            repo_path,
            codeowners_path,
            changed_files_path: args.changed_files.clone(),
            snapshot_path: args.review_snapshot.clone(),
            parser_config,
            evaluation_config,
            json_output: args.json,
        })
    }

    /// Parses and compiles CODEOWNERS content.
    ///
    /// With strict parsing any problem rejects the file. Otherwise unparsable
    /// lines and bad patterns are skipped, unrecognized owners are kept, and
    /// every problem is returned alongside the rules.
    pub fn load_rules(&self, content: &str) -> Result<LoadedRules, ConfigError> {
        let parsed = parse_codeowners_with_config(content, &self.parser_config);
        let compiled = compile_rules(&parsed.ast);

        let mut issues = parsed.errors;
        issues.extend(compiled.errors);
        if self.parser_config.strict && !issues.is_empty() {
            return Err(ConfigError::InvalidCodeowners(issues));
        }

        Ok(LoadedRules {
            rules: compiled.rules,
            issues,
        })
    }

    /// Determines the exit code for an evaluation.
    pub fn exit_code_for(&self, evaluation: &Evaluation) -> ExitCode {
        if evaluation.is_approved() {
            ExitCode::Success
        } else {
            ExitCode::ReviewsOutstanding
        }
    }
}

/// Finds the CODEOWNERS file in the repository.
///
/// Searches in the following locations (in order):
/// 1. `.github/CODEOWNERS`
/// 2. `CODEOWNERS`
/// 3. `docs/CODEOWNERS`
pub fn find_codeowners_file(repo_path: &Path) -> Result<PathBuf, ConfigError> {
    let locations = [
        repo_path.join(".github/CODEOWNERS"),
        repo_path.join("CODEOWNERS"),
        repo_path.join("docs/CODEOWNERS"),
    ];

    locations.into_iter().find(|p| p.is_file()).ok_or_else(|| {
        ConfigError::ReadCodeowners(format!(
            "CODEOWNERS file not found in repository '{}'. Searched in: .github/CODEOWNERS, CODEOWNERS, docs/CODEOWNERS",
            repo_path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::UnreviewedAccounts;
    use clap::Parser;
    use codeowners_review_core::{ReviewSnapshot, ReviewState, UnreviewedAccountPolicy};
    use codeowners_review_core::{evaluate, parse_codeowners};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".github")).unwrap();
        fs::write(dir.path().join(".github/CODEOWNERS"), "* @owner\n").unwrap();
        fs::write(dir.path().join("changed.txt"), "src/main.rs\n").unwrap();
        dir
    }

    fn args_for(dir: &TempDir, extra: &[&str]) -> Args {
        let changed = dir.path().join("changed.txt");
        let mut argv = vec![
            "codeowners-review".to_string(),
            "--repository-path".to_string(),
            dir.path().to_string_lossy().into_owned(),
            "--changed-files".to_string(),
            changed.to_string_lossy().into_owned(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::parse_from(argv)
    }

    #[test]
    fn test_find_codeowners_github_dir() {
        let dir = create_test_repo();
        let path = find_codeowners_file(dir.path()).unwrap();
        assert!(path.ends_with(".github/CODEOWNERS"));
    }

    #[test]
    fn test_find_codeowners_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CODEOWNERS"), "* @owner\n").unwrap();
        let path = find_codeowners_file(dir.path()).unwrap();
        assert!(path.ends_with("CODEOWNERS"));
        assert!(!path.to_string_lossy().contains(".github"));
    }

    #[test]
    fn test_find_codeowners_docs() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/CODEOWNERS"), "* @owner\n").unwrap();
        let path = find_codeowners_file(dir.path()).unwrap();
        assert!(path.ends_with("docs/CODEOWNERS"));
    }

    #[test]
    fn test_find_codeowners_prefers_github_dir() {
        let dir = create_test_repo();
        fs::write(dir.path().join("CODEOWNERS"), "* @other\n").unwrap();
        let path = find_codeowners_file(dir.path()).unwrap();
        assert!(path.ends_with(".github/CODEOWNERS"));
    }

    #[test]
    fn test_find_codeowners_not_found() {
        let dir = TempDir::new().unwrap();
        let result = find_codeowners_file(dir.path());
        assert!(matches!(result, Err(ConfigError::ReadCodeowners(_))));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::StartupFailure), 1);
        assert_eq!(i32::from(ExitCode::Terminated), 2);
        assert_eq!(i32::from(ExitCode::ReviewsOutstanding), 3);
    }

    #[test]
    fn test_validated_config_defaults() {
        let dir = create_test_repo();
        let config = ValidatedConfig::from_args(&args_for(&dir, &[])).unwrap();

        assert!(config.codeowners_path.ends_with(".github/CODEOWNERS"));
        assert!(config.snapshot_path.is_none());
        assert!(!config.parser_config.strict);
        assert_eq!(
            config.evaluation_config.unreviewed_accounts,
            UnreviewedAccountPolicy::Pending
        );
        assert!(!config.json_output);
    }

    #[test]
    fn test_validated_config_options() {
        let dir = create_test_repo();
        let args = args_for(&dir, &["--strict", "--unreviewed-accounts", "omit", "--json"]);
        assert_eq!(args.unreviewed_accounts, UnreviewedAccounts::Omit);

        let config = ValidatedConfig::from_args(&args).unwrap();
        assert!(config.parser_config.strict);
        assert_eq!(
            config.evaluation_config.unreviewed_accounts,
            UnreviewedAccountPolicy::Omit
        );
        assert!(config.json_output);
    }

    #[test]
    fn test_validated_config_explicit_codeowners() {
        let dir = create_test_repo();
        let custom = dir.path().join("OWNERS");
        fs::write(&custom, "*.rs @rust\n").unwrap();
        let custom_arg = custom.to_string_lossy().into_owned();

        let config =
            ValidatedConfig::from_args(&args_for(&dir, &["--codeowners", &custom_arg])).unwrap();
        assert_eq!(config.codeowners_path, custom);
    }

    #[test]
    fn test_validated_config_missing_inputs() {
        let dir = create_test_repo();
        let missing = dir.path().join("nope.json").to_string_lossy().into_owned();

        let result = ValidatedConfig::from_args(&args_for(&dir, &["--review-snapshot", &missing]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ValidatedConfig::from_args(&args_for(&dir, &["--codeowners", &missing]));
        assert!(matches!(result, Err(ConfigError::ReadCodeowners(_))));
    }

    #[test]
    fn test_validated_config_invalid_repo() {
        let args = Args::parse_from([
            "codeowners-review",
            "--repository-path",
            "/definitely/not/a/repo",
            "--changed-files",
            "changed.txt",
        ]);
        let result = ValidatedConfig::from_args(&args);
        assert!(result.unwrap_err().to_string().contains("repository path"));
    }

    const MIXED_CODEOWNERS: &str = "\
* @acme/everyone
/secure/ @acme/sec security-lead
/gen/***/out @acme/gen
";

    #[test]
    fn test_load_rules_lenient_keeps_rules_with_bad_owners() {
        let dir = create_test_repo();
        let config = ValidatedConfig::from_args(&args_for(&dir, &[])).unwrap();
        let loaded = config.load_rules(MIXED_CODEOWNERS).unwrap();

        assert_eq!(loaded.rules.len(), 2);
        assert_eq!(loaded.issues.len(), 2);
        assert!(matches!(
            &loaded.issues[0],
            ParseError::InvalidOwner { line: 2, owner, .. } if owner == "security-lead"
        ));
        assert!(matches!(&loaded.issues[1], ParseError::InvalidPattern { line: 3, .. }));

        let snapshot = ReviewSnapshot::new().with_team_review(
            "everyone",
            ReviewState::Approved,
            Some("amy"),
        );
        let evaluation = evaluate(
            &loaded.rules,
            &["secure/keys.rs", "gen/x/out"],
            &snapshot,
            &config.evaluation_config,
        );

        // The rule with a bad owner still governs its files; the skipped
        // pattern leaves its files to the catch-all.
        let governing: Vec<(usize, Vec<String>)> = evaluation
            .rules
            .iter()
            .map(|r| (r.rule.line, r.files.clone()))
            .collect();
        assert_eq!(
            governing,
            vec![
                (1, vec!["gen/x/out".to_string()]),
                (2, vec!["secure/keys.rs".to_string()]),
            ]
        );
        assert_eq!(config.exit_code_for(&evaluation), ExitCode::ReviewsOutstanding);
    }

    #[test]
    fn test_load_rules_strict_rejects_file() {
        let dir = create_test_repo();
        let config = ValidatedConfig::from_args(&args_for(&dir, &["--strict"])).unwrap();

        let Err(ConfigError::InvalidCodeowners(issues)) = config.load_rules(MIXED_CODEOWNERS)
        else {
            panic!("Expected strict parsing to reject the file");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line(), 2);

        let loaded = config.load_rules("* @acme/everyone\n\\#notes.md @docs\n").unwrap();
        assert!(loaded.issues.is_empty());
        assert_eq!(loaded.rules[1].pattern, "\\#notes.md");
        assert!(loaded.rules[1].matches("#notes.md"));
    }

    #[test]
    fn test_exit_code_for_evaluation() {
        let dir = create_test_repo();
        let config = ValidatedConfig::from_args(&args_for(&dir, &[])).unwrap();
        let rules = compile_rules(&parse_codeowners("* @owner\n").ast).rules;

        let approved = ReviewSnapshot::new().with_user_review("owner", ReviewState::Approved);
        let evaluation = evaluate(&rules, &["a.rs"], &approved, &config.evaluation_config);
        assert_eq!(config.exit_code_for(&evaluation), ExitCode::Success);

        let evaluation = evaluate(
            &rules,
            &["a.rs"],
            &ReviewSnapshot::new(),
            &config.evaluation_config,
        );
        assert_eq!(config.exit_code_for(&evaluation), ExitCode::ReviewsOutstanding);
    }
}
