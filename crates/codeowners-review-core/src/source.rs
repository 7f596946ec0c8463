//! Review data source abstraction.
//!
//! The engine never talks to a hosting platform itself. A [`ReviewSource`]
//! supplies the changed files, the review snapshot and team membership, and
//! [`evaluate_from_source`] feeds them to the synchronous engine.

use crate::evaluate::{Evaluation, EvaluationConfig, evaluate};
use crate::ownership::{Rule, resolve_ownership};
use crate::parse::OwnerToken;
use crate::review::ReviewSnapshot;
use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that can occur when loading review data.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested data does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The data could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data was read but could not be understood.
    #[error("Malformed data: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Malformed(e.to_string())
    }
}

/// Trait for review data providers.
///
/// Implementations might read exported files, call a platform API, or
/// serve fixtures in tests.
///
/// # Example
///
/// ```rust,ignore
/// use codeowners_review_core::review::ReviewSnapshot;
/// use codeowners_review_core::source::{ReviewSource, SourceError};
///
/// struct MySource { /* ... */ }
///
/// #[async_trait::async_trait]
/// impl ReviewSource for MySource {
///     async fn changed_files(&self) -> Result<Vec<String>, SourceError> {
///         Ok(vec!["src/lib.rs".to_string()])
///     }
///
///     async fn review_snapshot(&self) -> Result<ReviewSnapshot, SourceError> {
///         Ok(ReviewSnapshot::default())
///     }
///
///     async fn team_members(&self, org: &str, slug: &str) -> Result<Vec<String>, SourceError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Returns the repo-relative paths changed by the pull request.
    async fn changed_files(&self) -> Result<Vec<String>, SourceError>;

    /// Returns the current review snapshot of the pull request.
    async fn review_snapshot(&self) -> Result<ReviewSnapshot, SourceError>;

    /// Returns the member logins of a team.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization name
    /// * `slug` - The team slug
    async fn team_members(&self, org: &str, slug: &str) -> Result<Vec<String>, SourceError>;
}

/// Fetches the member lists of the given teams concurrently.
///
/// Account tokens are ignored. The result is keyed by `org/slug`.
pub async fn load_team_members(
    source: &dyn ReviewSource,
    teams: &BTreeSet<OwnerToken>,
) -> Result<BTreeMap<String, Vec<String>>, SourceError> {
    let fetches = teams.iter().filter_map(|team| match team {
        OwnerToken::Team { org, slug } => Some(async move {
            trace!("Fetching members of @{}/{}", org, slug);
            let members = source.team_members(org, slug).await?;
            Ok::<_, SourceError>((format!("{}/{}", org, slug), members))
        }),
        OwnerToken::Account { .. } => None,
    });

    let loaded = try_join_all(fetches).await?;
    debug!("Loaded members for {} teams", loaded.len());
    Ok(loaded.into_iter().collect())
}

/// Loads review data from a source and evaluates it.
///
/// Team members are fetched only for teams that own changed files and are
/// not already listed in the snapshot.
pub async fn evaluate_from_source(
    source: &dyn ReviewSource,
    rules: &[Rule],
    config: &EvaluationConfig,
) -> Result<Evaluation, SourceError> {
    let (files, mut snapshot) =
        futures::try_join!(source.changed_files(), source.review_snapshot())?;
    debug!("Loaded {} changed files", files.len());

    let missing: BTreeSet<OwnerToken> = resolve_ownership(rules, &files)
        .team_owners()
        .into_iter()
        .filter(|team| {
            team.team_key()
                .is_some_and(|key| !snapshot.team_members.contains_key(&key))
        })
        .collect();

    if !missing.is_empty() {
        let members = load_team_members(source, &missing).await?;
        snapshot.team_members.extend(members);
    }

    Ok(evaluate(rules, &files, &snapshot, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::compile_rules;
    use crate::parse::parse_codeowners;
    use crate::review::ReviewState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// An in-memory review source for testing.
    struct MemorySource {
        files: Vec<String>,
        snapshot: ReviewSnapshot,
        teams: BTreeMap<(String, String), Vec<String>>,
        team_call_count: AtomicUsize,
    }

    impl MemorySource {
        fn new(files: &[&str], snapshot: ReviewSnapshot) -> Self {
            Self {
                files: files.iter().map(|f| f.to_string()).collect(),
                snapshot,
                teams: BTreeMap::new(),
                team_call_count: AtomicUsize::new(0),
            }
        }

        fn with_team(mut self, org: &str, slug: &str, members: &[&str]) -> Self {
            self.teams.insert(
                (org.to_string(), slug.to_string()),
                members.iter().map(|m| m.to_string()).collect(),
            );
            self
        }

        fn team_calls(&self) -> usize {
            self.team_call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReviewSource for MemorySource {
        async fn changed_files(&self) -> Result<Vec<String>, SourceError> {
            Ok(self.files.clone())
        }

        async fn review_snapshot(&self) -> Result<ReviewSnapshot, SourceError> {
            Ok(self.snapshot.clone())
        }

        async fn team_members(&self, org: &str, slug: &str) -> Result<Vec<String>, SourceError> {
            self.team_call_count.fetch_add(1, Ordering::SeqCst);
            self.teams
                .get(&(org.to_string(), slug.to_string()))
                .cloned()
                .ok_or_else(|| SourceError::NotFound(format!("@{}/{}", org, slug)))
        }
    }

    fn rules(input: &str) -> Vec<Rule> {
        compile_rules(&parse_codeowners(input).ast).rules
    }

    #[tokio::test]
    async fn loads_members_of_teams_only() {
        let source = MemorySource::new(&[], ReviewSnapshot::new())
            .with_team("acme", "core", &["amy", "bob"])
            .with_team("acme", "docs", &["cat"]);
        let owners: BTreeSet<OwnerToken> = [
            OwnerToken::team("acme", "core"),
            OwnerToken::account("dan"),
            OwnerToken::team("acme", "docs"),
        ]
        .into_iter()
        .collect();

        let members = load_team_members(&source, &owners).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members["acme/core"], vec!["amy", "bob"]);
        assert_eq!(members["acme/docs"], vec!["cat"]);
        assert_eq!(source.team_calls(), 2);
    }

    #[tokio::test]
    async fn missing_team_fails_the_load() {
        let source = MemorySource::new(&[], ReviewSnapshot::new());
        let owners: BTreeSet<OwnerToken> = [OwnerToken::team("acme", "gone")].into_iter().collect();

        let result = load_team_members(&source, &owners).await;
        assert!(matches!(result, Err(SourceError::NotFound(team)) if team == "@acme/gone"));
    }

    #[tokio::test]
    async fn evaluates_with_fetched_members() {
        let snapshot = ReviewSnapshot::new().with_user_review("amy", ReviewState::Approved);
        let source = MemorySource::new(&["src/lib.rs", "README.md"], snapshot)
            .with_team("acme", "core", &["amy", "bob"])
            .with_team("acme", "docs", &["cat"]);
        let rules = rules("*.md @acme/docs\n/src/ @acme/core\n");

        let evaluation = evaluate_from_source(&source, &rules, &EvaluationConfig::default())
            .await
            .unwrap();

        assert_eq!(evaluation.rules.len(), 2);
        assert_eq!(evaluation.rules[0].state, ReviewState::Pending);
        assert_eq!(evaluation.rules[1].state, ReviewState::Approved);
        assert_eq!(
            evaluation.recommendations,
            vec![vec![OwnerToken::team("acme", "docs")]]
        );
    }

    #[tokio::test]
    async fn known_members_are_not_fetched_again() {
        let snapshot = ReviewSnapshot::new()
            .with_team_members("acme/core", ["amy"])
            .with_user_review("amy", ReviewState::Approved);
        let source = MemorySource::new(&["src/lib.rs"], snapshot);
        let rules = rules("/src/ @acme/core\n");

        let evaluation = evaluate_from_source(&source, &rules, &EvaluationConfig::default())
            .await
            .unwrap();

        assert!(evaluation.is_approved());
        assert_eq!(source.team_calls(), 0);
    }

    #[test]
    fn source_evaluation_matches_direct_evaluation() {
        let snapshot = ReviewSnapshot::new()
            .with_team_members("acme/core", ["amy"])
            .with_pending_user("amy");
        let files = ["src/a.rs", "b.txt"];
        let source = MemorySource::new(&files, snapshot.clone());
        let rules = rules("* @bob\n/src/ @acme/core\n");
        let config = EvaluationConfig::default();

        let from_source =
            tokio_test::block_on(evaluate_from_source(&source, &rules, &config)).unwrap();
        assert_eq!(from_source, evaluate(&rules, &files, &snapshot, &config));
    }

    #[test]
    fn json_errors_become_malformed() {
        let err: SourceError = serde_json::from_str::<ReviewSnapshot>("{").unwrap_err().into();
        assert!(matches!(err, SourceError::Malformed(_)));
    }
}
