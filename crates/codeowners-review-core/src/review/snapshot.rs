//! The review snapshot a collaborator materializes before evaluation.
//!
//! A snapshot holds everything the resolver needs: the latest review per
//! account and per team, outstanding review requests, and team membership.
//! It is plain data and is never fetched or paginated here.
//!
//! Snapshots are read either in their own shape or as a [`ReviewLog`], the
//! chronological review listing a platform returns, which is reduced to the
//! latest review per account and per team.

use super::ReviewState;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The latest review submitted by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReview {
    /// The review state.
    pub state: ReviewState,
    /// Submission timestamp as reported by the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    /// Link to the review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The latest review submitted on behalf of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamReview {
    /// The review state.
    pub state: ReviewState,
    /// The account that submitted the review.
    #[serde(default)]
    pub by_user: Option<String>,
    /// Submission timestamp as reported by the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    /// Link to the review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One submitted review, as listed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// The reviewer's login, if the author still exists.
    #[serde(default)]
    pub author: Option<String>,
    /// The review state.
    pub state: ReviewState,
    /// Submission timestamp.
    #[serde(default)]
    pub submitted_at: Option<String>,
    /// Slugs of the teams the review was submitted on behalf of.
    #[serde(default)]
    pub on_behalf_of: Vec<String>,
    /// Link to the review.
    #[serde(default)]
    pub url: Option<String>,
}

/// Submitted reviews listed oldest first, with the request and membership
/// data that a listing does not carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewLog {
    /// Every submitted review, oldest first.
    pub reviews: Vec<ReviewEvent>,
    /// Accounts with an outstanding review request.
    #[serde(default)]
    pub pending_users: Vec<String>,
    /// Team slugs with an outstanding review request.
    #[serde(default)]
    pub pending_teams: Vec<String>,
    /// Member logins per `org/slug`.
    #[serde(default)]
    pub team_members: BTreeMap<String, Vec<String>>,
}

impl From<ReviewLog> for ReviewSnapshot {
    fn from(log: ReviewLog) -> Self {
        let mut snapshot =
            ReviewSnapshot::from_events(&log.reviews, log.pending_users, log.pending_teams);
        snapshot.team_members = log.team_members;
        snapshot
    }
}

/// Current review status of a change.
///
/// `team_latest` and `pending_teams` are keyed by team slug;
/// `team_members` is keyed by `org/slug`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    /// Latest review per account login.
    #[serde(default)]
    pub user_latest: BTreeMap<String, UserReview>,
    /// Latest review per team slug.
    #[serde(default)]
    pub team_latest: BTreeMap<String, TeamReview>,
    /// Accounts with an outstanding review request.
    #[serde(default)]
    pub pending_users: Vec<String>,
    /// Team slugs with an outstanding review request.
    #[serde(default)]
    pub pending_teams: Vec<String>,
    /// Member logins per `org/slug`.
    #[serde(default)]
    pub team_members: BTreeMap<String, Vec<String>>,
}

impl ReviewSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from JSON.
    ///
    /// A document with a `reviews` list is read as a [`ReviewLog`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("reviews").is_some() {
            debug!("Reducing review log to a snapshot");
            let log: ReviewLog = serde_json::from_value(value)?;
            return Ok(log.into());
        }
        serde_json::from_value(value)
    }

    /// Builds a snapshot from reviews listed oldest first.
    ///
    /// The newest review per account wins, and likewise per team; a team's
    /// review is attributed to the account that submitted it.
    pub fn from_events(
        events: &[ReviewEvent],
        pending_users: Vec<String>,
        pending_teams: Vec<String>,
    ) -> Self {
        let mut user_latest = BTreeMap::new();
        let mut team_latest = BTreeMap::new();

        for event in events.iter().rev() {
            if let Some(author) = &event.author {
                user_latest
                    .entry(author.clone())
                    .or_insert_with(|| UserReview {
                        state: event.state,
                        submitted_at: event.submitted_at.clone(),
                        url: event.url.clone(),
                    });
            }
            for slug in &event.on_behalf_of {
                team_latest.entry(slug.clone()).or_insert_with(|| TeamReview {
                    state: event.state,
                    by_user: event.author.clone(),
                    submitted_at: event.submitted_at.clone(),
                    url: event.url.clone(),
                });
            }
        }

        Self {
            user_latest,
            team_latest,
            pending_users,
            pending_teams,
            team_members: BTreeMap::new(),
        }
    }

    /// Records the latest review of an account.
    pub fn with_user_review(mut self, login: impl Into<String>, state: ReviewState) -> Self {
        self.user_latest.insert(
            login.into(),
            UserReview {
                state,
                submitted_at: None,
                url: None,
            },
        );
        self
    }

    /// Records the latest review on behalf of a team.
    pub fn with_team_review(
        mut self,
        slug: impl Into<String>,
        state: ReviewState,
        by_user: Option<&str>,
    ) -> Self {
        self.team_latest.insert(
            slug.into(),
            TeamReview {
                state,
                by_user: by_user.map(str::to_string),
                submitted_at: None,
                url: None,
            },
        );
        self
    }

    /// Marks an account as having an outstanding review request.
    pub fn with_pending_user(mut self, login: impl Into<String>) -> Self {
        self.pending_users.push(login.into());
        self
    }

    /// Marks a team slug as having an outstanding review request.
    pub fn with_pending_team(mut self, slug: impl Into<String>) -> Self {
        self.pending_teams.push(slug.into());
        self
    }

    /// Sets the member logins of a team, keyed by `org/slug`.
    pub fn with_team_members<I, S>(mut self, team: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.team_members
            .insert(team.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the latest review state of an account.
    pub fn user_state(&self, login: &str) -> Option<ReviewState> {
        self.user_latest.get(login).map(|review| review.state)
    }

    /// Returns true if the account has an outstanding review request.
    pub fn is_user_pending(&self, login: &str) -> bool {
        self.pending_users.iter().any(|u| u == login)
    }

    /// Returns true if the team slug has an outstanding review request.
    pub fn is_team_pending(&self, slug: &str) -> bool {
        self.pending_teams.iter().any(|t| t == slug)
    }

    /// Returns the member logins of a team, keyed by `org/slug`.
    pub fn members_of(&self, team_key: &str) -> &[String] {
        self.team_members
            .get(team_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
