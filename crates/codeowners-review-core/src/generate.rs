//! Random fixture generation for benchmarking and testing.
//!
//! Generates CODEOWNERS files, changed-file lists and review snapshots from
//! a shared vocabulary, so generated files actually match generated rules
//! and generated reviews land on generated owners.
//!
//! Note: Generated ASTs have placeholder spans (all zeros). Do not use
//! for operations that depend on accurate span information.

use crate::parse::{CodeownersFile, Line, OwnerToken, Pattern, Span};
use crate::review::{ReviewSnapshot, ReviewState};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Configuration for generating fixtures.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of rule lines to generate.
    pub num_rules: usize,
    /// Number of comment lines to generate.
    pub num_comments: usize,
    /// Maximum owners per rule (1-4 typical).
    pub max_owners_per_rule: usize,
    /// Number of changed files to generate.
    pub num_changed_files: usize,
    /// Number of submitted reviews in the generated snapshot.
    pub num_reviews: usize,
    /// Seed for deterministic generation.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_rules: 100,
            num_comments: 20,
            max_owners_per_rule: 4,
            num_changed_files: 50,
            num_reviews: 4,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with specified rules and proportional comments
    /// and changed files.
    pub fn new(num_rules: usize) -> Self {
        Self {
            num_rules,
            num_comments: num_rules / 5,
            num_changed_files: (num_rules / 2).max(1),
            ..Default::default()
        }
    }

    /// Small fixture (~10 rules).
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Medium fixture (~100 rules).
    pub fn medium() -> Self {
        Self::new(100)
    }

    /// Large fixture (~1000 rules).
    pub fn large() -> Self {
        Self::new(1_000)
    }

    /// Extra large fixture (~10k rules).
    pub fn xlarge() -> Self {
        Self::new(10_000)
    }

    /// Set the random seed for deterministic generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of comments explicitly.
    pub fn with_comments(mut self, num_comments: usize) -> Self {
        self.num_comments = num_comments;
        self
    }

    /// Set the maximum owners per rule.
    pub fn with_max_owners(mut self, max: usize) -> Self {
        self.max_owners_per_rule = max.max(1);
        self
    }

    /// Set the number of changed files.
    pub fn with_changed_files(mut self, num_changed_files: usize) -> Self {
        self.num_changed_files = num_changed_files;
        self
    }

    /// Set the number of submitted reviews.
    pub fn with_reviews(mut self, num_reviews: usize) -> Self {
        self.num_reviews = num_reviews;
        self
    }
}

/// Vocabulary for generating realistic patterns, paths and owners.
mod vocabulary {
    pub const PATTERN_TEMPLATES: &[&str] = &[
        "*.{ext}",
        "**/*.{ext}",
        "/{dir}/",
        "/{dir}/**",
        "/{dir}/*.{ext}",
        "/src/{dir}/",
        "/src/**/*.{ext}",
        "/{dir}/**/test_*.{ext}",
        "docs/**/*.md",
    ];

    pub const PATH_TEMPLATES: &[&str] = &[
        "file.{ext}",
        "{dir}/file.{ext}",
        "{dir}/sub/nested.{ext}",
        "{dir}/sub/test_example.{ext}",
        "src/{dir}/mod.rs",
        "docs/guide/guide.md",
    ];

    pub const EXTENSIONS: &[&str] = &["rs", "py", "js", "ts", "go", "md", "yaml", "json", "toml"];
    pub const DIRECTORIES: &[&str] = &[
        "src", "lib", "tests", "docs", "config", "scripts", "api", "core",
    ];
    pub const USERNAMES: &[&str] = &["alice", "bob", "charlie", "dev", "maintainer", "reviewer"];
    pub const ORGS: &[&str] = &["acme", "github", "myorg"];
    pub const TEAMS: &[&str] = &["core", "platform", "frontend", "backend", "infra", "docs"];
    pub const SECTION_NAMES: &[&str] = &["Frontend", "Backend", "Infrastructure", "Documentation"];
    pub const REVIEW_STATES: &[&str] = &["APPROVED", "CHANGES_REQUESTED", "COMMENTED", "DISMISSED"];
}

/// Owner type distribution weights (must sum to 100).
const WEIGHT_USER: u32 = 50;
const WEIGHT_TEAM: u32 = 30;
// Remaining weight (20) goes to email

/// Probability of inserting a comment section header (percentage).
const COMMENT_PROBABILITY: u32 = 20;

/// Placeholder span for generated AST nodes.
fn placeholder_span() -> Span {
    Span::new(0, 0, 0, 0)
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

/// Generates a random CODEOWNERS AST based on configuration.
pub fn generate_ast(config: &GeneratorConfig) -> CodeownersFile {
    use vocabulary::*;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let capacity = config.num_rules + config.num_comments + 10;
    let mut lines = Vec::with_capacity(capacity);

    lines.push(Line::comment(
        " Auto-generated CODEOWNERS for benchmarking",
        placeholder_span(),
    ));
    lines.push(Line::blank(placeholder_span()));

    let mut rules_added = 0;
    let mut comments_added = 0;

    while rules_added < config.num_rules {
        if comments_added < config.num_comments
            && rules_added > 0
            && rng.random_ratio(COMMENT_PROBABILITY, 100)
        {
            let section = pick(&mut rng, SECTION_NAMES);
            lines.push(Line::blank(placeholder_span()));
            lines.push(Line::comment(
                format!(" {} section", section),
                placeholder_span(),
            ));
            comments_added += 1;
        }

        let template = pick(&mut rng, PATTERN_TEMPLATES);
        let ext = pick(&mut rng, EXTENSIONS);
        let dir = pick(&mut rng, DIRECTORIES);
        let pattern_text = template.replace("{ext}", ext).replace("{dir}", dir);
        let pattern = Pattern::new(pattern_text, placeholder_span());

        let num_owners = rng.random_range(1..=config.max_owners_per_rule);
        let owners: Vec<OwnerToken> = (0..num_owners).map(|_| generate_owner(&mut rng)).collect();

        lines.push(Line::rule(pattern, owners, placeholder_span()));
        rules_added += 1;
    }

    CodeownersFile::new(lines)
}

/// Generate a random owner based on weighted distribution.
fn generate_owner(rng: &mut StdRng) -> OwnerToken {
    use vocabulary::*;

    let roll = rng.random_range(0..100);

    if roll < WEIGHT_USER {
        OwnerToken::account(pick(rng, USERNAMES))
    } else if roll < WEIGHT_USER + WEIGHT_TEAM {
        OwnerToken::team(pick(rng, ORGS), pick(rng, TEAMS))
    } else {
        OwnerToken::account(format!("{}@example.com", pick(rng, USERNAMES)))
    }
}

/// Generates a CODEOWNERS file as a string.
pub fn generate(config: &GeneratorConfig) -> String {
    generate_ast(config).to_string()
}

/// Generates changed file paths shaped like the generated patterns.
pub fn generate_changed_files(config: &GeneratorConfig) -> Vec<String> {
    use vocabulary::*;

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    (0..config.num_changed_files)
        .map(|_| {
            let template = pick(&mut rng, PATH_TEMPLATES);
            let ext = pick(&mut rng, EXTENSIONS);
            let dir = pick(&mut rng, DIRECTORIES);
            template.replace("{ext}", ext).replace("{dir}", dir)
        })
        .collect()
}

/// Generates a review snapshot over the generated owner vocabulary.
///
/// Every team gets a member list, some accounts and teams get reviews, and
/// some are left with outstanding requests.
pub fn generate_snapshot(config: &GeneratorConfig) -> ReviewSnapshot {
    use vocabulary::*;

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(2));
    let mut snapshot = ReviewSnapshot::new();

    for org in ORGS {
        for team in TEAMS {
            let members: Vec<&str> = USERNAMES
                .iter()
                .copied()
                .filter(|_| rng.random_ratio(1, 3))
                .collect();
            snapshot = snapshot.with_team_members(format!("{}/{}", org, team), members);
        }
    }

    for _ in 0..config.num_reviews {
        let state = ReviewState::from_platform(pick(&mut rng, REVIEW_STATES));
        let login = pick(&mut rng, USERNAMES);
        if rng.random_ratio(1, 4) {
            snapshot = snapshot.with_team_review(pick(&mut rng, TEAMS), state, Some(login));
        }
        snapshot = snapshot.with_user_review(login, state);
    }

    for login in USERNAMES {
        if snapshot.user_state(login).is_none() && rng.random_ratio(1, 2) {
            snapshot = snapshot.with_pending_user(*login);
        }
    }
    for team in TEAMS {
        if !snapshot.team_latest.contains_key(*team) && rng.random_ratio(1, 4) {
            snapshot = snapshot.with_pending_team(*team);
        }
    }

    snapshot
}
