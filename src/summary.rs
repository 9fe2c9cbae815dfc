use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::github::types::{Comment, PullDetail, Repository};

/// Dashboard column a pull request is bucketed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    Middle,
    Right,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Left, Column::Middle, Column::Right];
}

/// External CI state reported through the commit status API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Success,
    Failure,
    Pending,
    Error,
}

impl BuildStatus {
    pub fn parse(state: &str) -> Option<Self> {
        match state {
            "success" => Some(BuildStatus::Success),
            "failure" => Some(BuildStatus::Failure),
            "pending" => Some(BuildStatus::Pending),
            "error" => Some(BuildStatus::Error),
            _ => None,
        }
    }
}

/// Timestamps of build-status markers found in comments
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildMarkers {
    pub oks: Vec<DateTime<Utc>>,
    pub fails: Vec<DateTime<Utc>>,
    pub unstable: Vec<DateTime<Utc>>,
}

impl BuildMarkers {
    /// Sort every list most recent first
    pub fn sort_descending(&mut self) {
        for list in [&mut self.oks, &mut self.fails, &mut self.unstable] {
            list.sort_unstable_by(|a, b| b.cmp(a));
        }
    }
}

/// One open pull request as shown on the dashboard.
///
/// The core fields are filled by the walker; `obsolete`, `build_status`,
/// `markers`, the `total_*` counts and `column` belong to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullSummary {
    pub title: String,
    pub url: String,
    pub number: u64,
    pub likes: u32,
    pub comments: u64,
    pub following: bool,
    pub repo_name: String,
    pub repo_url: String,
    pub author: String,
    /// Whole days since the last update
    pub old: i64,
    pub obsolete: bool,
    pub build_status: Option<BuildStatus>,
    pub markers: BuildMarkers,
    pub total_oks: usize,
    pub total_fails: usize,
    pub total_unstable: usize,
    pub column: Option<Column>,
}

impl PullSummary {
    /// Reduce a fetched pull request and its comments into a summary.
    pub fn from_pull(
        repo: &Repository,
        pull: &PullDetail,
        comments: &[Comment],
        user: &str,
        approvals: &ApprovalPatterns,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: pull.title.clone(),
            url: pull.html_url.clone(),
            number: pull.number,
            likes: approvals.count_likes(comments),
            comments: pull.total_comments(),
            following: is_following(comments, user),
            repo_name: repo.name.clone(),
            repo_url: repo.html_url.clone(),
            author: pull.user.login.clone(),
            old: days_since(pull.updated_at, now),
            obsolete: false,
            build_status: None,
            markers: BuildMarkers::default(),
            total_oks: 0,
            total_fails: 0,
            total_unstable: 0,
            column: None,
        }
    }

    /// Short reference in the format "repo#123"
    pub fn short_ref(&self) -> String {
        format!("{}#{}", self.repo_name, self.number)
    }
}

/// A repository or pull request that could not be fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub target: String,
    pub message: String,
}

/// Everything one dashboard run produced
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AggregateResult {
    pub pulls: Vec<PullSummary>,
    pub total_tasks: u64,
    pub total_requests: u64,
    pub rate_limit: Option<u64>,
    pub failures: Vec<Failure>,
}

impl AggregateResult {
    pub fn in_column(&self, column: Column) -> impl Iterator<Item = &PullSummary> {
        self.pulls
            .iter()
            .filter(move |pull| pull.column == Some(column))
    }
}

/// Compiled approval regexes, e.g. `\+1` or `(?i)lgtm`
#[derive(Debug, Clone, Default)]
pub struct ApprovalPatterns {
    patterns: Vec<Regex>,
}

impl ApprovalPatterns {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref())
                    .with_context(|| format!("Invalid approval pattern '{}'", p.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_match(&self, body: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(body))
    }

    /// Number of comments matching at least one pattern
    pub fn count_likes(&self, comments: &[Comment]) -> u32 {
        comments.iter().filter(|c| self.is_match(&c.body)).count() as u32
    }
}

/// True iff `user` authored at least one comment
pub fn is_following(comments: &[Comment], user: &str) -> bool {
    comments.iter().any(|c| c.author() == user)
}

/// Whole days elapsed from `updated_at` to `now`, truncated
pub fn days_since(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - updated_at).num_days()
}
