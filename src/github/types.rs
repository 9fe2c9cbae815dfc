use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::error::FetchError;

/// Timestamp layout used by the GitHub REST API
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a `YYYY-MM-DDTHH:MM:SSZ` timestamp as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, FetchError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| FetchError::Timestamp {
            value: value.to_string(),
        })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// Entry of an org/user repository listing; only the API URL is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub html_url: String,
    pulls_url: String,
}

impl Repository {
    /// Pulls endpoint with the `{/number}` URI template removed
    pub fn pulls_endpoint(&self) -> String {
        self.pulls_url.replace("{/number}", "")
    }
}

/// Entry of a pull request listing
#[derive(Debug, Clone, Deserialize)]
pub struct PullHead {
    pub url: String,
}

/// Full pull request detail
#[derive(Debug, Clone, Deserialize)]
pub struct PullDetail {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: User,
    pub comments: u64,
    pub review_comments: u64,
    pub comments_url: String,
    #[serde(default)]
    pub statuses_url: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl PullDetail {
    /// Issue comments plus review comments, as reported by the API
    pub fn total_comments(&self) -> u64 {
        self.comments + self.review_comments
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub user: User,
    #[serde(default)]
    pub body: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn author(&self) -> &str {
        &self.user.login
    }
}

/// Commit status entry, most recent first in API listings
#[derive(Debug, Clone, Deserialize)]
pub struct CommitStatus {
    pub state: String,
}
