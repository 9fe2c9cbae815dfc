use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::github::{Concurrency, RepoSource, RetryPolicy, WalkOptions};
use crate::summary::ApprovalPatterns;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Dashboard configuration.
///
/// Example YAML:
/// ```yaml
/// org: jclouds
/// login: octocat
/// plugin: jclouds
/// concurrent: true
/// max_workers: 8
/// retry:
///   delay: "1s"
///   backoff: 2
///   max_retries: 5
/// ok_patterns: ['\+1', '(?i)lgtm']
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Scan every repository of this organization
    #[serde(default)]
    pub org: Option<String>,

    /// Scan every repository of this user
    #[serde(default)]
    pub user: Option<String>,

    /// Explicit repository API URLs
    #[serde(default)]
    pub repos: Vec<String>,

    /// Authenticated GitHub login (falls back to PR_DASH_GH_USER)
    #[serde(default)]
    pub login: Option<String>,

    /// Classifier name
    #[serde(default = "default_plugin")]
    pub plugin: String,

    #[serde(default)]
    pub concurrent: bool,

    /// Width of each fan-out window and cap on in-flight requests
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Regexes identifying approval comments
    #[serde(default = "default_ok_patterns")]
    pub ok_patterns: Vec<String>,

    /// Fetch commit statuses as the external build status
    #[serde(default)]
    pub build_status: bool,

    /// Abort the whole run on the first failed repository or pull
    #[serde(default)]
    pub fail_fast: bool,

    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Initial backoff delay, humantime format ("500ms", "2s")
    #[serde(default = "default_delay")]
    pub delay: String,

    #[serde(default = "default_backoff")]
    pub backoff: f64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            backoff: default_backoff(),
            max_retries: default_max_retries(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let delay = humantime::parse_duration(self.delay.trim())
            .with_context(|| format!("Invalid retry delay '{}'", self.delay))?;
        Ok(RetryPolicy::new(delay, self.backoff, self.max_retries))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            org: None,
            user: None,
            repos: Vec::new(),
            login: None,
            plugin: default_plugin(),
            concurrent: false,
            max_workers: default_max_workers(),
            retry: RetryConfig::default(),
            ok_patterns: default_ok_patterns(),
            build_status: false,
            fail_fast: false,
            debug: false,
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Repository source by priority: org, user, explicit list, then the
    /// classifier's own repository scope.
    pub fn repo_source(&self, plugin_repos: &[String]) -> RepoSource {
        if let Some(org) = &self.org {
            RepoSource::Org(org.clone())
        } else if let Some(user) = &self.user {
            RepoSource::User(user.clone())
        } else if !self.repos.is_empty() {
            RepoSource::List(self.repos.clone())
        } else {
            RepoSource::List(plugin_repos.to_vec())
        }
    }

    pub fn concurrency(&self) -> Concurrency {
        if self.concurrent {
            Concurrency::Concurrent {
                max_workers: self.max_workers,
            }
        } else {
            Concurrency::Sequential
        }
    }

    pub fn walk_options(&self) -> Result<WalkOptions> {
        Ok(WalkOptions {
            concurrency: self.concurrency(),
            approvals: ApprovalPatterns::compile(&self.ok_patterns)?,
            build_status: self.build_status,
            fail_fast: self.fail_fast,
        })
    }
}

fn default_plugin() -> String {
    "default".to_string()
}

fn default_max_workers() -> usize {
    8
}

fn default_delay() -> String {
    "1s".to_string()
}

fn default_backoff() -> f64 {
    2.0
}

fn default_max_retries() -> u32 {
    5
}

fn default_ok_patterns() -> Vec<String> {
    vec![r"\+1".to_string(), "(?i)lgtm".to_string()]
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
