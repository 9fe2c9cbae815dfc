use anyhow::{anyhow, Result};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

use super::client::Fetcher;
use super::error::FetchError;
use super::types::{Comment, CommitStatus, PullDetail, PullHead, Repository, RepositoryRef};
use crate::plugins::Classifier;
use crate::summary::{AggregateResult, ApprovalPatterns, BuildStatus, Failure, PullSummary};

/// Where the set of scanned repositories comes from
#[derive(Debug, Clone, PartialEq)]
pub enum RepoSource {
    Org(String),
    User(String),
    /// Repository API URLs
    List(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    Sequential,
    /// At most `max_workers` units in flight per fan-out level
    Concurrent { max_workers: usize },
}

#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub concurrency: Concurrency,
    pub approvals: ApprovalPatterns,
    /// Fetch each pull's commit statuses as the external build status
    pub build_status: bool,
    /// Abort the run on the first failed repository or pull request
    pub fail_fast: bool,
}

/// A repository or pull request whose fetch chain failed
struct ItemError {
    target: String,
    error: FetchError,
}

impl ItemError {
    fn new(target: &str, error: FetchError) -> Self {
        Self {
            target: target.to_string(),
            error,
        }
    }

    fn into_failure(self) -> Failure {
        Failure {
            target: self.target,
            message: self.error.to_string(),
        }
    }
}

#[derive(Default)]
struct RepoScan {
    pulls: Vec<PullSummary>,
    failures: Vec<Failure>,
}

/// Walks repositories, their open pull requests and each pull's comments.
pub struct Walker {
    fetcher: Fetcher,
    classifier: Box<dyn Classifier>,
    repos: Vec<String>,
    options: WalkOptions,
}

impl Walker {
    /// Resolve the repository set once and build a walker over it.
    pub async fn connect(
        fetcher: Fetcher,
        classifier: Box<dyn Classifier>,
        source: RepoSource,
        api_url: &str,
        options: WalkOptions,
    ) -> Result<Self, FetchError> {
        let api_url = api_url.trim_end_matches('/');
        let repos = match source {
            RepoSource::Org(org) => {
                list_repos(&fetcher, &format!("{}/orgs/{}/repos", api_url, org)).await?
            }
            RepoSource::User(user) => {
                list_repos(&fetcher, &format!("{}/users/{}/repos", api_url, user)).await?
            }
            RepoSource::List(repos) => repos,
        };
        tracing::debug!(count = repos.len(), "Resolved repositories");

        Ok(Self {
            fetcher,
            classifier,
            repos,
            options,
        })
    }

    pub fn repos(&self) -> &[String] {
        &self.repos
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Scan every repository and classify its open pull requests.
    ///
    /// Failed repositories or pulls are reported in
    /// [`AggregateResult::failures`], unless `fail_fast` is set, in which case
    /// the first failure aborts the run and no further units are started.
    pub async fn search_pulls(&self) -> Result<AggregateResult> {
        let scans = self
            .fan_out(self.repos.clone(), |url| async move { self.analyze_repo(&url).await })
            .await
            .map_err(|e| anyhow!(e.error).context(format!("Failed to analyze {}", e.target)))?;

        let mut result = AggregateResult::default();
        for scan in scans {
            match scan {
                Ok(scan) => {
                    result.pulls.extend(scan.pulls);
                    result.failures.extend(scan.failures);
                }
                Err(e) => {
                    tracing::warn!(repo = %e.target, error = %e.error, "Skipping repository");
                    result.failures.push(e.into_failure());
                }
            }
        }

        let context = self.fetcher.context();
        result.total_tasks = context.total_tasks();
        result.total_requests = context.total_requests();
        result.rate_limit = context.rate_limit();

        tracing::info!(
            pulls = result.pulls.len(),
            failures = result.failures.len(),
            requests = result.total_requests,
            tasks = result.total_tasks,
            rate_limit = ?result.rate_limit,
            "Scan complete"
        );

        Ok(result)
    }

    async fn analyze_repo(&self, repo_url: &str) -> Result<RepoScan, ItemError> {
        let repo: Repository = self
            .fetcher
            .get_as(repo_url, &[])
            .await
            .map_err(|e| ItemError::new(repo_url, e))?;

        let pulls_url = repo.pulls_endpoint();
        let heads: Vec<PullHead> = self
            .fetcher
            .get_as(&pulls_url, &[("state", "open")])
            .await
            .map_err(|e| ItemError::new(&pulls_url, e))?;
        tracing::debug!(repo = %repo.name, open = heads.len(), "Listed open pulls");

        let results = self
            .fan_out(heads, |head| {
                let repo = &repo;
                async move { self.analyze_pull(repo, &head.url).await }
            })
            .await?;

        let mut scan = RepoScan::default();
        for result in results {
            match result {
                Ok(summary) => scan.pulls.push(summary),
                Err(e) => {
                    tracing::warn!(pull = %e.target, error = %e.error, "Skipping pull request");
                    scan.failures.push(e.into_failure());
                }
            }
        }
        Ok(scan)
    }

    async fn analyze_pull(&self, repo: &Repository, pull_url: &str) -> Result<PullSummary, ItemError> {
        let pull: PullDetail = self
            .fetcher
            .get_as(pull_url, &[])
            .await
            .map_err(|e| ItemError::new(pull_url, e))?;

        let comments: Vec<Comment> = self
            .fetcher
            .get_as(&pull.comments_url, &[])
            .await
            .map_err(|e| ItemError::new(&pull.comments_url, e))?;

        let mut summary = PullSummary::from_pull(
            repo,
            &pull,
            &comments,
            self.fetcher.user(),
            &self.options.approvals,
            Utc::now(),
        );

        if self.options.build_status {
            summary.build_status = self.fetch_build_status(&pull).await?;
        }

        self.classifier.parse_pull(&pull, &mut summary);
        for comment in &comments {
            self.classifier.parse_comment(comment, &mut summary);
        }
        let column = self.classifier.classify(&mut summary);
        summary.column = Some(column);

        Ok(summary)
    }

    /// State of the most recent commit status, if any
    async fn fetch_build_status(&self, pull: &PullDetail) -> Result<Option<BuildStatus>, ItemError> {
        let Some(statuses_url) = pull.statuses_url.as_deref() else {
            return Ok(None);
        };
        let statuses: Vec<CommitStatus> = self
            .fetcher
            .get_as(statuses_url, &[])
            .await
            .map_err(|e| ItemError::new(statuses_url, e))?;
        Ok(statuses.first().and_then(|s| BuildStatus::parse(&s.state)))
    }

    /// Run `f` over every item, inline or through a bounded window of
    /// concurrent futures. The order of results is unspecified when
    /// concurrent.
    ///
    /// Without `fail_fast` every unit finishes and failed units are returned
    /// alongside the rest. With `fail_fast` the first failure is returned at
    /// once: units still in the window are dropped and pending items are
    /// never started.
    async fn fan_out<I, F, Fut, T>(
        &self,
        items: Vec<I>,
        f: F,
    ) -> Result<Vec<Result<T, ItemError>>, ItemError>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T, ItemError>>,
    {
        let mut results = Vec::with_capacity(items.len());

        let max_workers = match self.options.concurrency {
            Concurrency::Sequential => {
                for item in items {
                    self.settle(f(item).await, &mut results)?;
                }
                return Ok(results);
            }
            Concurrency::Concurrent { max_workers } => max_workers.max(1),
        };

        let context = self.fetcher.context();
        let mut futures = FuturesUnordered::new();
        let mut pending = items.into_iter();

        // Fill initial window
        for item in pending.by_ref().take(max_workers) {
            context.record_tasks(1);
            futures.push(f(item));
        }

        // Process results and feed new units
        while let Some(result) = futures.next().await {
            self.settle(result, &mut results)?;
            if let Some(item) = pending.next() {
                context.record_tasks(1);
                futures.push(f(item));
            }
        }

        Ok(results)
    }

    /// Keep a unit's result, or hand back its error when failing fast.
    fn settle<T>(
        &self,
        result: Result<T, ItemError>,
        results: &mut Vec<Result<T, ItemError>>,
    ) -> Result<(), ItemError> {
        match result {
            Err(e) if self.options.fail_fast => Err(e),
            other => {
                results.push(other);
                Ok(())
            }
        }
    }
}

async fn list_repos(fetcher: &Fetcher, url: &str) -> Result<Vec<String>, FetchError> {
    let repos: Vec<RepositoryRef> = fetcher.get_as(url, &[]).await?;
    Ok(repos.into_iter().map(|r| r.url).collect())
}
