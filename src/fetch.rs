use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::credentials::Credentials;
use crate::github::{Fetcher, RepoSource, RunContext, Walker};
use crate::plugins::{self, Descriptor};
use crate::summary::AggregateResult;

/// Classified pull requests together with the classifier's presentation
/// settings, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    #[serde(flatten)]
    pub result: AggregateResult,
}

/// Build a walker for one run: load the classifier, create a fresh run
/// context and resolve the repository set.
pub async fn connect_walker(config: &Config, credentials: Credentials) -> Result<Walker> {
    let classifier = plugins::load(&config.plugin)?;
    let descriptor = classifier.describe();

    let source = config.repo_source(&descriptor.repos);
    if matches!(&source, RepoSource::List(repos) if repos.is_empty()) {
        anyhow::bail!(
            "No repositories to scan. Set org, user or repos in the config, \
            or pick a plugin that defines its own repositories."
        );
    }

    let retry = config.retry.to_policy()?;
    let context = Arc::new(RunContext::new());
    let fetcher = Fetcher::new(credentials, retry, config.max_workers, context)
        .context("Failed to create GitHub client")?;

    tracing::debug!(plugin = %config.plugin, source = ?source, "Connecting");

    Walker::connect(fetcher, classifier, source, &config.api_url, config.walk_options()?)
        .await
        .context("Failed to list repositories")
}

/// Run a full scan and pair the result with the classifier descriptor.
pub async fn fetch_dashboard(config: &Config, credentials: Credentials) -> Result<Dashboard> {
    let walker = connect_walker(config, credentials).await?;
    let descriptor = walker.classifier().describe();
    let result = walker.search_pulls().await?;
    Ok(Dashboard { descriptor, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::summary::Column;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> Config {
        Config {
            user: Some("octocat".to_string()),
            api_url: server.uri(),
            concurrent: true,
            max_workers: 2,
            retry: RetryConfig {
                delay: "1ms".to_string(),
                backoff: 1.0,
                max_retries: 3,
            },
            ..Config::default()
        }
    }

    async fn mount(server: &MockServer, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_dashboard_end_to_end() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount(
            &server,
            "/users/octocat/repos",
            serde_json::json!([{"url": format!("{}/repos/octocat/hello", base)}]),
        )
        .await;
        mount(
            &server,
            "/repos/octocat/hello",
            serde_json::json!({
                "name": "hello",
                "html_url": "https://github.com/octocat/hello",
                "pulls_url": format!("{}/repos/octocat/hello/pulls{{/number}}", base)
            }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/pulls"))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"url": format!("{}/repos/octocat/hello/pulls/9", base)}
            ])))
            .mount(&server)
            .await;
        mount(
            &server,
            "/repos/octocat/hello/pulls/9",
            serde_json::json!({
                "number": 9,
                "title": "Say hello louder",
                "html_url": "https://github.com/octocat/hello/pull/9",
                "user": {"login": "contributor"},
                "comments": 1,
                "review_comments": 0,
                "comments_url": format!("{}/repos/octocat/hello/issues/9/comments", base),
                "updated_at": "2024-01-15T12:00:00Z"
            }),
        )
        .await;
        mount(
            &server,
            "/repos/octocat/hello/issues/9/comments",
            serde_json::json!([
                {"user": {"login": "octocat"}, "body": "lgtm", "created_at": "2024-01-16T12:00:00Z"}
            ]),
        )
        .await;

        let dashboard = fetch_dashboard(&test_config(&server), Credentials::new("octocat", "t"))
            .await
            .unwrap();

        assert_eq!(dashboard.descriptor.title, "Code Review Dashboard");
        assert_eq!(dashboard.result.pulls.len(), 1);
        let pull = &dashboard.result.pulls[0];
        assert!(pull.following);
        assert_eq!(pull.likes, 1);
        assert_eq!(pull.column, Some(Column::Right));
        // repo listing + repo + pulls + detail + comments
        assert_eq!(dashboard.result.total_requests, 5);
        assert_eq!(dashboard.result.total_tasks, 2);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["template"], "default.html");
        assert_eq!(json["total-requests"], 5);
        assert!(json["rate-limit"].is_null());
    }

    #[tokio::test]
    async fn test_nothing_to_scan_is_an_error() {
        let server = MockServer::start().await;
        let config = Config {
            user: None,
            ..test_config(&server)
        };
        let err = connect_walker(&config, Credentials::new("octocat", "t"))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("No repositories to scan"));
    }

    #[tokio::test]
    async fn test_repository_listing_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = connect_walker(&test_config(&server), Credentials::new("octocat", "t"))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to list repositories"));
        let root = err.root_cause().to_string();
        assert!(root.contains("request failed after 3 retries"));
    }
}
