//! GitHub GraphQL client for the tracked settings file
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Pass repository coordinates as GraphQL variables
//! - 1.0.0: Initial release with blob text and blame range queries

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::error::GithubError;
use super::types::{BlameData, BlameRange, BlobData, GraphQlResponse};
use crate::core::RepoTarget;

pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

const BLOB_QUERY: &str = r#"
query($owner: String!, $name: String!, $expression: String!) {
    repository(owner: $owner, name: $name) {
        object(expression: $expression) {
            ... on Blob {
                text
            }
        }
    }
}"#;

const BLAME_QUERY: &str = r#"
query($owner: String!, $name: String!, $qualifiedName: String!, $path: String!) {
    repository(owner: $owner, name: $name) {
        ref(qualifiedName: $qualifiedName) {
            target {
                ... on Commit {
                    blame(path: $path) {
                        ranges {
                            commit {
                                authoredDate
                                author {
                                    user {
                                        login
                                    }
                                    name
                                }
                            }
                            startingLine
                            endingLine
                        }
                    }
                }
            }
        }
    }
}"#;

/// Read-only access to the tracked file and its blame
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Full text of the tracked file at the tracked branch
    async fn file_text(&self) -> Result<String, GithubError>;

    /// Blame ranges for the same file and branch, in no particular order
    async fn blame_ranges(&self) -> Result<Vec<BlameRange>, GithubError>;
}

pub struct GithubClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    repo: RepoTarget,
}

impl GithubClient {
    pub fn new(token: &str, repo: RepoTarget) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: GRAPHQL_ENDPOINT.to_string(),
            token: token.to_string(),
            repo,
        }
    }

    fn blob_variables(&self) -> Value {
        json!({
            "owner": self.repo.owner,
            "name": self.repo.name,
            "expression": format!("{}:{}", self.repo.branch, self.repo.path),
        })
    }

    fn blame_variables(&self) -> Value {
        json!({
            "owner": self.repo.owner,
            "name": self.repo.name,
            "qualifiedName": self.repo.branch,
            "path": self.repo.path,
        })
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, GithubError> {
        debug!(
            "GraphQL query against {}/{} @ {}",
            self.repo.owner, self.repo.name, self.repo.branch
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, concat!("feature-ping-bot/", env!("CARGO_PKG_VERSION")))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status(status.as_u16()));
        }

        let body: GraphQlResponse<T> = response.json().await?;
        unwrap_graphql(body)
    }
}

/// Surface GraphQL-level errors, which arrive with HTTP 200
fn unwrap_graphql<T>(body: GraphQlResponse<T>) -> Result<T, GithubError> {
    if !body.errors.is_empty() {
        return Err(GithubError::GraphQl(
            body.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    body.data.ok_or(GithubError::MissingData("data"))
}

#[async_trait]
impl SourceHost for GithubClient {
    async fn file_text(&self) -> Result<String, GithubError> {
        let data: BlobData = self.query(BLOB_QUERY, self.blob_variables()).await?;
        data.repository
            .ok_or(GithubError::MissingData("repository"))?
            .object
            .ok_or(GithubError::MissingData("repository.object"))?
            .text
            .ok_or(GithubError::MissingData("repository.object.text"))
    }

    async fn blame_ranges(&self) -> Result<Vec<BlameRange>, GithubError> {
        let data: BlameData = self.query(BLAME_QUERY, self.blame_variables()).await?;
        let blame = data
            .repository
            .ok_or(GithubError::MissingData("repository"))?
            .git_ref
            .ok_or(GithubError::MissingData("repository.ref"))?
            .target
            .ok_or(GithubError::MissingData("repository.ref.target"))?
            .blame
            .ok_or(GithubError::MissingData("repository.ref.target.blame"))?;
        Ok(blame.ranges)
    }
}
