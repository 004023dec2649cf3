//! Response shapes for the blob and blame queries

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A contiguous span of lines attributed to one commit (1-based, inclusive)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlameRange {
    pub starting_line: usize,
    pub ending_line: usize,
    pub commit: BlameCommit,
}

impl BlameRange {
    pub fn contains(&self, line: usize) -> bool {
        self.starting_line <= line && line <= self.ending_line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlameCommit {
    pub authored_date: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<GitActor>,
}

impl BlameCommit {
    /// Account login when the commit is linked to a user, else the free-text author name
    pub fn author_handle(&self) -> String {
        self.author
            .as_ref()
            .and_then(|a| {
                a.user
                    .as_ref()
                    .map(|u| u.login.clone())
                    .or_else(|| a.name.clone())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub user: Option<GitUser>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitUser {
    pub login: String,
}

// ----------------------------------------------------------------------------
// GraphQL envelopes
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlobData {
    pub repository: Option<BlobRepository>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlobRepository {
    pub object: Option<Blob>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Blob {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlameData {
    pub repository: Option<BlameRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlameRepository {
    #[serde(rename = "ref")]
    pub git_ref: Option<GitRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitRef {
    pub target: Option<RefTarget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefTarget {
    pub blame: Option<Blame>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Blame {
    pub ranges: Vec<BlameRange>,
}
