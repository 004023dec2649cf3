use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned HTTP {0}")]
    Status(u16),

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("GraphQL response is missing {0}")]
    MissingData(&'static str),
}
