//! Pick feature-flag declaration lines out of the annotated settings file

use chrono::{DateTime, Utc};

use super::blame::AnnotatedLine;

/// Declaration lines look like `"feature_name": {`
const KEY_PREFIX: &str = "\"feature_";
const BLOCK_SUFFIX: &str = "\": {";

/// A feature flag as declared in the source, before ping scheduling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDeclaration {
    pub name: String,
    pub author: String,
    pub last_modified: DateTime<Utc>,
}

/// Feature name (including its `feature_` prefix) when `line` opens a flag block
pub fn parse_feature_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if !trimmed.starts_with(KEY_PREFIX) || !trimmed.ends_with(BLOCK_SUFFIX) {
        return None;
    }
    Some(&trimmed[1..trimmed.len() - BLOCK_SUFFIX.len()])
}

/// One declaration per matching line, in source order. Repeated keys are not merged.
pub fn extract_features(lines: &[AnnotatedLine]) -> Vec<FeatureDeclaration> {
    lines
        .iter()
        .filter_map(|line| {
            parse_feature_name(&line.text).map(|name| FeatureDeclaration {
                name: name.to_string(),
                author: line.author.clone(),
                last_modified: line.date,
            })
        })
        .collect()
}
