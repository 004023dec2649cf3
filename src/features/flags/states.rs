//! Reconciliation pass: source text + blame + overrides -> feature records

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use std::sync::Arc;

use super::blame::merge_blame_lines;
use super::extractor::extract_features;
use crate::features::pings::PingScheduler;
use crate::github::SourceHost;

/// A feature flag with its computed ping schedule. Rebuilt on every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub name: String,
    pub author: String,
    pub last_modified: DateTime<Utc>,
    pub next_ping: DateTime<Utc>,
}

impl FeatureRecord {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_ping <= now
    }
}

#[derive(Clone)]
pub struct FeatureTracker {
    source: Arc<dyn SourceHost>,
    scheduler: PingScheduler,
}

impl FeatureTracker {
    pub fn new(source: Arc<dyn SourceHost>, scheduler: PingScheduler) -> Self {
        Self { source, scheduler }
    }

    pub fn scheduler(&self) -> &PingScheduler {
        &self.scheduler
    }

    /// Fetch the settings file and its blame, then resolve every declared feature
    pub async fn feature_states(&self) -> Result<Vec<FeatureRecord>> {
        let text = self
            .source
            .file_text()
            .await
            .context("Failed to fetch settings file")?;
        let ranges = self
            .source
            .blame_ranges()
            .await
            .context("Failed to fetch settings blame")?;

        let lines = merge_blame_lines(&text, &ranges);
        let declarations = extract_features(&lines);
        debug!(
            "Merged {} annotated lines from {} blame ranges, {} feature declarations",
            lines.len(),
            ranges.len(),
            declarations.len()
        );

        let mut records = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            let next_ping = self
                .scheduler
                .resolve_next_ping(&declaration.name, declaration.last_modified)
                .await;
            records.push(FeatureRecord {
                name: declaration.name,
                author: declaration.author,
                last_modified: declaration.last_modified,
                next_ping,
            });
        }

        Ok(records)
    }
}
