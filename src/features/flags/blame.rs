//! Align file lines with blame ranges

use chrono::{DateTime, Utc};

use crate::github::BlameRange;

/// One source line with the commit that last touched it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub text: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

/// Annotate each line of `text` with its blame range's author and date.
///
/// Line numbers count only lines already annotated, so a line with no covering
/// range is dropped and every later line is looked up one position earlier.
/// The first matching range wins when ranges overlap.
pub fn merge_blame_lines(text: &str, ranges: &[BlameRange]) -> Vec<AnnotatedLine> {
    let normalized = text.replace('\r', "");
    let mut annotated: Vec<AnnotatedLine> = Vec::new();

    for line in normalized.split('\n') {
        let line_no = annotated.len() + 1;
        let Some(range) = ranges.iter().find(|r| r.contains(line_no)) else {
            continue;
        };

        annotated.push(AnnotatedLine {
            text: line.to_string(),
            author: range.commit.author_handle(),
            date: range.commit.authored_date,
        });
    }

    annotated
}
