//! # Feature Flags
//!
//! Turns the tracked settings file into feature records: merges file text with
//! blame, keeps the lines that open a `"feature_*": {` block and attaches each
//! feature's next ping date.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod blame;
pub mod extractor;
pub mod states;

pub use blame::{merge_blame_lines, AnnotatedLine};
pub use extractor::{extract_features, parse_feature_name, FeatureDeclaration};
pub use states::{FeatureRecord, FeatureTracker};
