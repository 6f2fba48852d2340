//! Comment lookup by source-location path.

use prost_types::SourceCodeInfo;
use std::collections::HashMap;

/// Leading and trailing comment lines attached to one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    pub leading: Vec<String>,
    pub trailing: Vec<String>,
}

/// Index of comments keyed by descriptor path.
///
/// Paths follow `SourceCodeInfo` conventions: `[4, i]` is the i-th message,
/// `[5, i]` the i-th enum, `[12]` the syntax statement, and so on.
#[derive(Debug, Default)]
pub struct CommentIndex {
    by_path: HashMap<Vec<i32>, Comments>,
}

impl CommentIndex {
    pub fn new(info: Option<&SourceCodeInfo>) -> Self {
        let mut by_path = HashMap::new();
        for location in info.map(|i| i.location.as_slice()).unwrap_or_default() {
            by_path
                .entry(location.path.clone())
                .or_insert_with(|| Comments {
                    leading: comment_lines(location.leading_comments()),
                    trailing: comment_lines(location.trailing_comments()),
                });
        }
        Self { by_path }
    }

    pub fn get(&self, path: &[i32]) -> Comments {
        self.by_path.get(path).cloned().unwrap_or_default()
    }
}

/// Split a raw comment into trimmed lines; empty input yields no lines.
pub fn comment_lines(comment: &str) -> Vec<String> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Vec::new();
    }
    comment.split('\n').map(|line| line.trim().to_string()).collect()
}
