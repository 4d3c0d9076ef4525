//! Glob pattern matching utilities for file name filtering

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::WalkError;

/// Compile patterns into one set, matched fnmatch-style against file names
///
/// `*` crosses `/` here because patterns are only ever tested against a
/// single path component.
///
/// # Examples
///
/// ```
/// use pydigest::glob_utils::compile_patterns;
///
/// let set = compile_patterns(&["*.py".to_string(), "*test*".to_string()]).unwrap();
/// assert!(set.is_match("models.py"));
/// assert!(set.is_match("test_models.txt"));
/// assert!(!set.is_match("README.md"));
/// ```
pub fn compile_patterns(patterns: &[String]) -> Result<GlobSet, WalkError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|e| WalkError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.kind().to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| WalkError::InvalidPattern {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })
}

/// Whether `name` matches any pattern in the set; an empty set matches everything
pub fn matches_or_empty(set: &GlobSet, name: &str) -> bool {
    set.is_empty() || set.is_match(name)
}
