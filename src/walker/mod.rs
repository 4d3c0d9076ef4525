//! Input file selection over a directory tree

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};

use crate::config::WalkConfig;
use crate::error::WalkError;
use crate::glob_utils::{compile_patterns, matches_or_empty};

pub struct FileWalker {
    pub(crate) root: PathBuf,
    pub(crate) max_file_size: u64,
    pub(crate) include_patterns: Vec<String>,
    pub(crate) exclude_patterns: Vec<String>,
    pub(crate) ignore_dirs: Vec<String>,
    pub(crate) ignore_files: Vec<String>,
}

impl FileWalker {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_file_size: u64::MAX,
            include_patterns: vec![],
            exclude_patterns: vec![],
            ignore_dirs: vec![],
            ignore_files: vec![],
        }
    }

    /// Walker using the patterns, ignore lists and size limit from `[walk]`
    pub fn from_config(root: impl AsRef<Path>, config: &WalkConfig) -> Self {
        Self::new(root)
            .with_patterns(
                config.include_patterns.clone(),
                config.exclude_patterns.clone(),
            )
            .with_ignores(config.ignore_dirs.clone(), config.ignore_files.clone())
            .with_max_file_size(config.max_file_size)
    }

    /// Include/exclude globs tested against each file name
    pub fn with_patterns(
        mut self,
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
    ) -> Self {
        self.include_patterns = include_patterns;
        self.exclude_patterns = exclude_patterns;
        self
    }

    /// Directory names to prune and file globs to always leave out
    pub fn with_ignores(mut self, ignore_dirs: Vec<String>, ignore_files: Vec<String>) -> Self {
        self.ignore_dirs = ignore_dirs;
        self.ignore_files = ignore_files;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    fn check_root(&self) -> Result<(), WalkError> {
        if !self.root.exists() {
            return Err(WalkError::RootNotFound(self.root.display().to_string()));
        }
        if !self.root.is_dir() {
            return Err(WalkError::NotADirectory(self.root.display().to_string()));
        }
        Ok(())
    }

    /// Sorted walk that never descends into hidden or ignored directories
    fn builder(&self) -> WalkBuilder {
        let pruned: HashSet<String> = self.ignore_dirs.iter().cloned().collect();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !is_pruned_dir(entry, &pruned));
        builder
    }

    /// Collect the files that pass every filter, in path order
    pub fn walk(&self) -> Result<Vec<PathBuf>, WalkError> {
        self.check_root()?;

        let include = compile_patterns(&self.include_patterns)?;
        let exclude = compile_patterns(&self.exclude_patterns)?;
        let ignored = compile_patterns(&self.ignore_files)?;

        let mut files = Vec::new();
        for entry in self.builder().build() {
            let entry = entry.map_err(|e| WalkError::WalkFailed(e.to_string()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !matches_or_empty(&include, &name) || exclude.is_match(&*name) {
                continue;
            }
            if ignored.is_match(&*name) {
                tracing::debug!("Ignoring file: {:?}", entry.path());
                continue;
            }

            if let Ok(metadata) = fs::metadata(entry.path())
                && metadata.len() > self.max_file_size
            {
                tracing::debug!("Skipping large file: {:?}", entry.path());
                continue;
            }

            files.push(entry.into_path());
        }

        tracing::info!("Selected {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Indented listing of the tree, four spaces per level
    ///
    /// Directories end in `/`; ignored files are left out. Include and
    /// exclude patterns are not applied so the listing shows every candidate.
    pub fn render_tree(&self) -> Result<String, WalkError> {
        self.check_root()?;
        let ignored = compile_patterns(&self.ignore_files)?;

        let mut tree = String::new();
        for entry in self.builder().build() {
            let entry = entry.map_err(|e| WalkError::WalkFailed(e.to_string()))?;
            let indent = " ".repeat(4 * entry.depth());
            let name = if entry.depth() == 0 {
                self.root
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.root.display().to_string())
            } else {
                entry.file_name().to_string_lossy().to_string()
            };

            if entry.file_type().is_some_and(|t| t.is_dir()) {
                tree.push_str(&format!("{indent}{name}/\n"));
            } else if !ignored.is_match(&name) {
                tree.push_str(&format!("{indent}{name}\n"));
            }
        }
        Ok(tree)
    }
}

fn is_pruned_dir(entry: &DirEntry, pruned: &HashSet<String>) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || pruned.contains(&*name)
}

/// File names ending in `.py` from a tree listing, in listing order
///
/// Accepts the output of [`FileWalker::render_tree`], possibly hand-edited.
pub fn py_files_from_tree(tree: &str) -> Vec<String> {
    tree.lines()
        .map(str::trim)
        .filter(|line| line.ends_with(".py"))
        .map(str::to_string)
        .collect()
}
