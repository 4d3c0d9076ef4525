//! Multi-file runs: one visitor pass per file, grouped results, digest text

use std::path::{Path, PathBuf};

use super::filter::FilterSpec;
use super::syntax::PythonParser;
use super::visitor::Extractor;
use super::{CodeBlock, DocstringEntry, FileExtraction};
use crate::error::{DigestError, ExtractError};

/// What to do when a file fails to parse or render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnParseError {
    /// Stop the run and return the error
    #[default]
    Abort,
    /// Log the failure, record it in [`ExtractionResult::skipped`], continue
    Skip,
}

/// Extraction output for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub path: PathBuf,
    pub extraction: FileExtraction,
}

impl FileGroup {
    /// Base name used in the digest section header
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

/// A file left out of the run under [`OnParseError::Skip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: ExtractError,
}

/// Per-file groups for a whole run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    pub files: Vec<FileGroup>,
    pub skipped: Vec<SkippedFile>,
}

impl ExtractionResult {
    /// Flattened text digest
    ///
    /// Each file with at least one block becomes a section headed by
    /// `# <basename>:`; blocks are newline-joined and sections are
    /// separated by a blank line.
    pub fn digest(&self) -> String {
        let sections: Vec<String> = self
            .files
            .iter()
            .filter(|group| !group.extraction.is_empty())
            .map(|group| {
                let code: Vec<&str> = group
                    .extraction
                    .code_blocks
                    .iter()
                    .map(|block| block.code.as_str())
                    .collect();
                format!("# {}:\n{}\n", group.file_name(), code.join("\n"))
            })
            .collect();
        sections.join("\n")
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.files
            .iter()
            .flat_map(|group| group.extraction.code_blocks.iter())
    }

    pub fn docstrings(&self) -> impl Iterator<Item = &DocstringEntry> {
        self.files
            .iter()
            .flat_map(|group| group.extraction.docstrings.iter())
    }

    pub fn block_count(&self) -> usize {
        self.files.iter().map(|group| group.extraction.len()).sum()
    }
}

/// Runs the extractor over many files with one shared filter
pub struct Aggregator<'f> {
    filter: &'f FilterSpec,
    on_parse_error: OnParseError,
}

impl<'f> Aggregator<'f> {
    pub fn new(filter: &'f FilterSpec) -> Self {
        Self {
            filter,
            on_parse_error: OnParseError::default(),
        }
    }

    pub fn on_parse_error(mut self, policy: OnParseError) -> Self {
        self.on_parse_error = policy;
        self
    }

    /// Read and extract each path in order
    ///
    /// Unreadable files always abort; parse and render failures follow the
    /// configured [`OnParseError`] policy.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ExtractionResult, DigestError> {
        let mut parser = PythonParser::new()?;
        let mut result = ExtractionResult::default();
        if self.filter.is_unrestricted() {
            tracing::debug!("No name filters set; every definition is emitted");
        }

        for path in paths {
            let path = path.as_ref();
            let source = std::fs::read_to_string(path).map_err(|source| DigestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            self.process(&mut parser, path, &source, &mut result)?;
        }

        tracing::info!(
            "Extracted {} blocks from {} files ({} skipped)",
            result.block_count(),
            result.files.len(),
            result.skipped.len()
        );
        Ok(result)
    }

    /// Extract in-memory sources, each named by the path it stands for
    pub fn run_sources<I, P, S>(&self, sources: I) -> Result<ExtractionResult, DigestError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: AsRef<str>,
    {
        let mut parser = PythonParser::new()?;
        let mut result = ExtractionResult::default();
        for (path, source) in sources {
            let path = path.into();
            self.process(&mut parser, &path, source.as_ref(), &mut result)?;
        }
        Ok(result)
    }

    fn process(
        &self,
        parser: &mut PythonParser,
        path: &Path,
        source: &str,
        result: &mut ExtractionResult,
    ) -> Result<(), DigestError> {
        let parsed = parser
            .parse(source)
            .map_err(|e| e.in_file(&path.display().to_string()));

        match parsed {
            Ok(file) => {
                let extraction = Extractor::new(self.filter).extract(file);
                tracing::debug!("{}: {} blocks", path.display(), extraction.len());
                result.files.push(FileGroup {
                    path: path.to_path_buf(),
                    extraction,
                });
                Ok(())
            }
            Err(error) => match self.on_parse_error {
                OnParseError::Abort => Err(error.into()),
                OnParseError::Skip => {
                    tracing::warn!("Skipping {}: {}", path.display(), error);
                    result.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        error,
                    });
                    Ok(())
                }
            },
        }
    }
}
