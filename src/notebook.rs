//! Notebook assembly from extraction results
//!
//! Each accepted definition becomes a code cell, preceded by a quoted
//! markdown cell when it has a docstring. Output follows nbformat v4.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NotebookError;
use crate::extract::{DocstringEntry, ExtractionResult};

const NBFORMAT: u32 = 4;
const NBFORMAT_MINOR: u32 = 5;

/// A single notebook cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        id: String,
        #[serde(default)]
        metadata: Map<String, Value>,
        source: String,
    },
    Code {
        id: String,
        #[serde(default)]
        metadata: Map<String, Value>,
        source: String,
        execution_count: Option<u32>,
        #[serde(default)]
        outputs: Vec<Value>,
    },
}

impl Cell {
    pub fn source(&self) -> &str {
        match self {
            Cell::Markdown { source, .. } | Cell::Code { source, .. } => source,
        }
    }

    pub fn is_markdown(&self) -> bool {
        matches!(self, Cell::Markdown { .. })
    }
}

/// An nbformat v4 notebook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: Map<String, Value>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

impl Default for Notebook {
    fn default() -> Self {
        let mut language_info = Map::new();
        language_info.insert("name".to_string(), Value::String("python".to_string()));
        let mut metadata = Map::new();
        metadata.insert("language_info".to_string(), Value::Object(language_info));

        Self {
            cells: Vec::new(),
            metadata,
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }
}

/// Markdown blockquote of a docstring, one `> ` per line
pub fn quote_docstring(docstring: &str) -> String {
    format!("> {}", docstring.replace('\n', "\n> "))
}

impl Notebook {
    /// Alternate documentation and code cells for every file group
    pub fn from_result(result: &ExtractionResult) -> Self {
        let mut notebook = Self::default();
        for group in &result.files {
            for (entry, block) in group.extraction.pairs() {
                notebook.push_definition(entry, &block.code);
            }
        }
        notebook
    }

    fn push_definition(&mut self, entry: &DocstringEntry, code: &str) {
        if let Some(docstring) = &entry.docstring {
            let id = self.next_id();
            self.cells.push(Cell::Markdown {
                id,
                metadata: Map::new(),
                source: quote_docstring(docstring),
            });
        }
        let id = self.next_id();
        self.cells.push(Cell::Code {
            id,
            metadata: Map::new(),
            source: code.to_string(),
            execution_count: None,
            outputs: Vec::new(),
        });
    }

    fn next_id(&self) -> String {
        format!("cell-{}", self.cells.len())
    }

    pub fn to_json(&self) -> Result<String, NotebookError> {
        serde_json::to_string_pretty(self).map_err(|e| NotebookError::Serialize(e.to_string()))
    }

    /// Write the notebook, creating parent directories as needed
    pub fn write(&self, path: &Path) -> Result<(), NotebookError> {
        let write_err = |e: std::io::Error| NotebookError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(write_err)?;
        tracing::info!("Wrote {} notebook cells to {}", self.cells.len(), path.display());
        Ok(())
    }
}
