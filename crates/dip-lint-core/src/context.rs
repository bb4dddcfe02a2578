//! Context types for rule execution.

use crate::model::Position;
use crate::types::Location;
use std::path::{Path, PathBuf};

/// Context provided to rules for one file.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    ///
    /// Files outside `root` keep their full path as the relative path.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number (in characters)
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or the file length if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                let within = line_content
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map_or(line_content.len(), |(idx, _)| idx);
                return offset + within;
            }
            offset += line_content.len();
        }

        offset
    }

    /// Builds a location for `position` covering `length` bytes.
    #[must_use]
    pub fn location(&self, position: Position, length: usize) -> Location {
        Location::new(self.relative_path.clone(), position.line, position.column)
            .with_span(self.offset_for(position.line, position.column), length)
    }
}
