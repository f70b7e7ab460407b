//! Type definitions for output operations.

use std::path::PathBuf;

/// Where one rendered document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Write content to a file readable only by its owner
    WriteFile { path: PathBuf, content: String },
    /// Print to stdout
    PrintToStdout { content: String },
}

impl DeliveryTarget {
    /// Chooses a file when a path is given, stdout otherwise.
    pub fn for_output(path: Option<PathBuf>, content: String) -> Self {
        match path {
            Some(path) => Self::WriteFile { path, content },
            None => Self::PrintToStdout { content },
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::WriteFile { content, .. } | Self::PrintToStdout { content } => content,
        }
    }
}
