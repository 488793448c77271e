//! Reading sources and queries from a file, stdin or the command line.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot use both inline {what} text and a {what} file")]
    Ambiguous { what: &'static str },

    #[error("{what} required (file path, \"-\" for stdin, or inline text)")]
    Missing { what: &'static str },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read stdin: {0}")]
    Stdin(#[source] io::Error),
}

/// Where a text comes from, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    path: Option<PathBuf>,
    text: Option<String>,
}

/// A loaded text and the name to show in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub name: String,
    pub text: String,
}

impl SourceInput {
    pub fn new(path: Option<PathBuf>, text: Option<String>) -> Self {
        Self { path, text }
    }

    /// `what` names the input in error messages ("source", "query").
    pub fn load(&self, what: &'static str) -> Result<Loaded, SourceError> {
        match (&self.path, &self.text) {
            (Some(_), Some(_)) => Err(SourceError::Ambiguous { what }),
            (None, None) => Err(SourceError::Missing { what }),
            (None, Some(text)) => Ok(Loaded {
                name: format!("<inline {what}>"),
                text: text.clone(),
            }),
            (Some(path), None) if path.as_os_str() == "-" => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .map_err(SourceError::Stdin)?;
                Ok(Loaded {
                    name: "<stdin>".to_string(),
                    text,
                })
            }
            (Some(path), None) => {
                let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
                    path: path.clone(),
                    source,
                })?;
                Ok(Loaded {
                    name: path.display().to_string(),
                    text,
                })
            }
        }
    }
}
