use std::fmt;

use thiserror::Error;

/// Why a proposed output name was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameProblem {
    NotAnIdentifier { segment: String },
    WrongDepth { expected: usize, found: usize },
    TooDeep { found: usize },
}

impl fmt::Display for NameProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameProblem::NotAnIdentifier { segment } => {
                write!(f, "'{segment}' is not an identifier")
            }
            NameProblem::WrongDepth { expected, found } => {
                write!(f, "expected {expected} namespace dot(s), found {found}")
            }
            NameProblem::TooDeep { found } => {
                write!(f, "{found} dots is past the limit of 5")
            }
        }
    }
}

/// Everything that can end a session short of the generator itself
/// succeeding. All of these are detected before any file is written, except
/// [`Error::Generation`] which surfaces a failure of the external generator.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no template name provided")]
    MissingTemplate,

    #[error("bad argument \"{0}\"")]
    MalformedArgument(String),

    #[error(
        "the \"{0}\" argument is not supported by this front end; \
         invoke the underlying generator directly if you need it"
    )]
    UnsupportedArgument(String),

    #[error("not a valid dotted name \"{name}\" ({problem})")]
    InvalidName { name: String, problem: NameProblem },

    #[error("{rendered}")]
    ConfigFormat { rendered: String },

    #[error("circular configuration reference: {}", .cycle.join(" -> "))]
    CircularReference { cycle: Vec<String> },

    #[error("configuration references unknown variable \"{0}\"")]
    UnknownVariable(String),

    #[error("no such template: {0}")]
    TemplateNotFound(String),

    #[error("generation failed: {0}")]
    Generation(String),
}
