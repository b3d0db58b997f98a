//! Error taxonomy. Configuration and catalog errors are fatal; search
//! failures surface the last blame message from a failing constraint.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}: {1}")]
    Io(String, String),
    #[error("malformed catalog row: \"{line}\"")]
    MalformedRow { line: String },
    #[error("card \"{card}\" has an unbalanced paren in interaction \"{token}\"")]
    UnbalancedParens { card: String, token: String },
    #[error("card \"{card}\" has an unparseable cost target \"{token}\"")]
    CostTargetParse { card: String, token: String },
    #[error("malformed box file line {line}: \"{text}\"")]
    MalformedBoxLine { line: usize, text: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown group \"{0}\"")]
    UnknownGroup(String),
    #[error("unknown box \"{0}\"")]
    UnknownBox(String),
    #[error("unknown card \"{0}\"")]
    UnknownCard(String),
    #[error("catalog has no \"base\" group to seed a selection from")]
    MissingBaseGroup,
    #[error("unknown type \"{0}\" in --min-type/--max-type")]
    UnknownType(String),
    #[error("malformed --min-type/--max-type value \"{0}\", expected Type:N")]
    MalformedTypeQuota(String),
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct SearchError {
    pub message: String,
}

impl SearchError {
    pub fn new(message: impl Into<String>) -> Self {
        SearchError {
            message: message.into(),
        }
    }
}
