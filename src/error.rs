use crate::cache::MemberKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReflectionError {
    #[error("Ambiguous match: {type_name} declares more than one {kind} named `{name}`")]
    AmbiguousMember {
        kind: MemberKind,
        type_name: String,
        name: String,
    },
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetadataError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Type not found: {0}")]
    TypeNotFound(String),
}
