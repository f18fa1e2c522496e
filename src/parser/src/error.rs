use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("Field widths must sum to a record length greater than zero")]
    ZeroRecordLength,

    #[error("--famid-len was requested but no family-id prefix can be derived from {0}")]
    MissingFamidWidth(String),

    #[error("{0} already exists. Use --overwrite to force.")]
    CannotOverwrite(String),

    #[error("Failed to serialize command line arguments: {0}")]
    Serialize(String),
}
