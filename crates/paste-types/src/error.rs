use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("paste name must not be empty")]
    EmptyName,

    #[error("paste name too long: {len} characters (max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("paste name contains a control character")]
    ControlCharacter,

    #[error("paste name has leading or trailing whitespace")]
    SurroundingWhitespace,

    #[error("secret hash must not be empty")]
    EmptyHash,
}
