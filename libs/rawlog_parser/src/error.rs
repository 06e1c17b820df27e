use thiserror::Error;

pub type RawLogResult<T> = Result<T, RawLogError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RawLogError {
    #[error("Expected {expected} comma separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("Field `{field}` is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}
