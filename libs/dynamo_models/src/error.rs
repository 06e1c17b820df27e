use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("DynamoDB {operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    #[error("Stored item could not be decoded: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn backend<E>(operation: &'static str, err: E) -> Self
    where
        E: std::error::Error,
    {
        StoreError::Backend {
            operation,
            message: aws_sdk_dynamodb::error::DisplayErrorContext(err)
                .to_string(),
        }
    }
}
