use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Expected a JSON object of numeric fields, found {0}")]
    NotAnObject(String),
}
