use thiserror::Error;

pub type Result<T> = std::result::Result<T, CasError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CasError {
    #[error("parse error: {message} (at offset {offset} in '{input}')")]
    Parse {
        input: String,
        offset: usize,
        message: String,
    },
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("cannot evaluate: {0}")]
    Evaluation(String),
    #[error("cannot solve: {0}")]
    Solve(String),
    #[error("{0}")]
    Variable(String),
}

impl CasError {
    pub(crate) fn parse(input: &str, offset: usize, message: impl Into<String>) -> Self {
        CasError::Parse {
            input: input.to_string(),
            offset,
            message: message.into(),
        }
    }
}
