use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("placement grid too small: {needed} occupants, {cells} cells")]
    GridTooSmall { needed: usize, cells: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;
