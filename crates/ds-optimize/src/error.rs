use ds_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error(transparent)]
    Sim(#[from] SimError),
}

pub type OptimizeResult<T> = Result<T, OptimizeError>;
