use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("dispatch configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },
}

pub type SimResult<T> = Result<T, SimError>;
