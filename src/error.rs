use thiserror::Error;

pub type Result<T> = std::result::Result<T, LanesplitError>;

#[derive(Debug, Error)]
pub enum LanesplitError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("speed sample is empty")]
    EmptySample,

    #[error("search tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("need at least {needed} points for a degree-{degree} fit, got {got}")]
    TooFewPoints {
        degree: usize,
        needed: usize,
        got: usize,
    },

    #[error("normal equations are singular for a degree-{0} fit")]
    SingularFit(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("plot rendering failed: {0}")]
    Plot(String),
}
