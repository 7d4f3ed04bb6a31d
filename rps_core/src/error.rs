use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpsError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("could not acquire randomness: {0}")]
    Entropy(String),
    #[error("unrecognised command {0:?}, expected one of Q, R, P, S")]
    InvalidCommand(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RpsError>;
