use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("expected {expected} landmarks per hand, found {found}")]
    LandmarkCount { expected: usize, found: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
