use std::result;

use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("BadRequest: {0}")]
    BadRequest(String),
    #[error("Generator: {0}")]
    Generator(#[from] daycare_gen::Error),
    #[error("Config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),
    #[error("Dotenv: {0:?}")]
    Dotenv(#[from] dotenvy::Error),
}
