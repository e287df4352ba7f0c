use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReposterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),
}
