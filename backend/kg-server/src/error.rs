use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] kg_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] kg_db::DbError),

    #[error("Auth setup error: {0}")]
    Auth(#[from] kg_auth::AuthError),

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
