use thiserror::Error;

/// Everything that can go wrong while reading or writing the blog database.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("unable to connect to {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: diesel::ConnectionError,
    },

    #[error("unable to run migrations: {0}")]
    Migration(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("unable to render the configuration: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to start logging: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("unknown action code {0:?}")]
    UnknownAction(String),
}

impl Error {
    /// Whether this is a lookup that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Database(diesel::result::Error::NotFound))
    }
}
