use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown profile key: {0}")]
    UnknownKey(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
