use thiserror::Error;

impl From<serde_json::Error> for HrisError {
    fn from(err: serde_json::Error) -> Self {
        Self::AuditError(format!("JSON serialization error: {}", err))
    }
}

impl From<sqlx::Error> for HrisError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError(format!("Database error: {}", err))
    }
}

#[derive(Error, Debug)]
pub enum HrisError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Audit trail error: {0}")]
    AuditError(String),

    #[error("Exchange rate error: {0}")]
    RateError(String),
}

impl HrisError {
    pub fn missing_rate(from: &str, to: &str) -> Self {
        Self::RateError(format!(
            "No locked exchange rate available for {} -> {}",
            from, to
        ))
    }
}
