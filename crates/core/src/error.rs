#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Validation failed: {field} {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
