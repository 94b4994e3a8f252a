use thiserror::Error;

/// Errors produced by the simulation library
#[derive(Debug, Error)]
pub enum GameError {
    /// A scene object is missing something it cannot work without
    #[error("{object} is missing a required reference: {what}")]
    MissingReference { object: String, what: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid level: {0}")]
    InvalidLevel(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameError {
    pub fn missing(object: impl Into<String>, what: impl Into<String>) -> Self {
        Self::MissingReference {
            object: object.into(),
            what: what.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_message() {
        let err = GameError::missing("platform_1", "waypoints");
        assert_eq!(
            err.to_string(),
            "platform_1 is missing a required reference: waypoints"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: GameError = parse.unwrap_err().into();
        assert!(matches!(err, GameError::Json(_)));
    }
}
