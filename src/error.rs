//! Error types for the route helper compiler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Router resolution error: {message}")]
    RouterResolution { message: String },

    #[error("Helper name collision: '{name}' is generated for {}", routes.join(", "))]
    NameCollision { name: String, routes: Vec<String> },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

impl GeneratorError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn router(message: impl Into<String>) -> Self {
        Self::RouterResolution {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Collision error naming every route (as `VERB /path`) that produced `name`
    pub fn collision(name: impl Into<String>, routes: Vec<String>) -> Self {
        Self::NameCollision {
            name: name.into(),
            routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_message_lists_routes() {
        let err = GeneratorError::collision(
            "help_index_path",
            vec!["GET /help".to_string(), "GET /admin/help".to_string()],
        );
        let message = err.to_string();
        assert!(message.contains("help_index_path"));
        assert!(message.contains("GET /help, GET /admin/help"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        match GeneratorError::from(io) {
            GeneratorError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected IO error"),
        }
    }
}
