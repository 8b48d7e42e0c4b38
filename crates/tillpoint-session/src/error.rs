//! # Session Errors
//!
//! Errors surfaced to the terminal view by the session layer.
//!
//! ```text
//! CartStore::set_discount ──► validate_discount ──► CoreError ──┐
//! CartStore::set_quantity ──► validate_quantity ──► CoreError ──┤
//!                                                               ├──► SessionError
//! TerminalSettings::load ───► io / toml ───────► ConfigLoadFailed
//! TerminalSettings::save ───► io / toml ───────► ConfigSaveFailed
//! ```

use thiserror::Error;
use tillpoint_core::{CoreError, ValidationError};

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Cart Errors
    // =========================================================================
    /// Cashier input refused at the cart boundary.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Settings failed validation.
    #[error("Invalid terminal settings: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the settings file.
    #[error("Failed to load terminal settings: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the settings file.
    #[error("Failed to save terminal settings: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Core(err.into())
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

impl SessionError {
    /// Returns true if the error came from the settings file or its values.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidConfig(_)
                | SessionError::ConfigLoadFailed(_)
                | SessionError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the error is a refused cashier input the view should
    /// show next to the field.
    pub fn is_input_error(&self) -> bool {
        matches!(self, SessionError::Core(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err: SessionError = ValidationError::Required {
            field: "product id".to_string(),
        }
        .into();
        assert!(err.is_input_error());
        assert!(!err.is_config_error());

        let err = SessionError::InvalidConfig("currency_decimals".to_string());
        assert!(err.is_config_error());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_error_display() {
        let err: SessionError = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        }
        .into();
        assert_eq!(err.to_string(), "Quantity 1200 exceeds maximum allowed (999)");

        let err = SessionError::ConfigLoadFailed("missing field".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to load terminal settings: missing field"
        );
    }
}
