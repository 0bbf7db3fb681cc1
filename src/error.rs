// SPDX-License-Identifier: MPL-2.0
use std::fmt;

use crate::auth::AuthError;

/// Failure categories surfaced to the user.
///
/// The category decides how a failure is presented; see
/// [`crate::notice::Notice::from_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserInput,
    Access,
    Io,
    Identity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The conversion input was empty.
    EmptyInput,
    /// The conversion input did not parse as a finite number.
    InvalidInput(String),
    /// A unit selector did not name one of the supported units.
    UnknownUnit(String),
    /// No save folder has been chosen yet.
    FolderNotSet,
    /// The save folder no longer resolves to a readable directory.
    FolderInaccessible(String),
    Io(String),
    Config(String),
    Auth(AuthError),
}

impl Error {
    /// Returns the i18n message key for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::EmptyInput => "error-empty-input",
            Error::InvalidInput(_) => "error-invalid-input",
            Error::UnknownUnit(_) => "error-unknown-unit",
            Error::FolderNotSet => "error-folder-not-set",
            Error::FolderInaccessible(_) => "error-folder-inaccessible",
            Error::Io(_) => "error-io",
            Error::Config(_) => "error-config",
            Error::Auth(err) => err.i18n_key(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyInput | Error::InvalidInput(_) | Error::UnknownUnit(_) => {
                ErrorCategory::UserInput
            }
            Error::FolderNotSet | Error::FolderInaccessible(_) => ErrorCategory::Access,
            Error::Io(_) | Error::Config(_) => ErrorCategory::Io,
            Error::Auth(_) => ErrorCategory::Identity,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "Please enter a value"),
            Error::InvalidInput(raw) => write!(f, "Invalid input: {}", raw),
            Error::UnknownUnit(raw) => write!(f, "Unknown unit: {}", raw),
            Error::FolderNotSet => write!(f, "No folder selected to save images"),
            Error::FolderInaccessible(e) => write!(f, "Folder not accessible: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Auth(e) => write!(f, "Authentication Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Auth(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn from_toml_error_produces_config_variant() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn input_errors_are_user_input_category() {
        assert_eq!(Error::EmptyInput.category(), ErrorCategory::UserInput);
        assert_eq!(
            Error::InvalidInput("abc".into()).category(),
            ErrorCategory::UserInput
        );
        assert_eq!(
            Error::UnknownUnit("parsec".into()).category(),
            ErrorCategory::UserInput
        );
    }

    #[test]
    fn folder_errors_are_access_category() {
        assert_eq!(Error::FolderNotSet.category(), ErrorCategory::Access);
        assert_eq!(
            Error::FolderInaccessible("gone".into()).category(),
            ErrorCategory::Access
        );
    }

    #[test]
    fn auth_error_keeps_its_own_key() {
        let err: Error = AuthError::Cancelled.into();
        assert_eq!(err.category(), ErrorCategory::Identity);
        assert_eq!(err.i18n_key(), AuthError::Cancelled.i18n_key());
    }

    #[test]
    fn empty_input_message_matches_prompt() {
        assert_eq!(Error::EmptyInput.to_string(), "Please enter a value");
    }
}
