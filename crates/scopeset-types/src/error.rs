//! Error type shared by the settings engine and its storage adapters

use std::fmt;

pub type StResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Storage lookup by id found nothing
	NotFound,
	/// Opaque storage failure (connectivity, constraint violation, ...)
	DbError,

	/// A scope type is missing or has malformed settings definitions
	ConfigError(String),
	/// Setting name is not defined in the applicable registry
	NameError(String),
	/// Setting value violates nullability or allowed options
	ValidationError(String),
	/// Raw value could not be converted to or from its declared cast
	CastError(String),
	/// Accessor could not resolve a scope
	ScopeNotInitialized(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::DbError => write!(f, "database error"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::NameError(msg) => write!(f, "{}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::CastError(msg) => write!(f, "cast error: {}", msg),
			Error::ScopeNotInitialized(msg) => write!(f, "{}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::CastError(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_keeps_name_error_message() {
		let err = Error::NameError("Global setting definition does not exist for \"x\"".into());
		assert_eq!(err.to_string(), "Global setting definition does not exist for \"x\"");
	}

	#[test]
	fn test_json_error_maps_to_cast_error() {
		let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
		assert!(matches!(err, Error::CastError(_)));
	}
}

// vim: ts=4
