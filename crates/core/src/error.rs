//! Error taxonomy for the session core.
//!
//! The retry layers key off the error kind: only [`Error::Timeout`] is ever
//! retried (navigation soft reloads, direct-transport retries); everything
//! else surfaces immediately.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// Incompatible flags or a missing engine capability. Fatal, never retried.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// An operation exceeded its caller-supplied deadline.
	#[error("{operation} timed out after {timeout_ms}ms")]
	Timeout { operation: String, timeout_ms: u64 },

	/// Connection-level failure, distinct from a timeout. Not retried here.
	#[error("network error: {0}")]
	Network(String),

	/// Failure to install or remove a one-shot route handler.
	#[error("interception error: {0}")]
	Interception(String),

	/// A navigation failed and the interception cleanup afterwards failed too.
	/// Both are carried so neither masks the other.
	#[error("navigation failed: {navigation}; cleanup also failed: {cleanup}")]
	NavigationAndCleanup {
		navigation: Box<Error>,
		cleanup: Box<Error>,
	},

	/// Engine or page failure that is neither a timeout nor a network error.
	#[error("engine error: {0}")]
	Engine(String),

	/// A render capability outlived its session.
	#[error("session is closed")]
	SessionClosed,

	#[error(transparent)]
	Url(#[from] url::ParseError),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Shorthand for a timeout of a named operation.
	pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
		Error::Timeout {
			operation: operation.into(),
			timeout_ms,
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout { .. })
	}
}
