//! Launch and navigation option wire types.

use serde::{Deserialize, Serialize};

/// Free-form launch options forwarded to the engine driver as-is.
///
/// Keys are driver-specific (`args`, `proxy`, `slowMo`, ...). `headless` is
/// never carried here; it is a first-class field of the desired engine
/// configuration and overrides any value a caller tries to smuggle in.
pub type LaunchOptions = serde_json::Map<String, serde_json::Value>;

/// When a navigation is considered settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
	Commit,
	#[default]
	Load,
	#[serde(rename = "domcontentloaded")]
	DomContentLoaded,
	#[serde(rename = "networkidle")]
	NetworkIdle,
}

impl std::fmt::Display for WaitUntil {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			WaitUntil::Commit => "commit",
			WaitUntil::Load => "load",
			WaitUntil::DomContentLoaded => "domcontentloaded",
			WaitUntil::NetworkIdle => "networkidle",
		};
		f.write_str(s)
	}
}

/// Proxy settings in the shape engine drivers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
	/// `scheme://host:port`.
	pub server: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
}
