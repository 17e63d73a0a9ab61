//! Storage-state wire shapes: cookies and per-origin localStorage.
//!
//! The JSON layout matches what rendering engines accept when seeding a
//! context and emit when snapshotting one:
//!
//! ```json
//! {
//!   "cookies": [{"name": "...", "value": "...", "domain": "...", ...}],
//!   "origins": [{"origin": "https://example.com",
//!                "localStorage": [{"name": "k", "value": "v"}]}]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// SameSite policy as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WireSameSite {
	#[default]
	Lax,
	Strict,
	None,
}

/// A cookie in storage-state form.
///
/// `expires` is epoch seconds; `-1.0` marks a session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCookie {
	pub name: String,
	pub value: String,
	#[serde(default)]
	pub domain: String,
	#[serde(default = "default_path")]
	pub path: String,
	#[serde(default = "session_expires")]
	pub expires: f64,
	#[serde(default)]
	pub http_only: bool,
	#[serde(default)]
	pub secure: bool,
	#[serde(default)]
	pub same_site: WireSameSite,
}

fn default_path() -> String {
	"/".to_string()
}

fn session_expires() -> f64 {
	-1.0
}

/// One `localStorage` key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStorageEntry {
	pub name: String,
	pub value: String,
}

/// The localStorage contents of a single origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginState {
	pub origin: String,
	#[serde(default)]
	pub local_storage: Vec<LocalStorageEntry>,
}

/// Combined snapshot used to seed or extract a rendering context.
///
/// Session storage is deliberately absent; only cookies and localStorage
/// persist across contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StorageState {
	#[serde(default)]
	pub cookies: Vec<WireCookie>,
	#[serde(default)]
	pub origins: Vec<OriginState>,
}

impl StorageState {
	pub fn is_empty(&self) -> bool {
		self.cookies.is_empty() && self.origins.is_empty()
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}

	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}
}
