//! Direct HTTP transport seam.
//!
//! The wire-level client (TLS/HTTP fingerprint impersonation included) is an
//! external collaborator; the session only composes requests, applies cookie
//! state, and classifies failures as timeout vs. network.

use std::time::Duration;

use async_trait::async_trait;
use hs_protocol::ProxySettings;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::http::{Headers, HttpMethod};

/// Named TLS/HTTP fingerprint profile forwarded to the transport untouched.
///
/// Profile databases are out of scope here; `Named` carries whatever
/// identifier the transport understands (`"chrome120"`, `"firefox135"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImpersonationProfile {
	/// No impersonation; the transport's native fingerprint.
	#[default]
	Off,
	Named(String),
}

impl ImpersonationProfile {
	pub fn named(profile: impl Into<String>) -> Self {
		ImpersonationProfile::Named(profile.into())
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			ImpersonationProfile::Off => None,
			ImpersonationProfile::Named(name) => Some(name),
		}
	}
}

/// One fully composed request handed to the transport.
#[derive(Debug)]
pub struct TransportRequest<'a> {
	pub method: HttpMethod,
	pub url: &'a Url,
	pub headers: &'a Headers,
	pub body: Option<&'a [u8]>,
	pub timeout: Duration,
	pub impersonation: &'a ImpersonationProfile,
	pub proxy: Option<&'a ProxySettings>,
}

/// What came back. Headers keep duplicates (`Set-Cookie`).
#[derive(Debug, Clone)]
pub struct TransportReply {
	pub status: u16,
	pub headers: Headers,
	pub body: Vec<u8>,
	/// URL after redirects; equals the request URL when none occurred.
	pub final_url: String,
}

/// The direct request path. Implementations must map their failure modes to
/// [`crate::Error::Timeout`] (deadline exceeded) or [`crate::Error::Network`]
/// (everything connection-level); the session's retry policy depends on the
/// distinction.
#[async_trait]
pub trait DirectTransport: Send + Sync {
	async fn send(&self, request: TransportRequest<'_>) -> Result<TransportReply>;
}
