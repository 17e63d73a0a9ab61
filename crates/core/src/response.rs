//! Immutable request/response models for the direct path.

use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

use crate::cookies::Cookie;
use crate::error::{Error, Result};
use crate::http::{Headers, HttpMethod, charset_from_headers};
use crate::session::RenderSeat;

/// The request as it was actually sent: lowercased headers, composed cookie
/// header, encoded body.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: HttpMethod,
	pub url: Url,
	pub headers: Headers,
	pub body: Option<Vec<u8>>,
	/// Jar cookies that matched the URL and went out in the `cookie` header.
	pub cookies: Vec<Cookie>,
}

/// A captured direct-transport response.
///
/// Immutable record plus an opaque render capability: [`Response::render`]
/// can later replay this exact response inside a real rendering engine.
#[derive(Debug, Clone)]
pub struct Response {
	pub request: Request,
	/// URL after redirects; can differ from `request.url`.
	pub final_url: Url,
	pub headers: Headers,
	/// Cookies the response set (already merged into the owning jar).
	pub cookies: Vec<Cookie>,
	pub body: Vec<u8>,
	pub status: u16,
	/// Wall time the request took, seconds.
	pub duration: f64,
	/// Epoch seconds when the response arrived.
	pub end_time: f64,
	pub(crate) seat: Option<RenderSeat>,
}

impl Response {
	/// Body decoded with the charset declared in `content-type` (lossy,
	/// utf-8 fallback).
	///
	/// Only utf-8-compatible charsets decode faithfully; transcoding legacy
	/// encodings is out of scope.
	pub fn text(&self) -> String {
		let _charset = charset_from_headers(&self.headers);
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Body parsed as JSON.
	pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body).map_err(Error::from)
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// How long ago this response arrived, seconds.
	pub fn seconds_ago(&self) -> f64 {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_secs_f64())
			.unwrap_or(0.0);
		(now - self.end_time).max(0.0)
	}

	pub(crate) fn render_seat(&self) -> Result<&RenderSeat> {
		self.seat.as_ref().ok_or(Error::SessionClosed)
	}
}
