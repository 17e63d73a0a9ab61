//! Small HTTP primitives: methods, multi-value headers, charset sniffing.
//!
//! No dependency on any transport or engine; everything here is pure and
//! unit-testable offline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	Get,
	Post,
	Put,
	Patch,
	Delete,
	Head,
	Options,
}

impl HttpMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Head => "HEAD",
			HttpMethod::Options => "OPTIONS",
		}
	}
}

impl fmt::Display for HttpMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for HttpMethod {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"GET" => Ok(HttpMethod::Get),
			"POST" => Ok(HttpMethod::Post),
			"PUT" => Ok(HttpMethod::Put),
			"PATCH" => Ok(HttpMethod::Patch),
			"DELETE" => Ok(HttpMethod::Delete),
			"HEAD" => Ok(HttpMethod::Head),
			"OPTIONS" => Ok(HttpMethod::Options),
			other => Err(Error::Configuration(format!("unknown HTTP method: {other}"))),
		}
	}
}

/// Ordered, case-insensitive, multi-valued header collection.
///
/// `Set-Cookie` may appear any number of times, so a flat map is not enough.
/// Names are stored lowercased; insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut headers = Self::new();
		for (k, v) in pairs {
			headers.append(k, v);
		}
		headers
	}

	/// Appends without replacing existing values of the same name.
	pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.push((name.into().to_ascii_lowercase(), value.into()));
	}

	/// Replaces all values of `name` with a single one.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into().to_ascii_lowercase();
		self.0.retain(|(k, _)| *k != name);
		self.0.push((name, value.into()));
	}

	/// Inserts only when the header is absent.
	pub fn set_if_absent(&mut self, name: &str, value: impl Into<String>) {
		if !self.contains(name) {
			self.append(name, value);
		}
	}

	pub fn remove(&mut self, name: &str) {
		let name = name.to_ascii_lowercase();
		self.0.retain(|(k, _)| *k != name);
	}

	/// First value of `name`, if any.
	pub fn get(&self, name: &str) -> Option<&str> {
		let name = name.to_ascii_lowercase();
		self.0.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
	}

	/// All values of `name`, in insertion order.
	pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
		let name = name.to_ascii_lowercase();
		self.0
			.iter()
			.filter(move |(k, _)| *k == name)
			.map(|(_, v)| v.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from_pairs(iter)
	}
}

/// Charset declared in `content-type`, defaulting to utf-8.
pub fn charset_from_headers(headers: &Headers) -> String {
	let ctype = headers.get("content-type").unwrap_or("");
	match ctype.split("charset=").nth(1) {
		Some(rest) => {
			let cs = rest.split(';').next().unwrap_or("").trim_matches([' ', '"', '\'']);
			if cs.is_empty() { "utf-8".into() } else { cs.to_ascii_lowercase() }
		}
		None => "utf-8".into(),
	}
}

/// Cheap HTML sniff for bodies without a declared content type.
pub fn looks_like_html(body: &[u8]) -> bool {
	let head = &body[..body.len().min(512)];
	let text = String::from_utf8_lossy(head);
	let trimmed = text.trim_start_matches(['\u{feff}', ' ', '\t', '\r', '\n']);
	let lower = trimmed.get(..15.min(trimmed.len())).unwrap_or("").to_ascii_lowercase();
	lower.starts_with("<!doctype html") || lower.starts_with("<html")
}
