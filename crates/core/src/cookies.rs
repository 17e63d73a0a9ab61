//! Cookie model and jar: RFC 6265-style selection, merge, and Set-Cookie
//! parsing.
//!
//! This is the single point where cookie state from both transports meets.
//! Pure data-structure logic; no network or rendering dependency.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hs_protocol::{WireCookie, WireSameSite};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
	#[default]
	Lax,
	Strict,
	None,
}

impl From<SameSite> for WireSameSite {
	fn from(value: SameSite) -> Self {
		match value {
			SameSite::Lax => WireSameSite::Lax,
			SameSite::Strict => WireSameSite::Strict,
			SameSite::None => WireSameSite::None,
		}
	}
}

impl From<WireSameSite> for SameSite {
	fn from(value: WireSameSite) -> Self {
		match value {
			WireSameSite::Lax => SameSite::Lax,
			WireSameSite::Strict => SameSite::Strict,
			WireSameSite::None => SameSite::None,
		}
	}
}

/// A single cookie.
///
/// Identity is `(domain, path, name)`; a jar holds at most one cookie per
/// identity key. `expires_at == 0` marks a session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
	pub name: String,
	pub value: String,
	pub domain: String,
	pub path: String,
	/// Absolute expiry, epoch seconds. `0` = session cookie.
	pub expires_at: u64,
	/// Original `Max-Age` attribute, seconds. `0` = unset. Informational:
	/// the parser already resolved it into `expires_at`.
	pub max_age_seconds: u64,
	pub same_site: SameSite,
	pub secure: bool,
	pub http_only: bool,
}

impl Cookie {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			domain: String::new(),
			path: "/".into(),
			expires_at: 0,
			max_age_seconds: 0,
			same_site: SameSite::default(),
			secure: false,
			http_only: false,
		}
	}

	pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = domain.into().to_ascii_lowercase();
		self
	}

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();
		self
	}

	pub fn with_expires_at(mut self, epoch_secs: u64) -> Self {
		self.expires_at = epoch_secs;
		self
	}

	pub fn secure(mut self) -> Self {
		self.secure = true;
		self
	}

	pub fn http_only(mut self) -> Self {
		self.http_only = true;
		self
	}

	/// `(domain, path, name)` — the jar's replacement key.
	pub fn identity_key(&self) -> (&str, &str, &str) {
		(&self.domain, &self.path, &self.name)
	}

	pub fn is_expired(&self, now_epoch_secs: u64) -> bool {
		self.expires_at != 0 && now_epoch_secs >= self.expires_at
	}

	/// Domain-match with any single leading dot stripped: the host must equal
	/// the cookie domain or end with `"." + domain`.
	pub fn domain_matches(&self, host: &str) -> bool {
		if self.domain.is_empty() || host.is_empty() {
			return false;
		}
		let host = host.to_ascii_lowercase();
		let cookie_domain = self.domain.strip_prefix('.').unwrap_or(&self.domain);
		host == cookie_domain || host.ends_with(&format!(".{cookie_domain}"))
	}

	/// Path-match per RFC 6265 §5.1.4.
	pub fn path_matches(&self, request_path: &str) -> bool {
		let cookie_path = if self.path.is_empty() { "/" } else { self.path.as_str() };
		let request_path = if request_path.is_empty() { "/" } else { request_path };
		if request_path == cookie_path {
			return true;
		}
		if let Some(rest) = request_path.strip_prefix(cookie_path) {
			return cookie_path.ends_with('/') || rest.starts_with('/');
		}
		false
	}

	/// Would a browser send this cookie for `url` right now?
	///
	/// Checks expiry, the Secure flag, domain-match and path-match. SameSite
	/// is deliberately left out; it needs request context this layer does not
	/// have.
	pub fn matches_url(&self, url: &Url, now_epoch_secs: u64) -> bool {
		if self.is_expired(now_epoch_secs) {
			return false;
		}
		if self.secure && url.scheme() != "https" {
			return false;
		}
		let Some(host) = url.host_str() else {
			return false;
		};
		if !self.domain_matches(host) {
			return false;
		}
		let path = if url.path().is_empty() { "/" } else { url.path() };
		self.path_matches(path)
	}

	pub fn to_wire(&self) -> WireCookie {
		WireCookie {
			name: self.name.clone(),
			value: self.value.clone(),
			domain: self.domain.clone(),
			path: self.path.clone(),
			expires: if self.expires_at == 0 { -1.0 } else { self.expires_at as f64 },
			http_only: self.http_only,
			secure: self.secure,
			same_site: self.same_site.into(),
		}
	}

	pub fn from_wire(wire: &WireCookie) -> Self {
		Self {
			name: wire.name.clone(),
			value: wire.value.clone(),
			domain: wire.domain.to_ascii_lowercase(),
			path: if wire.path.is_empty() { "/".into() } else { wire.path.clone() },
			expires_at: if wire.expires > 0.0 { wire.expires as u64 } else { 0 },
			max_age_seconds: 0,
			same_site: wire.same_site.into(),
			secure: wire.secure,
			http_only: wire.http_only,
		}
	}
}

impl fmt::Display for Cookie {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}={}", self.name, self.value)
	}
}

/// The session's cookie store. Owned exclusively by one session.
///
/// Expired cookies stay in the jar until explicitly deleted; they are only
/// excluded from selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieJar {
	cookies: Vec<Cookie>,
}

impl CookieJar {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.cookies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cookies.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
		self.cookies.iter()
	}

	/// Cookies a browser would send for `url`, sorted by path length
	/// descending then name ascending for deterministic header composition.
	pub fn select_for_url(&self, url: &Url) -> Vec<&Cookie> {
		let now = epoch_now();
		let mut selected: Vec<&Cookie> =
			self.cookies.iter().filter(|c| c.matches_url(url, now)).collect();
		selected.sort_by(|a, b| {
			b.path.len().cmp(&a.path.len()).then_with(|| a.name.cmp(&b.name))
		});
		selected
	}

	/// Serializes cookies as a `Cookie` request header value.
	pub fn header_value(cookies: &[&Cookie]) -> String {
		cookies
			.iter()
			.map(|c| format!("{}={}", c.name, c.value))
			.collect::<Vec<_>>()
			.join("; ")
	}

	/// The single application point for Set-Cookie-style updates from either
	/// transport: replaces by identity key, otherwise appends.
	pub fn merge<I>(&mut self, fresh: I)
	where
		I: IntoIterator<Item = Cookie>,
	{
		for cookie in fresh {
			match self
				.cookies
				.iter_mut()
				.find(|old| old.identity_key() == cookie.identity_key())
			{
				Some(slot) => *slot = cookie,
				None => self.cookies.push(cookie),
			}
		}
	}

	pub fn get(&self, name: &str, domain: Option<&str>, path: Option<&str>) -> Option<&Cookie> {
		self.cookies.iter().find(|c| {
			c.name == name
				&& domain.is_none_or(|d| c.domain == d)
				&& path.is_none_or(|p| c.path == p)
		})
	}

	pub fn delete(&mut self, name: &str, domain: &str, path: Option<&str>) -> Option<Cookie> {
		let index = self.cookies.iter().position(|c| {
			c.name == name && c.domain == domain && path.is_none_or(|p| c.path == p)
		})?;
		Some(self.cookies.remove(index))
	}

	pub fn to_wire(&self) -> Vec<WireCookie> {
		self.cookies.iter().map(Cookie::to_wire).collect()
	}
}

pub(crate) fn epoch_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

// ───────────────────────── Set-Cookie parsing ─────────────────────────

/// Parses one `Set-Cookie` header line.
///
/// `default_domain` is the request host, used when no `Domain` attribute is
/// present. `Max-Age` wins over `Expires` (RFC 6265 §5.3) and is resolved
/// against `now` into an absolute expiry. Returns `None` for a malformed
/// line with no `name=value` pair.
pub fn parse_set_cookie(line: &str, default_domain: &str, now_epoch_secs: u64) -> Option<Cookie> {
	let mut parts = line.split(';');
	let (name, value) = parts.next()?.split_once('=')?;
	let name = name.trim();
	if name.is_empty() {
		return None;
	}
	let mut cookie = Cookie::new(name, value.trim());
	cookie.domain = default_domain.to_ascii_lowercase();

	for attr in parts {
		let (key, val) = match attr.split_once('=') {
			Some((k, v)) => (k.trim().to_ascii_lowercase(), v.trim()),
			None => (attr.trim().to_ascii_lowercase(), ""),
		};
		match key.as_str() {
			"domain" if !val.is_empty() => {
				cookie.domain = val.trim_start_matches('.').to_ascii_lowercase();
			}
			"path" if !val.is_empty() => cookie.path = val.to_string(),
			"max-age" => {
				if let Ok(secs) = val.parse::<i64>() {
					cookie.max_age_seconds = secs.max(0) as u64;
					// Non-positive Max-Age expires the cookie immediately.
					cookie.expires_at = if secs > 0 {
						now_epoch_secs.saturating_add(secs as u64)
					} else {
						1
					};
				}
			}
			"expires" => {
				// Max-Age has precedence; only honor Expires when unset.
				if cookie.max_age_seconds == 0 && cookie.expires_at == 0 {
					if let Some(epoch) = parse_http_date(val) {
						cookie.expires_at = epoch;
					}
				}
			}
			"secure" => cookie.secure = true,
			"httponly" => cookie.http_only = true,
			"samesite" => {
				cookie.same_site = match val.to_ascii_lowercase().as_str() {
					"strict" => SameSite::Strict,
					"none" => SameSite::None,
					_ => SameSite::Lax,
				};
			}
			_ => {}
		}
	}
	Some(cookie)
}

/// Parses all `Set-Cookie` values from a response header list.
pub fn parse_set_cookies<'a, I>(lines: I, default_domain: &str) -> Vec<Cookie>
where
	I: IntoIterator<Item = &'a str>,
{
	let now = epoch_now();
	lines
		.into_iter()
		.filter_map(|line| parse_set_cookie(line, default_domain, now))
		.collect()
}

/// HTTP-date (`Wdy, DD Mon YYYY HH:MM:SS GMT`, plus the legacy dash form) to
/// epoch seconds. Returns `None` for anything unparseable.
fn parse_http_date(value: &str) -> Option<u64> {
	let rest = value.split_once(',').map_or(value, |(_, r)| r);
	let rest = rest.trim().replace('-', " ");
	let mut fields = rest.split_ascii_whitespace();

	let day: u64 = fields.next()?.parse().ok()?;
	let month = match fields.next()?.to_ascii_lowercase().as_str() {
		"jan" => 1,
		"feb" => 2,
		"mar" => 3,
		"apr" => 4,
		"may" => 5,
		"jun" => 6,
		"jul" => 7,
		"aug" => 8,
		"sep" => 9,
		"oct" => 10,
		"nov" => 11,
		"dec" => 12,
		_ => return None,
	};
	let year_raw: u64 = fields.next()?.parse().ok()?;
	// rfc850 two-digit years: 70-99 → 19xx, otherwise 20xx.
	let year = match year_raw {
		0..=69 => year_raw + 2000,
		70..=99 => year_raw + 1900,
		_ => year_raw,
	};
	let mut clock = fields.next()?.split(':');
	let hour: u64 = clock.next()?.parse().ok()?;
	let minute: u64 = clock.next()?.parse().ok()?;
	let second: u64 = clock.next()?.parse().ok()?;
	if day == 0 || day > 31 || hour > 23 || minute > 59 || second > 60 || year < 1970 {
		return None;
	}

	Some(days_from_civil(year, month, day) * 86_400 + hour * 3_600 + minute * 60 + second)
}

/// Days since 1970-01-01 for a proleptic Gregorian date (Howard Hinnant's
/// civil-days algorithm).
fn days_from_civil(year: u64, month: u64, day: u64) -> u64 {
	let y = if month <= 2 { year - 1 } else { year };
	let era = y / 400;
	let yoe = y - era * 400;
	let mp = (month + 9) % 12;
	let doy = (153 * mp + 2) / 5 + day - 1;
	let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
	era * 146_097 + doe - 719_468
}
