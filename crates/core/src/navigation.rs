//! Navigation with bounded soft retries and offline replay support.
//!
//! A timeout on the initial `goto` is retried with up to `attempts` soft
//! reloads on the same page, reusing the same wait condition and timeout.
//! Network and engine errors are never retried here. The `on_retry` hook runs
//! before each retry so a caller can re-arm one-shot route handlers that the
//! failed attempt consumed.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use hs_protocol::WaitUntil;

use crate::engine::{NavigationOutcome, PageHandle, RenderContext, SyntheticResponse};
use crate::error::{Error, Result};
use crate::http::{Headers, looks_like_html};
use crate::response::Response;

pub type BoxFut<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Hook invoked before each soft retry.
pub type OnRetry<'a> = Box<dyn FnMut() -> BoxFut<'a, Result<()>> + Send + 'a>;

/// Navigates to `url`, soft-reloading up to `attempts` times on timeout.
///
/// Exactly `1 + attempts` primitive navigations are issued when every attempt
/// times out, after which the last timeout is re-raised. A `None` outcome
/// (same-URL fragment navigation) is success.
pub async fn goto_with_retry(
	page: &dyn PageHandle,
	url: &str,
	wait_until: WaitUntil,
	timeout_ms: u64,
	attempts: u32,
	mut on_retry: Option<OnRetry<'_>>,
) -> Result<Option<NavigationOutcome>> {
	let mut last_timeout = match page.goto(url, wait_until, timeout_ms).await {
		Ok(outcome) => return Ok(outcome),
		Err(err) if err.is_timeout() => err,
		Err(err) => return Err(err),
	};

	for attempt in 1..=attempts {
		debug!(
			target = "hs.nav",
			%url,
			attempt,
			attempts,
			"navigation timed out; soft reload"
		);
		if let Some(hook) = on_retry.as_mut() {
			hook().await?;
		}
		match page.reload(wait_until, timeout_ms).await {
			Ok(outcome) => return Ok(outcome),
			Err(err) if err.is_timeout() => last_timeout = err,
			Err(err) => return Err(err),
		}
	}

	Err(last_timeout)
}

/// Headers a replayed response is fulfilled with.
///
/// Transport-specific headers would fight the engine's own framing of the
/// synthetic body, so they are stripped; a content type is injected when the
/// body is detectably HTML and none was declared.
pub fn replay_headers(original: &Headers, body: &[u8]) -> Headers {
	const STRIPPED: [&str; 4] = ["content-length", "content-encoding", "transfer-encoding", "connection"];

	let mut headers: Headers = original
		.iter()
		.filter(|(name, _)| !STRIPPED.contains(name))
		.collect();

	if !headers.contains("content-type") && looks_like_html(body) {
		headers.append("content-type", "text/html; charset=utf-8");
	}
	headers
}

/// Builds the synthetic fulfillment for a captured response.
pub fn synthetic_from_response(response: &Response) -> SyntheticResponse {
	SyntheticResponse {
		status: response.status,
		headers: replay_headers(&response.headers, &response.body),
		body: response.body.clone(),
	}
}

/// Installs the one-shot replay route for `response` on `context`, clearing
/// any previously armed route first (a consumed or stale handler must not
/// shadow the fresh one).
///
/// The route is keyed to the exact final URL of the captured response; a
/// same-origin redirect during replay intentionally passes through to the
/// network rather than being fulfilled.
pub async fn arm_replay_route(context: &dyn RenderContext, response: &Response) -> Result<()> {
	context
		.clear_routes()
		.await
		.map_err(|err| Error::Interception(format!("failed to clear replay route: {err}")))?;
	context
		.route_once(response.final_url.as_str(), synthetic_from_response(response))
		.await
		.map_err(|err| Error::Interception(format!("failed to install replay route: {err}")))
}
