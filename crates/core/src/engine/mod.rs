//! Browser-engine collaborator seam and lifecycle reconciliation.
//!
//! The engine itself (rendering, DOM, JS execution) is external. This module
//! defines the traits a driver must implement and the reconciler that owns at
//! most one live runtime+browser pair, reconciling it toward a desired
//! configuration at minimal relaunch cost.

mod config;
mod reconciler;

use async_trait::async_trait;
use hs_protocol::{LaunchOptions, StorageState, WaitUntil};

pub use config::{EngineActualState, EngineDesiredConfig, EngineFamily, EngineVariant};
pub use reconciler::EngineLifecycleReconciler;

use crate::error::Result;
use crate::http::Headers;

/// A response to fulfill a matching request with, instead of the network.
#[derive(Debug, Clone)]
pub struct SyntheticResponse {
	pub status: u16,
	pub headers: Headers,
	pub body: Vec<u8>,
}

/// Result of a settled navigation. `None` from goto/reload (same-URL fragment
/// navigation) is success, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
	pub url: String,
	pub status: Option<u16>,
}

/// Constructs engine runtimes and answers capability probes.
///
/// Availability is checked explicitly here rather than discovered through
/// ambient side effects; a missing family must come back as a configuration
/// error naming the capability.
#[async_trait]
pub trait EngineFactory: Send + Sync {
	/// Fails with [`crate::Error::Configuration`] when `family` is not
	/// installed/usable in this environment.
	fn probe(&self, family: EngineFamily) -> Result<()>;

	/// Brings up the runtime layer for `family`, wrapped in the external
	/// stealth runtime when `stealth_wrapped` (generic family only).
	async fn start_runtime(
		&self,
		family: EngineFamily,
		stealth_wrapped: bool,
	) -> Result<Box<dyn EngineRuntime>>;
}

/// A live engine runtime (driver process / wrapping runtime).
#[async_trait]
pub trait EngineRuntime: Send + Sync {
	/// Launches a browser instance against this runtime.
	async fn launch_browser(
		&self,
		variant: EngineVariant,
		headless: bool,
		launch_options: &LaunchOptions,
	) -> Result<Box<dyn BrowserHandle>>;

	/// Stops the runtime (and its stealth wrapper, when present).
	async fn shutdown(&self) -> Result<()>;
}

/// A live browser instance.
#[async_trait]
pub trait BrowserHandle: Send + Sync {
	/// Creates an isolated rendering context seeded with `storage_state`.
	async fn new_context(&self, storage_state: StorageState) -> Result<Box<dyn RenderContext>>;

	async fn close(&self) -> Result<()>;
}

/// An isolated rendering context: own cookies, own localStorage.
#[async_trait]
pub trait RenderContext: Send + Sync {
	async fn new_page(&self) -> Result<Box<dyn PageHandle>>;

	/// Installs a one-shot route: the first request whose URL equals `url` is
	/// fulfilled with `response` and the handler deregisters itself. Later
	/// requests pass through untouched.
	async fn route_once(&self, url: &str, response: SyntheticResponse) -> Result<()>;

	/// Removes any route handlers installed via [`Self::route_once`].
	async fn clear_routes(&self) -> Result<()>;

	/// Snapshot of the context's cookies and per-origin localStorage.
	async fn storage_state(&self) -> Result<StorageState>;

	async fn close(&self) -> Result<()>;
}

/// A live page inside a context.
#[async_trait]
pub trait PageHandle: Send + Sync {
	async fn goto(
		&self,
		url: &str,
		wait_until: WaitUntil,
		timeout_ms: u64,
	) -> Result<Option<NavigationOutcome>>;

	/// Soft reload of the current page, reusing the given wait condition.
	async fn reload(&self, wait_until: WaitUntil, timeout_ms: u64) -> Result<Option<NavigationOutcome>>;

	/// Evaluates a JS expression, returning its JSON value.
	async fn evaluate(&self, expression: &str) -> Result<serde_json::Value>;

	/// Serialized DOM of the current page.
	async fn content(&self) -> Result<String>;

	/// Final URL after redirects.
	fn url(&self) -> String;

	async fn close(&self) -> Result<()>;
}
