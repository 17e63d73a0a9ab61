//! Engine lifecycle reconciliation.
//!
//! The reconciler owns at most one runtime+browser pair and moves it toward a
//! desired configuration along a cost hierarchy: switching families is
//! maximally expensive and resets everything; toggling the stealth wrapper
//! rebuilds the runtime and the browser; variant/headless/launch-option drift
//! relaunches only the browser against the existing runtime.

use std::sync::Arc;

use tracing::{debug, info};

use super::config::{EngineActualState, EngineDesiredConfig, EngineFamily};
use super::{BrowserHandle, EngineFactory, EngineRuntime};
use crate::error::Result;

pub struct EngineLifecycleReconciler {
	factory: Arc<dyn EngineFactory>,
	runtime: Option<Box<dyn EngineRuntime>>,
	browser: Option<Box<dyn BrowserHandle>>,
	actual: Option<EngineActualState>,
}

impl EngineLifecycleReconciler {
	pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
		Self {
			factory,
			runtime: None,
			browser: None,
			actual: None,
		}
	}

	/// What is currently running, if anything.
	pub fn actual(&self) -> Option<&EngineActualState> {
		self.actual.as_ref()
	}

	pub fn is_running(&self) -> bool {
		self.browser.is_some()
	}

	/// Idempotently brings the engine to `desired` and returns the live
	/// browser handle.
	///
	/// On any bring-up failure the partial state is torn down first, so the
	/// reconciler never holds a half-started engine.
	pub async fn ensure_ready(&mut self, desired: &EngineDesiredConfig) -> Result<&dyn BrowserHandle> {
		desired.validate()?;
		self.factory.probe(desired.family)?;

		match &self.actual {
			None => {
				debug!(target = "hs.engine", family = %desired.family, "no engine running; full bring-up");
				self.bring_up(desired).await?;
			}
			Some(actual) if actual.family != desired.family => {
				info!(
					target = "hs.engine",
					from = %actual.family,
					to = %desired.family,
					"family switch; full teardown and bring-up"
				);
				self.teardown_all().await;
				self.bring_up(desired).await?;
			}
			Some(actual)
				if desired.family == EngineFamily::Generic
					&& actual.stealth_wrapped != desired.stealth_wrapped =>
			{
				info!(
					target = "hs.engine",
					stealth = desired.stealth_wrapped,
					"stealth wrapper toggled; rebuilding runtime and browser"
				);
				self.teardown_all().await;
				self.bring_up(desired).await?;
			}
			Some(actual) if actual.browser_stale(desired) || self.browser.is_none() => {
				debug!(
					target = "hs.engine",
					variant = %desired.variant,
					headless = desired.headless,
					"browser instance stale; relaunching against existing runtime"
				);
				self.close_browser_only().await;
				if let Err(err) = self.launch_browser(desired).await {
					self.teardown_all().await;
					return Err(err);
				}
				self.actual = Some(EngineActualState::from_desired(desired));
			}
			Some(_) => {
				debug!(target = "hs.engine", "engine already matches desired config");
			}
		}

		Ok(self
			.browser
			.as_deref()
			.expect("ensure_ready leaves a live browser on success"))
	}

	/// Selectively releases engine state.
	///
	/// `branded` tears down the stealth-branded family; `automation` tears
	/// down the generic and hardened families. A caller can release one side
	/// without disturbing a concurrently-held handle to the other.
	pub async fn close(&mut self, branded: bool, automation: bool) {
		let Some(actual) = &self.actual else {
			return;
		};
		let affected = match actual.family {
			EngineFamily::StealthBranded => branded,
			EngineFamily::Generic | EngineFamily::Hardened => automation,
		};
		if affected {
			info!(target = "hs.engine", family = %actual.family, "tearing down engine");
			self.teardown_all().await;
		}
	}

	/// Full teardown regardless of family.
	pub async fn close_all(&mut self) {
		self.close(true, true).await;
	}

	async fn bring_up(&mut self, desired: &EngineDesiredConfig) -> Result<()> {
		let runtime = match self
			.factory
			.start_runtime(desired.family, desired.stealth_wrapped)
			.await
		{
			Ok(runtime) => runtime,
			Err(err) => {
				// Nothing was recorded; state stays "no engine running".
				self.actual = None;
				return Err(err);
			}
		};
		self.runtime = Some(runtime);

		if let Err(err) = self.launch_browser(desired).await {
			self.teardown_all().await;
			return Err(err);
		}
		self.actual = Some(EngineActualState::from_desired(desired));
		Ok(())
	}

	async fn launch_browser(&mut self, desired: &EngineDesiredConfig) -> Result<()> {
		let runtime = self
			.runtime
			.as_deref()
			.expect("launch_browser requires a live runtime");
		let browser = runtime
			.launch_browser(desired.variant, desired.headless, &desired.launch_options)
			.await?;
		self.browser = Some(browser);
		Ok(())
	}

	async fn close_browser_only(&mut self) {
		if let Some(browser) = self.browser.take() {
			if let Err(err) = browser.close().await {
				debug!(target = "hs.engine", error = %err, "browser close failed; continuing");
			}
		}
	}

	async fn teardown_all(&mut self) {
		self.close_browser_only().await;
		if let Some(runtime) = self.runtime.take() {
			if let Err(err) = runtime.shutdown().await {
				debug!(target = "hs.engine", error = %err, "runtime shutdown failed; continuing");
			}
		}
		self.actual = None;
	}
}

impl std::fmt::Debug for EngineLifecycleReconciler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EngineLifecycleReconciler")
			.field("actual", &self.actual)
			.field("browser_live", &self.browser.is_some())
			.finish()
	}
}
