//! Shared in-memory fakes: a scriptable engine and a scriptable direct
//! transport, with counters for asserting lifecycle and retry behavior.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use hs::engine::{
	BrowserHandle, EngineFactory, EngineFamily, EngineRuntime, EngineVariant, NavigationOutcome,
	PageHandle, RenderContext, SyntheticResponse,
};
use hs::transport::{DirectTransport, TransportReply, TransportRequest};
use hs::{Error, Headers, HttpMethod, LaunchOptions, Result, StorageState, WaitUntil};

/// One scripted outcome for a `goto` or `reload` call. The plan is consumed
/// front to back; an empty plan means success.
#[derive(Clone)]
pub enum NavStep {
	Ok,
	Timeout,
	NetworkError,
}

#[derive(Default)]
pub struct EngineCounters {
	pub runtime_starts: AtomicU32,
	pub runtime_shutdowns: AtomicU32,
	pub browser_launches: AtomicU32,
	pub browser_closes: AtomicU32,
	pub contexts_opened: AtomicU32,
	pub contexts_closed: AtomicU32,
	pub pages_opened: AtomicU32,
	pub routes_armed: AtomicU32,
	pub routes_cleared: AtomicU32,
}

/// Central scriptable engine state. Tests keep an `Arc<FakeEngine>` as the
/// controller; [`FakeFactory`] implements the driver seam over it.
#[derive(Default)]
pub struct FakeEngine {
	pub counters: EngineCounters,
	/// Families `probe` reports as not installed.
	pub unavailable: Mutex<Vec<EngineFamily>>,
	pub fail_next_runtime: AtomicBool,
	pub fail_next_launch: AtomicBool,
	/// Scripted goto/reload outcomes, shared by all pages.
	pub nav_plan: Mutex<VecDeque<NavStep>>,
	/// URLs that were fulfilled from an armed one-shot route.
	pub routes_consumed: Mutex<Vec<String>>,
	/// URLs the page fetched from the network (no matching route).
	pub network_fetches: Mutex<Vec<String>>,
	/// Storage states contexts were seeded with, in order.
	pub seeded: Mutex<Vec<StorageState>>,
	/// When set, every context reports this state on exit instead of echoing
	/// its seed.
	pub exit_state: Mutex<Option<StorageState>>,
	/// When set, context storage extraction fails.
	pub fail_exit_state: AtomicBool,
	pub last_runtime: Mutex<Option<(EngineFamily, bool)>>,
	pub last_launch: Mutex<Option<(EngineVariant, bool, LaunchOptions)>>,
}

impl FakeEngine {
	pub fn plan_nav(&self, steps: impl IntoIterator<Item = NavStep>) {
		self.nav_plan.lock().extend(steps);
	}

	pub fn runtime_starts(&self) -> u32 {
		self.counters.runtime_starts.load(Ordering::SeqCst)
	}

	pub fn browser_launches(&self) -> u32 {
		self.counters.browser_launches.load(Ordering::SeqCst)
	}

	pub fn runtime_shutdowns(&self) -> u32 {
		self.counters.runtime_shutdowns.load(Ordering::SeqCst)
	}

	pub fn browser_closes(&self) -> u32 {
		self.counters.browser_closes.load(Ordering::SeqCst)
	}

	fn next_nav_step(&self) -> NavStep {
		self.nav_plan.lock().pop_front().unwrap_or(NavStep::Ok)
	}
}

pub struct FakeFactory {
	pub engine: Arc<FakeEngine>,
}

impl FakeFactory {
	pub fn new(engine: Arc<FakeEngine>) -> Arc<Self> {
		Arc::new(Self { engine })
	}
}

#[async_trait]
impl EngineFactory for FakeFactory {
	fn probe(&self, family: EngineFamily) -> Result<()> {
		if self.engine.unavailable.lock().contains(&family) {
			return Err(Error::Configuration(format!("{family} engine is not installed")));
		}
		Ok(())
	}

	async fn start_runtime(
		&self,
		family: EngineFamily,
		stealth_wrapped: bool,
	) -> Result<Box<dyn EngineRuntime>> {
		if self.engine.fail_next_runtime.swap(false, Ordering::SeqCst) {
			return Err(Error::Engine("runtime refused to start".into()));
		}
		self.engine.counters.runtime_starts.fetch_add(1, Ordering::SeqCst);
		*self.engine.last_runtime.lock() = Some((family, stealth_wrapped));
		Ok(Box::new(FakeRuntime {
			engine: Arc::clone(&self.engine),
		}))
	}
}

struct FakeRuntime {
	engine: Arc<FakeEngine>,
}

#[async_trait]
impl EngineRuntime for FakeRuntime {
	async fn launch_browser(
		&self,
		variant: EngineVariant,
		headless: bool,
		launch_options: &LaunchOptions,
	) -> Result<Box<dyn BrowserHandle>> {
		if self.engine.fail_next_launch.swap(false, Ordering::SeqCst) {
			return Err(Error::Engine("browser failed to launch".into()));
		}
		self.engine.counters.browser_launches.fetch_add(1, Ordering::SeqCst);
		*self.engine.last_launch.lock() = Some((variant, headless, launch_options.clone()));
		Ok(Box::new(FakeBrowser {
			engine: Arc::clone(&self.engine),
		}))
	}

	async fn shutdown(&self) -> Result<()> {
		self.engine.counters.runtime_shutdowns.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

struct FakeBrowser {
	engine: Arc<FakeEngine>,
}

#[async_trait]
impl BrowserHandle for FakeBrowser {
	async fn new_context(&self, storage_state: StorageState) -> Result<Box<dyn RenderContext>> {
		self.engine.counters.contexts_opened.fetch_add(1, Ordering::SeqCst);
		self.engine.seeded.lock().push(storage_state.clone());
		Ok(Box::new(FakeContext {
			engine: Arc::clone(&self.engine),
			seed: storage_state,
			routes: Arc::new(Mutex::new(Vec::new())),
		}))
	}

	async fn close(&self) -> Result<()> {
		self.engine.counters.browser_closes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

struct FakeContext {
	engine: Arc<FakeEngine>,
	seed: StorageState,
	routes: Arc<Mutex<Vec<(String, SyntheticResponse)>>>,
}

#[async_trait]
impl RenderContext for FakeContext {
	async fn new_page(&self) -> Result<Box<dyn PageHandle>> {
		self.engine.counters.pages_opened.fetch_add(1, Ordering::SeqCst);
		Ok(Box::new(FakePage {
			engine: Arc::clone(&self.engine),
			routes: Arc::clone(&self.routes),
			current_url: Mutex::new(String::new()),
		}))
	}

	async fn route_once(&self, url: &str, response: SyntheticResponse) -> Result<()> {
		self.engine.counters.routes_armed.fetch_add(1, Ordering::SeqCst);
		self.routes.lock().push((url.to_string(), response));
		Ok(())
	}

	async fn clear_routes(&self) -> Result<()> {
		self.engine.counters.routes_cleared.fetch_add(1, Ordering::SeqCst);
		self.routes.lock().clear();
		Ok(())
	}

	async fn storage_state(&self) -> Result<StorageState> {
		if self.engine.fail_exit_state.load(Ordering::SeqCst) {
			return Err(Error::Engine("context crashed during storage extraction".into()));
		}
		match self.engine.exit_state.lock().clone() {
			Some(state) => Ok(state),
			None => Ok(self.seed.clone()),
		}
	}

	async fn close(&self) -> Result<()> {
		self.engine.counters.contexts_closed.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}

pub struct FakePage {
	engine: Arc<FakeEngine>,
	routes: Arc<Mutex<Vec<(String, SyntheticResponse)>>>,
	current_url: Mutex<String>,
}

impl FakePage {
	/// A navigation request first consults the armed one-shot routes; the
	/// first exact match fulfills and deregisters, anything else goes to the
	/// "network". Scripted timeouts still consume the route, mirroring an
	/// engine that issued the request before the deadline hit.
	fn fetch(&self, url: &str) -> u16 {
		let mut routes = self.routes.lock();
		if let Some(index) = routes.iter().position(|(route_url, _)| route_url == url) {
			let (_, response) = routes.remove(index);
			self.engine.routes_consumed.lock().push(url.to_string());
			response.status
		} else {
			self.engine.network_fetches.lock().push(url.to_string());
			200
		}
	}

	fn navigate(&self, url: &str, timeout_ms: u64) -> Result<Option<NavigationOutcome>> {
		let status = self.fetch(url);
		// The request was issued either way, so the page's location reflects
		// the attempted URL; a later reload retries it.
		*self.current_url.lock() = url.to_string();
		match self.engine.next_nav_step() {
			NavStep::Ok => Ok(Some(NavigationOutcome {
				url: url.to_string(),
				status: Some(status),
			})),
			NavStep::Timeout => Err(Error::timeout("goto", timeout_ms)),
			NavStep::NetworkError => Err(Error::Network("net::ERR_CONNECTION_RESET".into())),
		}
	}
}

#[async_trait]
impl PageHandle for FakePage {
	async fn goto(
		&self,
		url: &str,
		_wait_until: WaitUntil,
		timeout_ms: u64,
	) -> Result<Option<NavigationOutcome>> {
		self.navigate(url, timeout_ms)
	}

	async fn reload(&self, _wait_until: WaitUntil, timeout_ms: u64) -> Result<Option<NavigationOutcome>> {
		let url = self.current_url.lock().clone();
		self.navigate(&url, timeout_ms)
	}

	async fn evaluate(&self, _expression: &str) -> Result<serde_json::Value> {
		Ok(serde_json::Value::Null)
	}

	async fn content(&self) -> Result<String> {
		Ok(format!("<html><body>{}</body></html>", self.current_url.lock()))
	}

	fn url(&self) -> String {
		self.current_url.lock().clone()
	}

	async fn close(&self) -> Result<()> {
		Ok(())
	}
}

/// One scripted reply for the direct transport.
pub enum TransportStep {
	Reply {
		status: u16,
		headers: Vec<(String, String)>,
		body: Vec<u8>,
		final_url: Option<String>,
	},
	Timeout,
	NetworkError,
}

impl TransportStep {
	pub fn ok(status: u16) -> Self {
		TransportStep::Reply {
			status,
			headers: Vec::new(),
			body: Vec::new(),
			final_url: None,
		}
	}

	pub fn with_header(self, name: &str, value: &str) -> Self {
		match self {
			TransportStep::Reply {
				status,
				mut headers,
				body,
				final_url,
			} => {
				headers.push((name.to_string(), value.to_string()));
				TransportStep::Reply {
					status,
					headers,
					body,
					final_url,
				}
			}
			other => other,
		}
	}

	pub fn with_body(self, bytes: &[u8]) -> Self {
		match self {
			TransportStep::Reply {
				status,
				headers,
				final_url,
				..
			} => TransportStep::Reply {
				status,
				headers,
				body: bytes.to_vec(),
				final_url,
			},
			other => other,
		}
	}

	pub fn redirected_to(self, url: &str) -> Self {
		match self {
			TransportStep::Reply {
				status,
				headers,
				body,
				..
			} => TransportStep::Reply {
				status,
				headers,
				body,
				final_url: Some(url.to_string()),
			},
			other => other,
		}
	}
}

/// Scriptable direct transport with per-URL hit counters.
#[derive(Default)]
pub struct FakeTransport {
	hits: Mutex<HashMap<String, u32>>,
	plans: Mutex<HashMap<String, VecDeque<TransportStep>>>,
	/// Every request as sent: method, full URL, composed headers.
	pub sent: Mutex<Vec<(HttpMethod, String, Headers)>>,
}

impl FakeTransport {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn script(&self, url: &str, step: TransportStep) {
		self.plans.lock().entry(url.to_string()).or_default().push_back(step);
	}

	pub fn hits_for(&self, url: &str) -> u32 {
		self.hits.lock().get(url).copied().unwrap_or(0)
	}

	pub fn last_sent_header(&self, name: &str) -> Option<String> {
		let sent = self.sent.lock();
		let (_, _, headers) = sent.last()?;
		headers.get(name).map(str::to_string)
	}
}

#[async_trait]
impl DirectTransport for FakeTransport {
	async fn send(&self, request: TransportRequest<'_>) -> Result<TransportReply> {
		let url = request.url.as_str().to_string();
		*self.hits.lock().entry(url.clone()).or_insert(0) += 1;
		self.sent
			.lock()
			.push((request.method, url.clone(), request.headers.clone()));

		let step = self.plans.lock().get_mut(&url).and_then(VecDeque::pop_front);
		match step {
			None => Ok(TransportReply {
				status: 200,
				headers: Headers::new(),
				body: Vec::new(),
				final_url: url,
			}),
			Some(TransportStep::Reply {
				status,
				headers,
				body,
				final_url,
			}) => Ok(TransportReply {
				status,
				headers: Headers::from_pairs(headers),
				body,
				final_url: final_url.unwrap_or(url),
			}),
			Some(TransportStep::Timeout) => {
				Err(Error::timeout("direct request", request.timeout.as_millis() as u64))
			}
			Some(TransportStep::NetworkError) => Err(Error::Network("connection reset by peer".into())),
		}
	}
}
