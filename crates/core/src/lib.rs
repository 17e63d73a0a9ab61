//! One stateful browsing session, two request paths.
//!
//! A [`Session`] unifies a fast direct HTTP transport (no rendering) and a
//! browser-driven navigation path over the same logical identity: one cookie
//! jar and one per-origin localStorage map. Both paths read and write that
//! shared state.
//!
//! The load-bearing pieces:
//! * [`cookies::CookieJar`] — RFC 6265-style selection and merge, shared by
//!   both transports.
//! * [`engine::EngineLifecycleReconciler`] — idempotently brings browser
//!   engine families up and down, relaunching as little as possible.
//! * [`navigation`] — bounded soft-retry navigation and one-shot offline
//!   replay of a captured direct-transport response.
//! * [`Session`] — the façade wiring it all together.
//!
//! The browser engine itself and the TLS-impersonating HTTP client are
//! external collaborators behind the traits in [`engine`] and [`transport`].

pub mod cookies;
pub mod engine;
pub mod error;
pub mod http;
pub mod navigation;
pub mod response;
pub mod session;
pub mod storage;
pub mod transport;

pub use cookies::{Cookie, CookieJar, SameSite};
pub use engine::{EngineDesiredConfig, EngineFamily, EngineLifecycleReconciler, EngineVariant};
pub use error::{Error, Result};
pub use hs_protocol::{LaunchOptions, ProxySettings, StorageState, WaitUntil};
pub use http::{Headers, HttpMethod};
pub use response::{Request, Response};
pub use session::{Body, ProxyConfig, RequestOptions, Session, SessionConfig};
pub use transport::{DirectTransport, ImpersonationProfile};

/// Default timeout for both direct requests and navigations.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
