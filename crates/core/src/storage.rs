//! Storage-state projection and merge-back.
//!
//! A rendering context is seeded with a point-in-time snapshot of session
//! state and, when it closes, its final state is folded back in: cookies are
//! added/updated through the jar's merge, localStorage is fully overwritten
//! per origin. Session storage never crosses this boundary.

use std::collections::BTreeMap;

use hs_protocol::{LocalStorageEntry, OriginState, StorageState};
use tracing::debug;

use crate::cookies::{Cookie, CookieJar};

/// Per-origin localStorage: origin → key → value.
///
/// Ordered maps keep snapshots deterministic.
pub type LocalStorage = BTreeMap<String, BTreeMap<String, String>>;

/// Builds the snapshot used to seed a new rendering context.
///
/// Origins with no entries are skipped; expired cookies are carried as-is
/// (the engine applies its own expiry rules).
pub fn build_storage_state(jar: &CookieJar, local_storage: &LocalStorage) -> StorageState {
	let origins = local_storage
		.iter()
		.filter(|(_, kv)| !kv.is_empty())
		.map(|(origin, kv)| OriginState {
			origin: origin.clone(),
			local_storage: kv
				.iter()
				.map(|(name, value)| LocalStorageEntry {
					name: name.clone(),
					value: value.clone(),
				})
				.collect(),
		})
		.collect();

	StorageState {
		cookies: jar.to_wire(),
		origins,
	}
}

/// Folds a context's final storage state back into the session.
///
/// Cookies go through [`CookieJar::merge`] (add/update, never drop);
/// localStorage is an exact overwrite for every origin present in the
/// snapshot.
pub fn merge_storage_state(state: StorageState, jar: &mut CookieJar, local_storage: &mut LocalStorage) {
	let cookie_count = state.cookies.len();
	jar.merge(state.cookies.iter().map(Cookie::from_wire));

	for origin in state.origins {
		if origin.origin.is_empty() {
			continue;
		}
		let kv: BTreeMap<String, String> = origin
			.local_storage
			.into_iter()
			.map(|entry| (entry.name, entry.value))
			.collect();
		local_storage.insert(origin.origin, kv);
	}

	debug!(
		target = "hs.jar",
		cookies = cookie_count,
		origins = local_storage.len(),
		"merged storage state from context"
	);
}
