//! Desired and actual engine configuration.
//!
//! Families are a closed set: the generic automation engine (with selectable
//! sub-engine), a hardened/patched variant, and a stealth-branded build. The
//! latter two embed anti-detection behavior, so the external stealth wrapper
//! is only meaningful for the generic family.

use hs_protocol::LaunchOptions;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A class of browser engine runtime with distinct launch semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineFamily {
	/// The stock automation engine; sub-engine chosen via [`EngineVariant`].
	#[default]
	Generic,
	/// Patched drop-in build with anti-detection baked in.
	Hardened,
	/// Stealth-branded build with its own runtime.
	StealthBranded,
}

impl EngineFamily {
	/// Whether anti-detection behavior is already embedded in the build.
	pub fn embeds_stealth(&self) -> bool {
		matches!(self, EngineFamily::Hardened | EngineFamily::StealthBranded)
	}
}

impl std::fmt::Display for EngineFamily {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			EngineFamily::Generic => "generic",
			EngineFamily::Hardened => "hardened",
			EngineFamily::StealthBranded => "stealth-branded",
		};
		f.write_str(s)
	}
}

/// Sub-engine of the generic family. Ignored by the other families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineVariant {
	#[default]
	Chromium,
	Firefox,
	Webkit,
}

impl std::fmt::Display for EngineVariant {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			EngineVariant::Chromium => "chromium",
			EngineVariant::Firefox => "firefox",
			EngineVariant::Webkit => "webkit",
		};
		f.write_str(s)
	}
}

/// What the session wants running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineDesiredConfig {
	pub family: EngineFamily,
	pub variant: EngineVariant,
	pub headless: bool,
	pub stealth_wrapped: bool,
	pub launch_options: LaunchOptions,
}

impl EngineDesiredConfig {
	pub fn new(family: EngineFamily) -> Self {
		Self {
			family,
			headless: true,
			..Default::default()
		}
	}

	/// Rejects flag combinations that can never be satisfied.
	pub fn validate(&self) -> Result<()> {
		if self.stealth_wrapped && self.family.embeds_stealth() {
			return Err(Error::Configuration(format!(
				"stealth wrapping is incompatible with the {} family; it already embeds anti-detection",
				self.family
			)));
		}
		Ok(())
	}
}

/// What is currently running. Tracked by the reconciler only.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineActualState {
	pub family: EngineFamily,
	pub variant: EngineVariant,
	pub headless: bool,
	pub stealth_wrapped: bool,
	pub launch_options: LaunchOptions,
}

impl EngineActualState {
	pub fn from_desired(desired: &EngineDesiredConfig) -> Self {
		Self {
			family: desired.family,
			variant: desired.variant,
			headless: desired.headless,
			stealth_wrapped: desired.stealth_wrapped,
			launch_options: desired.launch_options.clone(),
		}
	}

	/// Browser-instance-level drift only: variant, headless, or launch flags.
	pub fn browser_stale(&self, desired: &EngineDesiredConfig) -> bool {
		self.variant != desired.variant
			|| self.headless != desired.headless
			|| self.launch_options != desired.launch_options
	}
}
