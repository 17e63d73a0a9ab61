//! Wire types shared between the session core and browser-engine drivers.
//!
//! This crate contains the serde-serializable shapes exchanged with a
//! rendering engine: the storage-state snapshot (cookies + per-origin
//! localStorage), launch options, and navigation wait conditions.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * Stable: The storage-state JSON shape is a documented interchange format
//!   that callers may persist and reload
//!
//! The session core's richer cookie model lives in `hs-rs`; it converts to
//! and from these wire shapes at the engine boundary.

pub mod cookie;
pub mod options;

pub use cookie::*;
pub use options::*;
