// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Cancellation scopes keyed by connection.
//!
//! The registry tracks one revocable cancellation signal per live
//! connection: created on connect, fired and replaced on reconnect,
//! fired and removed on disconnect. Adapters look the signal up by
//! connection id rather than holding it across lifecycle events.

use dashmap::DashMap;
use uuid::Uuid;

use crate::cancel::{CancelSignal, CancelSource};

/// Unique identifier for a transport connection.
pub type ConnectionId = Uuid;

/// Process-wide store of per-connection cancellation scopes.
///
/// Holds at most one live source per connection id; per-key mutations
/// are atomic with respect to concurrent lifecycle events for the same
/// id. Thread-safe and shared across connection handlers.
#[derive(Debug)]
pub struct ScopeRegistry {
	scopes: DashMap<ConnectionId, CancelSource>,
}

impl ScopeRegistry {
	/// Create a new empty registry.
	pub fn new() -> Self {
		Self {
			scopes: DashMap::new(),
		}
	}

	/// Install a fresh scope for a newly connected `id`.
	///
	/// An existing entry is replaced without explicit firing: the
	/// caller is assumed to be a new connection reusing the id.
	pub fn on_connect(&self, id: ConnectionId) {
		self.scopes.insert(id, CancelSource::new());
		tracing::debug!("Installed cancellation scope for connection {}", id);
	}

	/// Fire and remove the scope for `id`.
	///
	/// Unknown ids are a no-op, so the operation is idempotent.
	pub fn on_disconnect(&self, id: ConnectionId) {
		if let Some((_, source)) = self.scopes.remove(&id) {
			source.cancel();
			tracing::debug!("Fired cancellation scope for disconnected connection {}", id);
		}
	}

	/// Fire the old scope for `id`, if any, then install a fresh one.
	///
	/// Equivalent to a disconnect immediately followed by a connect;
	/// the old signal is never current alongside the new one. Without a
	/// prior connect this behaves exactly like [`Self::on_connect`].
	pub fn on_reconnect(&self, id: ConnectionId) {
		if let Some((_, source)) = self.scopes.remove(&id) {
			source.cancel();
		}
		self.scopes.insert(id, CancelSource::new());
		tracing::debug!("Replaced cancellation scope for reconnected connection {}", id);
	}

	/// The current signal for `id`.
	///
	/// A consumer racing a disconnect gets an already-fired signal
	/// rather than an error.
	pub fn signal_for(&self, id: ConnectionId) -> CancelSignal {
		self.scopes.get(&id).map(|source| source.signal()).unwrap_or_else(CancelSignal::fired)
	}

	/// Number of live scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}
}

impl Default for ScopeRegistry {
	fn default() -> Self {
		Self::new()
	}
}
