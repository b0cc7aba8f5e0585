// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! One-shot cancellation signalling.
//!
//! A [`CancelSource`] owns the stop flag for one logical session;
//! [`CancelSignal`] clones observe it. Once fired the flag cannot be
//! unset; a new session needs a new source.

use tokio::sync::watch;

/// Owning side of a cancellation scope.
#[derive(Debug)]
pub struct CancelSource {
	tx: watch::Sender<bool>,
}

impl CancelSource {
	/// Create a new, not-yet-fired source.
	pub fn new() -> Self {
		let (tx, _rx) = watch::channel(false);
		Self {
			tx,
		}
	}

	/// Fire the signal. Idempotent.
	pub fn cancel(&self) {
		let _ = self.tx.send(true);
	}

	pub fn is_cancelled(&self) -> bool {
		*self.tx.borrow()
	}

	/// A new observer of this source.
	pub fn signal(&self) -> CancelSignal {
		CancelSignal {
			rx: self.tx.subscribe(),
		}
	}
}

impl Default for CancelSource {
	fn default() -> Self {
		Self::new()
	}
}

/// Observing side of a cancellation scope.
///
/// A signal whose source has been dropped reads as cancelled: a scope
/// that no longer exists cannot keep production alive.
#[derive(Debug, Clone)]
pub struct CancelSignal {
	rx: watch::Receiver<bool>,
}

impl CancelSignal {
	/// A signal that is already fired, for consumers racing a
	/// disconnect.
	pub fn fired() -> Self {
		let (tx, rx) = watch::channel(true);
		drop(tx);
		Self {
			rx,
		}
	}

	pub fn is_cancelled(&self) -> bool {
		*self.rx.borrow() || self.rx.has_changed().is_err()
	}

	/// Resolve once the signal fires.
	pub async fn cancelled(&mut self) {
		loop {
			if *self.rx.borrow_and_update() {
				return;
			}
			if self.rx.changed().await.is_err() {
				// Source dropped without firing.
				return;
			}
		}
	}
}
