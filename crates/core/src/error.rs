// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Error taxonomy for the feed core.

/// Errors surfaced by the feed core.
///
/// `Cancelled` is a cooperative abort, not a fault: it is a normal
/// terminal state that stays distinguishable from natural completion so
/// callers can decide whether to treat it as success or abort. Reaching
/// a limit or running out of items is never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
	/// Production was stopped by a cancellation signal.
	#[error("feed cancelled")]
	Cancelled,
	/// The starting cursor is malformed; rejected before production
	/// starts.
	#[error("invalid cursor: {0}")]
	InvalidCursor(i64),
}
