// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Pull delivery: accumulate a cursor walk into one bounded result.

use crate::{cancel::CancelSignal, error::FeedError, feed::Feed, item::Item};

/// Fetch items starting at `from_id`, truncated to exactly `limit`.
///
/// The feed is queried with `limit` as its soft limit; batches are
/// flattened in production order and cut off hard at `limit`, after
/// which no further production step runs. Without a limit this collects
/// until the walk ends, so callers must bound it through the
/// cancellation signal instead.
///
/// Cancellation before completion surfaces as
/// [`FeedError::Cancelled`], never as a truncated success.
pub async fn fetch(
	feed: &Feed,
	from_id: Option<i64>,
	limit: Option<u64>,
	cancel: CancelSignal,
) -> Result<Vec<Item>, FeedError> {
	let mut stream = feed.query(from_id, limit, cancel)?;
	let mut items: Vec<Item> = Vec::new();

	loop {
		if let Some(limit) = limit {
			if items.len() as u64 >= limit {
				items.truncate(limit as usize);
				break;
			}
		}
		match stream.next_batch().await? {
			Some(batch) => items.extend(batch.into_items()),
			None => break,
		}
	}

	Ok(items)
}
