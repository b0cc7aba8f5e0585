// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! The incremental producer.
//!
//! [`Feed`] stands in for a real data store: it answers cursor queries
//! slowly and incrementally, one paced batch per production step, the
//! way a paginating storage scan would hand rows out.

use std::time::Duration;

use tokio::time::sleep;

use crate::{
	cancel::CancelSignal,
	error::FeedError,
	item::{Batch, Item},
};

/// Payload carried by every synthesized item.
const ITEM_PAYLOAD: &str = "X";

/// Production parameters for a [`Feed`].
#[derive(Debug, Clone)]
pub struct FeedConfig {
	/// Items synthesized per production step.
	pub batch_size: u64,
	/// Pacing interval awaited before each production step.
	pub batch_interval: Duration,
}

impl Default for FeedConfig {
	fn default() -> Self {
		Self {
			batch_size: 3,
			batch_interval: Duration::from_secs(1),
		}
	}
}

/// An in-memory data source that produces ordered items on a cursor.
#[derive(Debug, Clone)]
pub struct Feed {
	config: FeedConfig,
}

impl Feed {
	pub fn new(config: FeedConfig) -> Self {
		Self {
			config,
		}
	}

	pub fn config(&self) -> &FeedConfig {
		&self.config
	}

	/// Start a cursor walk.
	///
	/// # Arguments
	///
	/// * `from_id` - start from this id (useful for resuming after an
	///   interruption); `None` starts from the beginning
	/// * `soft_limit` - stop after (softly) this many items; checked
	///   between batches only, so the last batch may overshoot
	/// * `cancel` - abort production as soon as the signal fires
	///
	/// A negative `from_id` is rejected before anything is produced.
	/// Without a soft limit the walk is unbounded and ends only through
	/// cancellation, so callers must always supply a cancellation path.
	pub fn query(
		&self,
		from_id: Option<i64>,
		soft_limit: Option<u64>,
		cancel: CancelSignal,
	) -> Result<BatchStream, FeedError> {
		let cursor = match from_id {
			None => 0,
			Some(id) if id >= 0 => id as u64,
			Some(id) => return Err(FeedError::InvalidCursor(id)),
		};

		Ok(BatchStream {
			cursor,
			produced: 0,
			soft_limit,
			cancel,
			config: self.config.clone(),
			done: false,
		})
	}
}

/// A one-shot, forward-only walk over the feed.
///
/// The stream cannot be rewound; resuming after an interruption means
/// issuing a new query with the last seen id + 1 as the cursor.
#[derive(Debug)]
pub struct BatchStream {
	cursor: u64,
	produced: u64,
	soft_limit: Option<u64>,
	cancel: CancelSignal,
	config: FeedConfig,
	done: bool,
}

impl BatchStream {
	/// Produce the next batch.
	///
	/// `Ok(None)` is the natural end of the walk (soft limit reached).
	/// `Err(FeedError::Cancelled)` means the signal fired during this
	/// step; no partial batch is emitted and every later call returns
	/// `Ok(None)`.
	pub async fn next_batch(&mut self) -> Result<Option<Batch>, FeedError> {
		if self.done {
			return Ok(None);
		}

		// Soft limit: checked once per completed batch, so the batch
		// that crossed it went out un-clipped.
		if let Some(limit) = self.soft_limit {
			if self.produced >= limit {
				self.done = true;
				return Ok(None);
			}
		}

		if self.cancel.is_cancelled() {
			self.done = true;
			return Err(FeedError::Cancelled);
		}

		// The store is slow. The pacing wait doubles as the
		// cancellation point for the whole step.
		tokio::select! {
			biased;

			_ = self.cancel.cancelled() => {
				self.done = true;
				Err(FeedError::Cancelled)
			}

			_ = sleep(self.config.batch_interval) => {
				let items = (0..self.config.batch_size)
					.map(|offset| Item {
						id: self.cursor + offset,
						payload: ITEM_PAYLOAD.to_string(),
					})
					.collect();
				self.cursor += self.config.batch_size;
				self.produced += self.config.batch_size;
				Ok(Some(Batch {
					items,
				}))
			}
		}
	}

	/// The next id this walk would produce from.
	pub fn cursor(&self) -> u64 {
		self.cursor
	}
}

#[cfg(test)]
mod tests {
	use tokio::time::Instant;

	use super::*;
	use crate::cancel::CancelSource;

	fn quick_feed() -> Feed {
		Feed::new(FeedConfig {
			batch_size: 3,
			batch_interval: Duration::from_millis(10),
		})
	}

	fn live_signal() -> (CancelSource, CancelSignal) {
		let source = CancelSource::new();
		let signal = source.signal();
		(source, signal)
	}

	#[tokio::test(start_paused = true)]
	async fn test_ids_are_sequential_from_cursor() {
		let (_source, signal) = live_signal();
		let mut stream = quick_feed().query(Some(5), None, signal).unwrap();

		let first = stream.next_batch().await.unwrap().unwrap();
		let second = stream.next_batch().await.unwrap().unwrap();

		let ids: Vec<u64> = first.items.iter().chain(second.items.iter()).map(|item| item.id).collect();
		assert_eq!(ids, vec![5, 6, 7, 8, 9, 10]);
		assert_eq!(stream.cursor(), 11);
	}

	#[tokio::test(start_paused = true)]
	async fn test_missing_cursor_starts_at_zero() {
		let (_source, signal) = live_signal();
		let mut stream = quick_feed().query(None, Some(3), signal).unwrap();

		let batch = stream.next_batch().await.unwrap().unwrap();
		assert_eq!(batch.items[0].id, 0);
		assert_eq!(batch.last_id(), Some(2));
	}

	#[tokio::test]
	async fn test_negative_cursor_is_rejected() {
		let (_source, signal) = live_signal();
		let err = quick_feed().query(Some(-1), None, signal).unwrap_err();
		assert_eq!(err, FeedError::InvalidCursor(-1));
	}

	#[tokio::test(start_paused = true)]
	async fn test_soft_limit_may_overshoot_by_one_batch() {
		let (_source, signal) = live_signal();
		let mut stream = quick_feed().query(None, Some(7), signal).unwrap();

		let mut total = 0;
		while let Some(batch) = stream.next_batch().await.unwrap() {
			total += batch.len();
		}
		// Smallest multiple of the batch size at or above the limit.
		assert_eq!(total, 9);
	}

	#[tokio::test(start_paused = true)]
	async fn test_soft_limit_on_batch_boundary_does_not_overshoot() {
		let (_source, signal) = live_signal();
		let mut stream = quick_feed().query(None, Some(6), signal).unwrap();

		let mut total = 0;
		while let Some(batch) = stream.next_batch().await.unwrap() {
			total += batch.len();
		}
		assert_eq!(total, 6);
	}

	#[tokio::test(start_paused = true)]
	async fn test_each_step_takes_one_pacing_interval() {
		let (_source, signal) = live_signal();
		let mut stream = quick_feed().query(None, Some(6), signal).unwrap();

		let started = Instant::now();
		while stream.next_batch().await.unwrap().is_some() {}
		assert_eq!(started.elapsed(), Duration::from_millis(20));
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancellation_interrupts_the_pacing_wait() {
		let (source, signal) = live_signal();
		let mut stream = quick_feed().query(None, None, signal).unwrap();

		let step = tokio::spawn(async move { stream.next_batch().await });

		// Let the producer park in its pacing wait, then fire.
		tokio::time::sleep(Duration::from_millis(1)).await;
		source.cancel();

		assert_eq!(step.await.unwrap(), Err(FeedError::Cancelled));
	}

	#[tokio::test(start_paused = true)]
	async fn test_prefired_signal_stops_production_immediately() {
		let mut stream = quick_feed().query(None, None, CancelSignal::fired()).unwrap();

		let started = Instant::now();
		assert_eq!(stream.next_batch().await, Err(FeedError::Cancelled));
		assert_eq!(started.elapsed(), Duration::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn test_stream_is_terminal_after_cancellation() {
		let mut stream = quick_feed().query(None, None, CancelSignal::fired()).unwrap();

		assert_eq!(stream.next_batch().await, Err(FeedError::Cancelled));
		assert_eq!(stream.next_batch().await, Ok(None));
	}
}
