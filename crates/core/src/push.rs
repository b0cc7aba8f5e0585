// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Push delivery: forward a cursor walk to one connection as batches
//! are produced.

use tokio::sync::mpsc;

use crate::{
	error::FeedError,
	feed::Feed,
	item::Batch,
	registry::{ConnectionId, ScopeRegistry},
};

/// Stream batches to a single connection until its scope fires.
///
/// The walk runs with no soft limit: a live feed ends only when the
/// connection goes away. Batches enter the bounded `sink` in production
/// order from one sequential task, and the send is awaited, so a
/// consumer that falls behind pauses production instead of piling up
/// batches.
///
/// Cancellation and a dropped receiver both end the stream silently;
/// the connection is gone either way. An invalid cursor is reported to
/// the caller before anything is produced.
pub async fn stream_to(
	feed: &Feed,
	registry: &ScopeRegistry,
	connection_id: ConnectionId,
	from_id: Option<i64>,
	sink: mpsc::Sender<Batch>,
) -> Result<(), FeedError> {
	let cancel = registry.signal_for(connection_id);
	let mut stream = feed.query(from_id, None, cancel)?;

	loop {
		match stream.next_batch().await {
			Ok(Some(batch)) => {
				if sink.send(batch).await.is_err() {
					tracing::debug!("Push sink for connection {} dropped, ending stream", connection_id);
					break;
				}
			}
			Ok(None) => break,
			Err(FeedError::Cancelled) => {
				tracing::debug!("Stream for connection {} cancelled", connection_id);
				break;
			}
			Err(err) => return Err(err),
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, time::Duration};

	use super::*;
	use crate::feed::FeedConfig;

	const INTERVAL: Duration = Duration::from_millis(10);

	fn quick_feed() -> Feed {
		Feed::new(FeedConfig {
			batch_size: 3,
			batch_interval: INTERVAL,
		})
	}

	#[tokio::test(start_paused = true)]
	async fn test_batches_arrive_in_production_order() {
		let registry = Arc::new(ScopeRegistry::new());
		let id = ConnectionId::now_v7();
		registry.on_connect(id);

		let (tx, mut rx) = mpsc::channel(16);
		let feed = quick_feed();
		let task_registry = registry.clone();
		let streaming = tokio::spawn(async move { stream_to(&feed, &task_registry, id, Some(4), tx).await });

		let mut next_id = 4;
		for _ in 0..3 {
			let batch = rx.recv().await.unwrap();
			for item in &batch.items {
				assert_eq!(item.id, next_id);
				next_id += 1;
			}
		}

		streaming.abort();
	}

	#[tokio::test(start_paused = true)]
	async fn test_disconnect_stops_delivery_after_batches_in_flight() {
		let registry = Arc::new(ScopeRegistry::new());
		let id = ConnectionId::now_v7();
		registry.on_connect(id);

		let (tx, mut rx) = mpsc::channel(16);
		let feed = quick_feed();
		let task_registry = registry.clone();
		let streaming = tokio::spawn(async move { stream_to(&feed, &task_registry, id, None, tx).await });

		// Observe two batches, then drop the connection. The producer
		// is parked in its third pacing wait and must not complete it.
		assert!(rx.recv().await.is_some());
		assert!(rx.recv().await.is_some());
		registry.on_disconnect(id);

		assert!(rx.recv().await.is_none());
		assert_eq!(streaming.await.unwrap(), Ok(()));
	}

	#[tokio::test(start_paused = true)]
	async fn test_dropped_receiver_ends_the_stream() {
		let registry = Arc::new(ScopeRegistry::new());
		let id = ConnectionId::now_v7();
		registry.on_connect(id);

		let (tx, mut rx) = mpsc::channel(1);
		let feed = quick_feed();
		let task_registry = registry.clone();
		let streaming = tokio::spawn(async move { stream_to(&feed, &task_registry, id, None, tx).await });

		assert!(rx.recv().await.is_some());
		drop(rx);

		assert_eq!(streaming.await.unwrap(), Ok(()));
		registry.on_disconnect(id);
	}

	#[tokio::test]
	async fn test_unknown_connection_streams_nothing() {
		let registry = ScopeRegistry::new();
		let (tx, mut rx) = mpsc::channel(1);

		// No scope installed: the signal is already fired and the walk
		// ends before its first step.
		let result = stream_to(&quick_feed(), &registry, ConnectionId::now_v7(), None, tx).await;

		assert_eq!(result, Ok(()));
		assert!(rx.recv().await.is_none());
	}

	#[tokio::test]
	async fn test_invalid_cursor_is_reported() {
		let registry = ScopeRegistry::new();
		let id = ConnectionId::now_v7();
		registry.on_connect(id);

		let (tx, _rx) = mpsc::channel(1);
		let err = stream_to(&quick_feed(), &registry, id, Some(-3), tx).await.unwrap_err();

		assert_eq!(err, FeedError::InvalidCursor(-3));
		registry.on_disconnect(id);
	}
}
