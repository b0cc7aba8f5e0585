// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! HTTP endpoint handlers for the pull feed.
//!
//! This module provides the request handlers for:
//! - `/health` - Health check endpoint
//! - `/v1/feed` - Fetch a bounded slice of the feed

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use streamfeed_core::{CancelSource, Item, pull};
use streamfeed_sub_server::AppState;
use tokio::time::sleep;

use crate::error::AppError;

/// Query parameters for the feed endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
	/// Starting cursor; omitted means from the beginning.
	#[serde(default)]
	pub from_id: Option<i64>,
	/// Result count limit; defaults to the configured limit.
	#[serde(default)]
	pub limit: Option<u64>,
}

/// Response body for the feed endpoint.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
	/// Items in cursor order, truncated to exactly the limit.
	pub items: Vec<Item>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
}

/// Health check endpoint.
///
/// Returns 200 OK if the server is running.
///
/// # Response
///
/// ```json
/// {"status": "ok"}
/// ```
pub async fn health() -> impl IntoResponse {
	(StatusCode::OK, Json(HealthResponse {
		status: "ok",
	}))
}

/// Fetch a bounded slice of the feed.
///
/// # Request
///
/// `GET /v1/feed?from_id=0&limit=7`
///
/// Both parameters are optional: `from_id` defaults to the beginning of
/// the feed, `limit` to the configured default.
///
/// # Response
///
/// ```json
/// {"items": [{"id": 0, "payload": "X"}, ...]}
/// ```
///
/// The fetch runs under a request-scoped cancellation signal fired by
/// the configured request budget. A cancelled fetch returns an error,
/// never partial data.
pub async fn handle_feed(
	State(state): State<AppState>,
	Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, AppError> {
	let limit = params.limit.unwrap_or_else(|| state.default_limit());

	let source = CancelSource::new();
	let fetch = pull::fetch(state.feed(), params.from_id, Some(limit), source.signal());
	tokio::pin!(fetch);

	let items = tokio::select! {
		result = &mut fetch => result?,

		_ = sleep(state.request_timeout()) => {
			source.cancel();
			// The producer observes the signal within one pacing
			// interval and resolves as cancelled.
			fetch.await?
		}
	};

	tracing::debug!("Served {} items from cursor {:?}", items.len(), params.from_id);
	Ok(Json(FeedResponse {
		items,
	}))
}
