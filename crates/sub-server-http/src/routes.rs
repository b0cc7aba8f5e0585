// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Route table for the HTTP subsystem.

use axum::{Router, routing::get};
use streamfeed_sub_server::AppState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{handle_feed, health};

/// Build the router with all endpoints and shared state.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/feed", get(handle_feed))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}
