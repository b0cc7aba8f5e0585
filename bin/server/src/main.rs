// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

use streamfeed_core::{Feed, FeedConfig};
use streamfeed_sub_api::Subsystem;
use streamfeed_sub_server::{AppState, ServerConfig};
use streamfeed_sub_server_http::HttpSubsystem;
use streamfeed_sub_server_ws::WsSubsystem;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let config = ServerConfig::default();
	let state = AppState::new(Feed::new(FeedConfig::default()), config.clone());

	let mut http = HttpSubsystem::new(config.http_bind.clone(), state.clone());
	let mut ws = WsSubsystem::new(config.ws_bind.clone(), state);

	if let Err(e) = http.start().await {
		tracing::error!("Failed to start {} subsystem: {}", http.name(), e);
		return;
	}
	if let Err(e) = ws.start().await {
		tracing::error!("Failed to start {} subsystem: {}", ws.name(), e);
		return;
	}

	tracing::info!("streamfeed serving (pull: {}, push: {})", config.http_bind, config.ws_bind);

	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal: {}", e);
	}

	tracing::info!("Shutting down");
	let _ = ws.shutdown().await;
	let _ = http.shutdown().await;
}
