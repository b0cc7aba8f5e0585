// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Server configuration.

use std::time::Duration;

/// Configuration shared by the transport subsystems.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	/// Bind address for the HTTP (pull) server.
	pub http_bind: String,
	/// Bind address for the WebSocket (push) server.
	pub ws_bind: String,
	/// Item limit applied to pull requests that do not specify one.
	pub default_limit: u64,
	/// Budget after which an in-flight pull request is cancelled.
	pub request_timeout: Duration,
	/// Maximum concurrent WebSocket connections.
	pub max_connections: usize,
	/// Outbound messages buffered per connection before production
	/// pauses.
	pub push_buffer: usize,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			http_bind: "127.0.0.1:8090".to_string(),
			ws_bind: "127.0.0.1:8091".to_string(),
			default_limit: 100,
			request_timeout: Duration::from_secs(30),
			max_connections: 256,
			push_buffer: 16,
		}
	}
}
