// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Shared application state.

use std::{sync::Arc, time::Duration};

use streamfeed_core::{Feed, ScopeRegistry};

use crate::config::ServerConfig;

/// State shared by every transport subsystem.
///
/// Cheap to clone; all clones observe the same feed and registry.
#[derive(Debug, Clone)]
pub struct AppState {
	feed: Arc<Feed>,
	registry: Arc<ScopeRegistry>,
	config: Arc<ServerConfig>,
}

impl AppState {
	pub fn new(feed: Feed, config: ServerConfig) -> Self {
		Self {
			feed: Arc::new(feed),
			registry: Arc::new(ScopeRegistry::new()),
			config: Arc::new(config),
		}
	}

	pub fn feed(&self) -> &Feed {
		&self.feed
	}

	pub fn feed_clone(&self) -> Arc<Feed> {
		self.feed.clone()
	}

	pub fn registry(&self) -> &ScopeRegistry {
		&self.registry
	}

	pub fn registry_clone(&self) -> Arc<ScopeRegistry> {
		self.registry.clone()
	}

	pub fn config(&self) -> &ServerConfig {
		&self.config
	}

	pub fn default_limit(&self) -> u64 {
		self.config.default_limit
	}

	pub fn request_timeout(&self) -> Duration {
		self.config.request_timeout
	}

	pub fn max_connections(&self) -> usize {
		self.config.max_connections
	}

	pub fn push_buffer(&self) -> usize {
		self.config.push_buffer
	}
}
