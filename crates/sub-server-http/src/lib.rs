// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! HTTP server subsystem for streamfeed.
//!
//! This crate provides an Axum-based HTTP server for the pull side of
//! the feed: one request, one accumulated and limit-truncated result.
//! It runs on the shared tokio runtime and implements the standard
//! streamfeed `Subsystem` trait for lifecycle management.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /v1/feed` - Fetch items starting at a cursor, truncated to a
//!   result limit
//!
//! # Example
//!
//! ```ignore
//! use streamfeed_core::{Feed, FeedConfig};
//! use streamfeed_sub_server::{AppState, ServerConfig};
//! use streamfeed_sub_server_http::HttpSubsystem;
//!
//! let state = AppState::new(Feed::new(FeedConfig::default()), ServerConfig::default());
//!
//! let mut http = HttpSubsystem::new("127.0.0.1:8090".to_string(), state);
//! http.start().await?;
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod subsystem;

pub use error::{AppError, ErrorResponse};
pub use handlers::{FeedParams, FeedResponse};
pub use routes::router;
pub use subsystem::HttpSubsystem;
