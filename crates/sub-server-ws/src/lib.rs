// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! WebSocket server subsystem for streamfeed.
//!
//! This crate provides a tokio-tungstenite-based WebSocket server for
//! the push side of the feed: open-ended streams of batches delivered
//! to a connection as they are produced, under the connection's
//! cancellation scope. It runs on the shared tokio runtime and
//! implements the standard streamfeed `Subsystem` trait for lifecycle
//! management.
//!
//! # Features
//!
//! - Full WebSocket protocol support (RFC 6455)
//! - Connection-scoped cancellation: disconnect stops every stream on
//!   the connection within one pacing interval
//! - Logical reconnect via the Hello message
//! - Connection limits via semaphore
//! - Graceful shutdown with connection draining
//!
//! # Message Protocol
//!
//! All messages are JSON-formatted with the following structure:
//!
//! ```json
//! {
//!   "id": "unique-request-id",
//!   "type": "Hello|Stream",
//!   "payload": { ... }
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use streamfeed_core::{Feed, FeedConfig};
//! use streamfeed_sub_server::{AppState, ServerConfig};
//! use streamfeed_sub_server_ws::WsSubsystem;
//!
//! let state = AppState::new(Feed::new(FeedConfig::default()), ServerConfig::default());
//!
//! let mut ws = WsSubsystem::new("127.0.0.1:8091".to_string(), state);
//! ws.start().await?;
//! ```

pub mod handler;
pub mod protocol;
pub mod subsystem;

pub use handler::handle_connection;
pub use protocol::{HelloRequest, Request, RequestPayload, Response, ResponsePayload, StreamRequest};
pub use subsystem::WsSubsystem;
