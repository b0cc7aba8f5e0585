// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! WebSocket request and response types for the push protocol.
//!
//! These types define the JSON message format for WebSocket
//! client-server communication. Requests and responses are correlated
//! by `id`; batch deliveries carry the id of the `Stream` request that
//! started them.

use serde::{Deserialize, Serialize};
use streamfeed_core::{ConnectionId, Item};

/// A WebSocket request message.
///
/// Each request has a unique `id` that clients use to correlate
/// responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
	pub id: String,
	#[serde(flatten)]
	pub payload: RequestPayload,
}

/// The payload of a WebSocket request.
///
/// Discriminated by the `type` field in JSON:
/// - `"Hello"` - adopt or confirm a connection identity
/// - `"Stream"` - begin streaming batches from a cursor
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RequestPayload {
	Hello(HelloRequest),
	Stream(StreamRequest),
}

/// Hello request payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HelloRequest {
	/// Connection id from a previous session; present on a logical
	/// reconnect.
	#[serde(default)]
	pub connection_id: Option<ConnectionId>,
}

/// Stream request payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamRequest {
	/// Starting cursor; omitted means from the beginning. Clients
	/// resuming after a reconnect pass the last id they saw + 1.
	#[serde(default)]
	pub from_id: Option<i64>,
}

/// A WebSocket response message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
	pub id: String,
	#[serde(flatten)]
	pub payload: ResponsePayload,
}

/// The payload of a WebSocket response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ResponsePayload {
	Hello(HelloResponse),
	Batch(BatchResponse),
	Error(ErrorResponse),
}

/// Hello response payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HelloResponse {
	/// The identity this connection streams under.
	pub connection_id: ConnectionId,
}

/// One delivered production step.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
	pub items: Vec<Item>,
}

/// Request-level failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub code: String,
	pub message: String,
}

impl Response {
	pub fn hello(id: impl Into<String>, connection_id: ConnectionId) -> Self {
		Self {
			id: id.into(),
			payload: ResponsePayload::Hello(HelloResponse {
				connection_id,
			}),
		}
	}

	pub fn batch(id: impl Into<String>, items: Vec<Item>) -> Self {
		Self {
			id: id.into(),
			payload: ResponsePayload::Batch(BatchResponse {
				items,
			}),
		}
	}

	pub fn error(id: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			payload: ResponsePayload::Error(ErrorResponse {
				code: code.into(),
				message: message.into(),
			}),
		}
	}
}
