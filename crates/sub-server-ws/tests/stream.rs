// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Socket-level tests for the WebSocket push endpoint.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use streamfeed_core::{Feed, FeedConfig};
use streamfeed_sub_api::Subsystem;
use streamfeed_sub_server::{AppState, ServerConfig};
use streamfeed_sub_server_ws::WsSubsystem;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type ClientSocket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn start_server() -> WsSubsystem {
	let feed = Feed::new(FeedConfig {
		batch_size: 3,
		batch_interval: Duration::from_millis(2),
	});
	let state = AppState::new(feed, ServerConfig::default());
	let mut ws = WsSubsystem::new("127.0.0.1:0".to_string(), state);
	ws.start().await.unwrap();
	ws
}

async fn connect(ws: &WsSubsystem) -> ClientSocket {
	let (socket, _) = connect_async(format!("ws://127.0.0.1:{}", ws.port().unwrap())).await.unwrap();
	socket
}

async fn send_json(socket: &mut ClientSocket, value: Value) {
	socket.send(Message::text(value.to_string())).await.unwrap();
}

async fn recv_json(socket: &mut ClientSocket) -> Value {
	loop {
		let message = socket.next().await.unwrap().unwrap();
		if message.is_text() {
			return serde_json::from_str(message.to_text().unwrap()).unwrap();
		}
	}
}

/// Wait until the server has processed every connection teardown.
async fn drain_connections(ws: &WsSubsystem) {
	while ws.active_connections() > 0 {
		tokio::time::sleep(Duration::from_millis(2)).await;
	}
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stream_delivers_ordered_batches() {
	let mut ws = start_server().await;
	let mut socket = connect(&ws).await;

	send_json(&mut socket, json!({"id": "1", "type": "Stream", "payload": {"from_id": 0}})).await;

	let mut next_id = 0;
	for _ in 0..3 {
		let value = recv_json(&mut socket).await;
		assert_eq!(value["id"], "1");
		assert_eq!(value["type"], "Batch");

		let items = value["payload"]["items"].as_array().unwrap();
		assert_eq!(items.len(), 3);
		for item in items {
			assert_eq!(item["id"].as_u64().unwrap(), next_id);
			assert_eq!(item["payload"], "X");
			next_id += 1;
		}
	}

	socket.close(None).await.unwrap();
	ws.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hello_assigns_a_connection_identity() {
	let mut ws = start_server().await;
	let mut socket = connect(&ws).await;

	send_json(&mut socket, json!({"id": "1", "type": "Hello", "payload": {}})).await;

	let value = recv_json(&mut socket).await;
	assert_eq!(value["type"], "Hello");
	assert!(value["payload"]["connection_id"].is_string());

	socket.close(None).await.unwrap();
	ws.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reconnect_adopts_the_previous_identity_and_resumes() {
	let mut ws = start_server().await;

	// First session: learn the identity, stream a little, drop the
	// socket.
	let mut first = connect(&ws).await;
	send_json(&mut first, json!({"id": "1", "type": "Hello", "payload": {}})).await;
	let hello = recv_json(&mut first).await;
	let identity = hello["payload"]["connection_id"].as_str().unwrap().to_string();

	send_json(&mut first, json!({"id": "2", "type": "Stream", "payload": {"from_id": 0}})).await;
	let batch = recv_json(&mut first).await;
	assert_eq!(batch["type"], "Batch");
	let last_seen = batch["payload"]["items"].as_array().unwrap().last().unwrap()["id"].as_u64().unwrap();
	first.close(None).await.unwrap();
	drain_connections(&ws).await;

	// Second session: adopt the identity, restart the stream from the
	// last seen id + 1.
	let mut second = connect(&ws).await;
	send_json(&mut second, json!({"id": "3", "type": "Hello", "payload": {"connection_id": identity}})).await;
	let hello = recv_json(&mut second).await;
	assert_eq!(hello["payload"]["connection_id"].as_str().unwrap(), identity);

	let resume_from = last_seen + 1;
	send_json(&mut second, json!({"id": "4", "type": "Stream", "payload": {"from_id": resume_from}})).await;
	let batch = recv_json(&mut second).await;
	let items = batch["payload"]["items"].as_array().unwrap();
	assert_eq!(items[0]["id"].as_u64().unwrap(), resume_from);

	second.close(None).await.unwrap();
	ws.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_cursor_yields_an_error_response() {
	let mut ws = start_server().await;
	let mut socket = connect(&ws).await;

	send_json(&mut socket, json!({"id": "1", "type": "Stream", "payload": {"from_id": -1}})).await;

	let value = recv_json(&mut socket).await;
	assert_eq!(value["id"], "1");
	assert_eq!(value["type"], "Error");
	assert_eq!(value["payload"]["code"], "INVALID_CURSOR");

	socket.close(None).await.unwrap();
	ws.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_request_yields_an_error_response() {
	let mut ws = start_server().await;
	let mut socket = connect(&ws).await;

	socket.send(Message::text("not json")).await.unwrap();

	let value = recv_json(&mut socket).await;
	assert_eq!(value["type"], "Error");
	assert_eq!(value["payload"]["code"], "INVALID_REQUEST");

	socket.close(None).await.unwrap();
	ws.shutdown().await.unwrap();
}
