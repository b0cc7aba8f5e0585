// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Per-connection WebSocket handling.
//!
//! Each accepted socket gets a reader (the connection task itself) and
//! a single writer task fed by a bounded message channel. Producers
//! never touch the socket directly, so batches for one connection go
//! out in production order through one writer.

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use streamfeed_core::{Batch, ConnectionId, FeedError, push};
use streamfeed_sub_server::AppState;
use tokio::{
	net::TcpStream,
	spawn,
	sync::{mpsc, watch},
};
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};

use crate::protocol::{Request, RequestPayload, Response};

/// Handle one accepted TCP connection for its whole lifetime.
///
/// Installs a cancellation scope for the connection on open and fires
/// it on close; every stream started over this socket runs under that
/// scope. The scope moves to a previous identity when the client sends
/// a `Hello` carrying its old connection id (logical reconnect).
pub async fn handle_connection(stream: TcpStream, state: AppState, mut shutdown_rx: watch::Receiver<bool>) {
	let ws = match accept_async(stream).await {
		Ok(ws) => ws,
		Err(e) => {
			tracing::warn!("WebSocket handshake failed: {}", e);
			return;
		}
	};
	let (ws_tx, mut ws_rx) = ws.split();

	let mut connection_id = ConnectionId::now_v7();
	state.registry().on_connect(connection_id);
	tracing::debug!("Connection {} established", connection_id);

	// Single writer: all outbound frames funnel through this channel.
	let (out_tx, out_rx) = mpsc::channel::<Message>(state.push_buffer());
	let writer = spawn(write_outbound(ws_tx, out_rx));

	loop {
		tokio::select! {
			biased;

			// Check shutdown first
			result = shutdown_rx.changed() => {
				if result.is_err() || *shutdown_rx.borrow() {
					tracing::debug!("Connection {} closing for shutdown", connection_id);
					break;
				}
			}

			message = ws_rx.next() => {
				match message {
					Some(Ok(Message::Text(text))) => {
						connection_id = handle_request(text.as_str(), connection_id, &state, &out_tx).await;
					}
					Some(Ok(Message::Ping(data))) => {
						let _ = out_tx.send(Message::Pong(data)).await;
					}
					Some(Ok(Message::Close(_))) | None => break,
					Some(Ok(_)) => {
						// Binary and pong frames carry nothing for us.
					}
					Some(Err(e)) => {
						tracing::debug!("Connection {} read error: {}", connection_id, e);
						break;
					}
				}
			}
		}
	}

	state.registry().on_disconnect(connection_id);

	// Producers notice the fired scope within one pacing interval and
	// release their channel clones; the writer drains what is left.
	drop(out_tx);
	let _ = writer.await;
	tracing::debug!("Connection {} closed", connection_id);
}

/// Dispatch one request message; returns the (possibly adopted)
/// connection identity.
async fn handle_request(
	text: &str,
	current: ConnectionId,
	state: &AppState,
	out_tx: &mpsc::Sender<Message>,
) -> ConnectionId {
	let request: Request = match serde_json::from_str(text) {
		Ok(request) => request,
		Err(e) => {
			send_response(out_tx, Response::error("", "INVALID_REQUEST", format!("Malformed request: {}", e))).await;
			return current;
		}
	};

	match request.payload {
		RequestPayload::Hello(hello) => {
			let adopted = match hello.connection_id {
				Some(previous) if previous != current => {
					// Logical reconnect: invalidate the prior
					// scope, discard the provisional one for this
					// socket.
					state.registry().on_reconnect(previous);
					state.registry().on_disconnect(current);
					tracing::debug!("Connection {} adopted identity {}", current, previous);
					previous
				}
				_ => current,
			};
			send_response(out_tx, Response::hello(request.id, adopted)).await;
			adopted
		}
		RequestPayload::Stream(stream) => {
			start_stream(request.id, stream.from_id, current, state, out_tx.clone());
			current
		}
	}
}

/// Spawn the producer and delivery tasks for one `Stream` request.
///
/// The producer feeds a bounded batch channel; the delivery task turns
/// batches into correlated `Batch` responses on the connection's writer
/// channel. Both end when the connection's scope fires.
fn start_stream(
	request_id: String,
	from_id: Option<i64>,
	connection_id: ConnectionId,
	state: &AppState,
	out_tx: mpsc::Sender<Message>,
) {
	let feed = state.feed_clone();
	let registry = state.registry_clone();
	let (batch_tx, mut batch_rx) = mpsc::channel::<Batch>(state.push_buffer());

	let delivery_id = request_id.clone();
	let delivery_tx = out_tx.clone();
	spawn(async move {
		while let Some(batch) = batch_rx.recv().await {
			let response = Response::batch(delivery_id.clone(), batch.into_items());
			if !send_response(&delivery_tx, response).await {
				break;
			}
		}
	});

	spawn(async move {
		tracing::debug!("Stream {} starting for connection {} at cursor {:?}", request_id, connection_id, from_id);
		if let Err(e) = push::stream_to(&feed, &registry, connection_id, from_id, batch_tx).await {
			let code = match e {
				FeedError::InvalidCursor(_) => "INVALID_CURSOR",
				FeedError::Cancelled => "CANCELLED",
			};
			send_response(&out_tx, Response::error(request_id, code, e.to_string())).await;
		}
	});
}

/// Serialize a response onto the writer channel. Returns false when the
/// writer is gone.
async fn send_response(out_tx: &mpsc::Sender<Message>, response: Response) -> bool {
	let json = match serde_json::to_string(&response) {
		Ok(json) => json,
		Err(e) => {
			tracing::warn!("Failed to serialize response: {}", e);
			return true;
		}
	};
	out_tx.send(Message::text(json)).await.is_ok()
}

/// Writer task: the only owner of the socket sink.
async fn write_outbound(mut ws_tx: SplitSink<WebSocketStream<TcpStream>, Message>, mut out_rx: mpsc::Receiver<Message>) {
	while let Some(message) = out_rx.recv().await {
		if let Err(e) = ws_tx.send(message).await {
			tracing::debug!("Outbound write failed: {}", e);
			break;
		}
	}
	let _ = ws_tx.close().await;
}
