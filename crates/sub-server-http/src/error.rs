// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! HTTP error handling and response formatting.
//!
//! This module provides error types that implement Axum's
//! `IntoResponse` trait for consistent error responses across all HTTP
//! endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use streamfeed_core::FeedError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	/// Human-readable error message.
	pub error: String,
	/// Machine-readable error code.
	pub code: String,
}

impl ErrorResponse {
	pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			error: error.into(),
		}
	}
}

/// Application error type that converts to HTTP responses.
#[derive(Debug)]
pub enum AppError {
	/// The fetch was cancelled before completing (request budget
	/// exhausted). No partial data is returned.
	Cancelled,
	/// The request carried a malformed starting cursor.
	InvalidCursor(i64),
	/// Request parsing error.
	BadRequest(String),
}

impl From<FeedError> for AppError {
	fn from(e: FeedError) -> Self {
		match e {
			FeedError::Cancelled => AppError::Cancelled,
			FeedError::InvalidCursor(id) => AppError::InvalidCursor(id),
		}
	}
}

impl std::fmt::Display for AppError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			AppError::Cancelled => write!(f, "Fetch cancelled"),
			AppError::InvalidCursor(id) => write!(f, "Invalid cursor: {}", id),
			AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
		}
	}
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let (status, code, message) = match &self {
			AppError::Cancelled => {
				(StatusCode::GATEWAY_TIMEOUT, "FEED_CANCELLED", "Fetch cancelled before completion".to_string())
			}
			AppError::InvalidCursor(id) => {
				(StatusCode::BAD_REQUEST, "INVALID_CURSOR", format!("Invalid starting cursor: {}", id))
			}
			AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
		};

		let body = Json(ErrorResponse::new(code, message));
		(status, body).into_response()
	}
}
