// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Lifecycle contract for server subsystems.

use async_trait::async_trait;

/// Health of a subsystem, as reported to operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
	Healthy,
	Warning { description: String },
	Failed { description: String },
}

/// A long-running server component with explicit lifecycle management.
///
/// `start` must be idempotent; `shutdown` must drain in-flight work and
/// be safe to call on a subsystem that never started.
#[async_trait]
pub trait Subsystem: Send {
	/// Short name used in logs.
	fn name(&self) -> &'static str;

	/// Bind and begin serving.
	async fn start(&mut self) -> std::io::Result<()>;

	/// Stop accepting work and drain what is in flight.
	async fn shutdown(&mut self) -> std::io::Result<()>;

	fn is_running(&self) -> bool;

	fn health_status(&self) -> HealthStatus;
}
