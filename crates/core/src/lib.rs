// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Core feed engine for streamfeed.
//!
//! This crate holds everything with real concurrency and lifecycle
//! semantics: the incremental batch producer, the per-connection
//! cancellation-scope registry, and the two delivery adapters (push and
//! pull) that consume the producer under different completion policies.
//! It has no transport dependencies; HTTP and WebSocket wiring live in
//! the `sub-server-*` crates.
//!
//! # Overview
//!
//! - [`Feed`] answers cursor queries slowly and incrementally, one paced
//!   [`Batch`] at a time, observing a [`CancelSignal`].
//! - [`ScopeRegistry`] derives a revocable cancellation signal from
//!   connection open/close/reconnect events.
//! - [`push::stream_to`] forwards batches to one connection until its
//!   scope fires; [`pull::fetch`] accumulates a bounded, exactly-sized
//!   result for one request.

pub mod cancel;
pub mod error;
pub mod feed;
pub mod item;
pub mod pull;
pub mod push;
pub mod registry;

pub use cancel::{CancelSignal, CancelSource};
pub use error::FeedError;
pub use feed::{BatchStream, Feed, FeedConfig};
pub use item::{Batch, Item};
pub use pull::fetch;
pub use push::stream_to;
pub use registry::{ConnectionId, ScopeRegistry};
