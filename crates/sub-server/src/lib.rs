// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Shared server state and configuration for the streamfeed transport
//! subsystems.

pub mod config;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;
