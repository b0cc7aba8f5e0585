// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Subsystem API crate providing common interfaces for streamfeed subsystems
//!
//! This crate contains the lifecycle trait and health types that all
//! server subsystems implement and the server binary drives.

pub mod subsystem;

pub use subsystem::{HealthStatus, Subsystem};
