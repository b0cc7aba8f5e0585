// Copyright (c) streamfeed.dev 2025
// This file is licensed under the AGPL-3.0-or-later

//! Data shapes flowing through the feed.

use serde::{Deserialize, Serialize};

/// A single feed item.
///
/// Identity is the cursor position: ids are unique and strictly
/// increasing within one cursor walk. Items are never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
	pub id: u64,
	pub payload: String,
}

/// One production step's worth of ordered items.
///
/// Batches are never reordered or merged by the core; each delivered
/// batch corresponds to exactly one production step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
	pub items: Vec<Item>,
}

impl Batch {
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// The highest id in this batch, if any. Clients resume an
	/// interrupted walk from this id + 1.
	pub fn last_id(&self) -> Option<u64> {
		self.items.last().map(|item| item.id)
	}

	pub fn into_items(self) -> Vec<Item> {
		self.items
	}
}
