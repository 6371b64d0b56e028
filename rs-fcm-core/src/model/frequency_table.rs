use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Follower counts for a single context.
///
/// A `FrequencyTable` stores, for one fixed context, how many times each
/// symbol was observed immediately after that context in the training
/// data.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate follower occurrences during training
/// - Expose per-symbol counts and the total mass for smoothing
///
/// ## Invariants
/// - Counts only grow during training; the table is read-only afterwards
/// - Every stored count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
	/// Follower occurrences indexed by the next symbol.
	/// Example: { b'e' => 42, b'a' => 3 }
	counts: HashMap<u8, u32>,
}

impl FrequencyTable {
	/// Creates a new empty table.
	pub fn new() -> Self {
		Self { counts: HashMap::new() }
	}

	/// Records an occurrence of `symbol` following this table's context.
	///
	/// - If the symbol was already observed, its count is increased.
	/// - Otherwise, a new entry is created with an initial count of 1.
	pub fn record(&mut self, symbol: u8) {
		*self.counts.entry(symbol).or_insert(0) += 1;
	}

	/// Returns the observed count for `symbol`, or 0 if it never
	/// followed this context.
	pub fn count_of(&self, symbol: u8) -> u32 {
		self.counts.get(&symbol).copied().unwrap_or(0)
	}

	/// Returns the total number of observations in this table.
	pub fn total(&self) -> u32 {
		self.counts.values().sum()
	}

	/// Returns the number of distinct follower symbols.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Returns `true` if no follower was ever recorded.
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over the distinct follower symbols, in no particular order.
	pub fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
		self.counts.keys().copied()
	}

	/// Returns all entries sorted by symbol.
	///
	/// Sorted iteration keeps the binary encoding deterministic.
	pub(crate) fn entries_sorted(&self) -> Vec<(u8, u32)> {
		let mut entries: Vec<(u8, u32)> = self.counts.iter().map(|(&s, &c)| (s, c)).collect();
		entries.sort_unstable_by_key(|&(s, _)| s);
		entries
	}

	/// Inserts a decoded entry directly.
	///
	/// Only the codec uses this; training always goes through [`record`].
	///
	/// [`record`]: FrequencyTable::record
	pub(crate) fn insert_raw(&mut self, symbol: u8, count: u32) {
		self.counts.insert(symbol, count);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn record_accumulates_counts() {
		let mut table = FrequencyTable::new();
		table.record(b'a');
		table.record(b'a');
		table.record(b'b');

		assert_eq!(table.count_of(b'a'), 2);
		assert_eq!(table.count_of(b'b'), 1);
		assert_eq!(table.count_of(b'z'), 0);
		assert_eq!(table.total(), 3);
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn sorted_entries_are_ordered_by_symbol() {
		let mut table = FrequencyTable::new();
		table.record(b'z');
		table.record(b'a');
		table.record(b'm');

		let entries = table.entries_sorted();
		assert_eq!(entries, vec![(b'a', 1), (b'm', 1), (b'z', 1)]);
	}
}
