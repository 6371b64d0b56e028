use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::FcmError;
use super::frequency_table::FrequencyTable;

/// Represents an order-k finite-context model over bytes.
///
/// The `ContextModel` stores a [`FrequencyTable`] for every length-`k`
/// byte sequence observed in the training text, and allows read-only
/// lookup of the follower distribution of a context.
///
/// # Responsibilities
/// - Build the context table from a single training pass over a text
/// - Accumulate follower counts for each context
/// - Validate that a loaded model matches a caller-supplied order
/// - Expose read-only lookup for the scorer and the generator
///
/// # Invariants
/// - Every context key has length exactly `k`
/// - `k` is fixed at construction and never changes
/// - Counts only grow during training; once built or loaded, the model
///   is never mutated again
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContextModel {
	/// The order of the model (context length in bytes)
	k: usize,

	/// Mapping from a length-`k` context to its follower counts
	contexts: HashMap<Vec<u8>, FrequencyTable>,
}

impl ContextModel {
	/// Trains a model of order `k` from a single pass over `text`.
	///
	/// For every position `i` in `k..text.len()`, the context is the `k`
	/// bytes ending at `i - 1` and the count of `text[i]` in that
	/// context's table is incremented. The pass produces exactly
	/// `text.len() - k` increments and is fully deterministic.
	///
	/// # Errors
	/// Returns [`FcmError::InvalidOrder`] if `k == 0` or if the text is
	/// not strictly longer than `k`.
	pub fn train(text: &[u8], k: usize) -> Result<Self, FcmError> {
		if k == 0 || text.len() <= k {
			return Err(FcmError::InvalidOrder { k, text_len: text.len() });
		}

		let mut contexts: HashMap<Vec<u8>, FrequencyTable> = HashMap::new();
		for i in k..text.len() {
			// Get or create the table for the window ending at i - 1
			let context = text[i - k..i].to_vec();
			contexts.entry(context).or_default().record(text[i]);
		}

		debug!(
			"trained order-{} model: {} contexts from {} bytes",
			k,
			contexts.len(),
			text.len()
		);
		Ok(Self { k, contexts })
	}

	/// Rebuilds a model from decoded parts.
	///
	/// The codec infers `k` from the decoded stream and performs no
	/// per-context length validation; callers holding an expected order
	/// must follow up with [`ensure_order`].
	///
	/// [`ensure_order`]: ContextModel::ensure_order
	pub(crate) fn from_parts(k: usize, contexts: HashMap<Vec<u8>, FrequencyTable>) -> Self {
		Self { k, contexts }
	}

	/// Returns the model order `k`.
	pub fn order(&self) -> usize {
		self.k
	}

	/// Returns the number of distinct contexts.
	pub fn len(&self) -> usize {
		self.contexts.len()
	}

	/// Returns `true` if the model holds no contexts.
	pub fn is_empty(&self) -> bool {
		self.contexts.is_empty()
	}

	/// Returns the follower table of `context`, if it was ever observed.
	pub fn table(&self, context: &[u8]) -> Option<&FrequencyTable> {
		self.contexts.get(context)
	}

	/// Returns `true` if `context` was observed during training.
	pub fn contains(&self, context: &[u8]) -> bool {
		self.contexts.contains_key(context)
	}

	/// Checks that every context in the model has length `k`.
	///
	/// Loaded models carry their order implicitly in the key lengths;
	/// this is the validation step that reconciles them with the order
	/// supplied by the caller.
	///
	/// # Errors
	/// Returns [`FcmError::OrderMismatch`] on the first disagreeing
	/// context.
	pub fn ensure_order(&self, k: usize) -> Result<(), FcmError> {
		for context in self.contexts.keys() {
			if context.len() != k {
				return Err(FcmError::OrderMismatch { expected: k, found: context.len() });
			}
		}
		Ok(())
	}

	/// Iterates over all contexts and their follower tables, in no
	/// particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &FrequencyTable)> {
		self.contexts.iter()
	}

	/// Returns all contexts sorted bytewise.
	///
	/// The codec and the backoff resolver need a reproducible scan
	/// order; hash-map iteration order is not one.
	pub(crate) fn contexts_sorted(&self) -> Vec<&Vec<u8>> {
		let mut keys: Vec<&Vec<u8>> = self.contexts.keys().collect();
		keys.sort_unstable();
		keys
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn train_counts_every_window() {
		// "aaab", k = 1: followers of "a" are a, a, b; nothing follows "b".
		let model = ContextModel::train(b"aaab", 1).unwrap();

		assert_eq!(model.order(), 1);
		assert_eq!(model.len(), 1);
		let table = model.table(b"a").unwrap();
		assert_eq!(table.count_of(b'a'), 2);
		assert_eq!(table.count_of(b'b'), 1);
		assert!(model.table(b"b").is_none());
	}

	#[test]
	fn train_produces_len_minus_k_increments() {
		let text = b"abracadabra";
		let k = 2;
		let model = ContextModel::train(text, k).unwrap();

		let total: u32 = model.iter().map(|(_, table)| table.total()).sum();
		assert_eq!(total as usize, text.len() - k);
	}

	#[test]
	fn train_is_deterministic() {
		let text = b"the quick brown fox jumps over the lazy dog";
		let a = ContextModel::train(text, 3).unwrap();
		let b = ContextModel::train(text, 3).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn train_rejects_invalid_order() {
		assert!(matches!(
			ContextModel::train(b"abc", 0),
			Err(FcmError::InvalidOrder { .. })
		));
		assert!(matches!(
			ContextModel::train(b"abc", 3),
			Err(FcmError::InvalidOrder { .. })
		));
		assert!(matches!(
			ContextModel::train(b"", 1),
			Err(FcmError::InvalidOrder { .. })
		));
	}

	#[test]
	fn ensure_order_accepts_trained_order_only() {
		let model = ContextModel::train(b"abcabc", 2).unwrap();
		assert!(model.ensure_order(2).is_ok());
		assert!(matches!(
			model.ensure_order(3),
			Err(FcmError::OrderMismatch { expected: 3, found: 2 })
		));
	}
}
