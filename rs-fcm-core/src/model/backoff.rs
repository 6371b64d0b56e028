use log::debug;
use rand::Rng;

use super::context_model::ContextModel;

/// Computes the Levenshtein distance between two byte strings.
///
/// Minimum number of single-byte insertions, deletions and
/// substitutions transforming `a` into `b`, via the standard
/// dynamic-programming recurrence with a two-row rolling buffer.
pub fn levenshtein(a: &[u8], b: &[u8]) -> usize {
	if a.is_empty() {
		return b.len();
	}
	if b.is_empty() {
		return a.len();
	}

	let mut previous: Vec<usize> = (0..=b.len()).collect();
	let mut current = vec![0usize; b.len() + 1];

	for (i, &byte_a) in a.iter().enumerate() {
		current[0] = i + 1;
		for (j, &byte_b) in b.iter().enumerate() {
			let substitution_cost = usize::from(byte_a != byte_b);
			current[j + 1] = (previous[j + 1] + 1)
				.min(current[j] + 1)
				.min(previous[j] + substitution_cost);
		}
		std::mem::swap(&mut previous, &mut current);
	}

	previous[b.len()]
}

/// Finds a substitute for a context absent from the model.
///
/// Every context in the model is scored by its edit distance to
/// `target`, and the set of contexts achieving the minimum distance is
/// collected. A single winner is returned directly; ties are broken by
/// a random draw weighted by each candidate's total observed frequency,
/// so contexts with more training mass win more often and zero-mass
/// candidates are never drawn while a weighted one exists.
///
/// The model scan is done in sorted context order, which makes the tie
/// set, and therefore the draw, reproducible under a seeded RNG.
///
/// This is the expensive path of generation: O(contexts × k²) per call.
///
/// # Panics
/// Must not be called with an empty model; the generator guards this.
pub fn resolve<R: Rng>(model: &ContextModel, target: &[u8], rng: &mut R) -> Vec<u8> {
	debug_assert!(!model.is_empty(), "resolve called on an empty model");

	let mut best_distance = usize::MAX;
	let mut candidates: Vec<&Vec<u8>> = Vec::new();

	for context in model.contexts_sorted() {
		let distance = levenshtein(target, context);
		if distance < best_distance {
			best_distance = distance;
			candidates.clear();
			candidates.push(context);
		} else if distance == best_distance {
			candidates.push(context);
		}
	}

	debug!(
		"backoff: {} candidates at distance {} for a length-{} context",
		candidates.len(),
		best_distance,
		target.len()
	);

	if candidates.len() == 1 {
		return candidates[0].clone();
	}

	// Weighted tie break over the candidates' observation mass.
	let weights: Vec<u64> = candidates
		.iter()
		.map(|context| {
			model
				.table(context)
				.map(|table| u64::from(table.total()))
				.unwrap_or(0)
		})
		.collect();
	let total_weight: u64 = weights.iter().sum();

	if total_weight == 0 {
		// Trained contexts always carry mass; only a hand-crafted or
		// damaged model file can get here.
		debug_assert!(false, "all tied backoff candidates have zero mass");
		return candidates[0].clone();
	}

	let mut remaining = rng.random_range(0..total_weight);
	for (context, &weight) in candidates.iter().zip(&weights) {
		if remaining < weight {
			return (*context).clone();
		}
		remaining -= weight;
	}

	// Unreachable: the draw is strictly below the summed weights.
	candidates[candidates.len() - 1].clone()
}
