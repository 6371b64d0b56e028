use log::debug;

use crate::error::FcmError;
use super::context_model::ContextModel;
use super::smoothing::{probability, Alphabet};

/// Computes the average information content of `text` under `model`, in
/// bits per symbol.
///
/// For every position `i` in `k..text.len()` the context is the `k`
/// bytes ending at `i - 1`:
///
/// - A context absent from the model contributes nothing; the position
///   is skipped, but the divisor stays `text.len() - k`. This matches
///   the long-established behavior of the format's producers and is
///   kept for compatibility, deliberately.
/// - A present context contributes `-log2(p)` with
///   `p = (count + alpha) / (total + alpha * |Σ|)`, where `count` is the
///   observations of `text[i]` after the context (0 if never seen),
///   `total` the context's full mass, and `|Σ|` the alphabet size of the
///   text being scored.
///
/// With `alpha == 0`, a symbol never observed after a known context has
/// probability zero and contributes an infinite number of bits; the
/// result is then `f64::INFINITY`, the honest answer for a model that
/// cannot code the text.
///
/// # Errors
/// - [`FcmError::EmptyModel`] if the model holds no contexts
/// - [`FcmError::InvalidOrder`] if `text` is not strictly longer than
///   the model order
pub fn average_information(
	model: &ContextModel,
	text: &[u8],
	alpha: f64,
) -> Result<f64, FcmError> {
	if model.is_empty() {
		return Err(FcmError::EmptyModel);
	}
	let k = model.order();
	if k == 0 || text.len() <= k {
		return Err(FcmError::InvalidOrder { k, text_len: text.len() });
	}

	let alphabet = Alphabet::of_text(text);

	let mut total_information = 0.0;
	let mut skipped = 0usize;
	for i in k..text.len() {
		let context = &text[i - k..i];
		let table = match model.table(context) {
			Some(table) => table,
			None => {
				skipped += 1;
				continue;
			}
		};

		let p = probability(table.count_of(text[i]), table.total(), alpha, alphabet.len());
		total_information += -p.log2();
	}

	if skipped > 0 {
		debug!("{skipped} positions had unseen contexts and were skipped");
	}

	Ok(total_information / (text.len() - k) as f64)
}
