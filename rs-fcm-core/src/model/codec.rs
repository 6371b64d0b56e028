//! Binary persistence for trained models.
//!
//! Two formats live here:
//!
//! - The **interchange format**: a fixed little-endian layout that a
//!   scoring run writes and a later generation run reads back. All
//!   integer fields have explicit widths, so files are portable across
//!   platforms and word sizes:
//!
//!   ```text
//!   u64  number of contexts
//!   per context:
//!       u64  context byte length
//!       ...  context bytes
//!       u64  frequency entry count
//!       per entry:
//!           u8   symbol
//!           i32  count
//!   ```
//!
//!   Contexts and entries are written in sorted order, so equal models
//!   produce identical bytes.
//!
//! - The **snapshot cache**: a compact `postcard` image of the model
//!   kept beside the training text, used to skip retraining when the
//!   same input is scored again. Snapshots are an internal acceleration
//!   and make no portability promise; the interchange format is the one
//!   binary contract.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, info};

use crate::error::FcmError;
use crate::io::{build_output_path, read_bytes};
use super::context_model::ContextModel;
use super::frequency_table::FrequencyTable;

/// Serializes a model into the interchange layout.
///
/// Encoding cannot fail: the layout has no length limits beyond `u64`
/// and every field is written unconditionally.
pub fn encode(model: &ContextModel) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&(model.len() as u64).to_le_bytes());

	for context in model.contexts_sorted() {
		// contexts_sorted only yields keys present in the model
		let table = match model.table(context) {
			Some(table) => table,
			None => continue,
		};

		out.extend_from_slice(&(context.len() as u64).to_le_bytes());
		out.extend_from_slice(context);

		let entries = table.entries_sorted();
		out.extend_from_slice(&(entries.len() as u64).to_le_bytes());
		for (symbol, count) in entries {
			out.push(symbol);
			out.extend_from_slice(&(count as i32).to_le_bytes());
		}
	}

	debug!("encoded {} contexts into {} bytes", model.len(), out.len());
	out
}

/// Deserializes a model from the interchange layout.
///
/// The order `k` is inferred from the first decoded context. Decoding
/// performs structural validation only (truncation, negative counts);
/// reconciling the inferred order with a caller-supplied `k` is
/// [`ContextModel::ensure_order`]'s job.
///
/// # Errors
/// Returns [`FcmError::CorruptModel`] if the stream ends before an
/// expected field or a count is negative.
pub fn decode(bytes: &[u8]) -> Result<ContextModel, FcmError> {
	let mut cursor = Cursor::new(bytes);

	let context_count = cursor
		.read_u64::<LittleEndian>()
		.map_err(|_| FcmError::CorruptModel("truncated context count"))?;

	let mut k = 0;
	let mut contexts: HashMap<Vec<u8>, FrequencyTable> = HashMap::new();
	for i in 0..context_count {
		let context_len = cursor
			.read_u64::<LittleEndian>()
			.map_err(|_| FcmError::CorruptModel("truncated context length"))? as usize;

		let mut context = vec![0u8; context_len];
		cursor
			.read_exact(&mut context)
			.map_err(|_| FcmError::CorruptModel("truncated context bytes"))?;
		if i == 0 {
			k = context_len;
		}

		let entry_count = cursor
			.read_u64::<LittleEndian>()
			.map_err(|_| FcmError::CorruptModel("truncated entry count"))?;

		let mut table = FrequencyTable::new();
		for _ in 0..entry_count {
			let symbol = cursor
				.read_u8()
				.map_err(|_| FcmError::CorruptModel("truncated symbol"))?;
			let count = cursor
				.read_i32::<LittleEndian>()
				.map_err(|_| FcmError::CorruptModel("truncated count"))?;
			// encode never writes a negative count
			let count =
				u32::try_from(count).map_err(|_| FcmError::CorruptModel("negative count"))?;
			table.insert_raw(symbol, count);
		}
		contexts.insert(context, table);
	}

	Ok(ContextModel::from_parts(k, contexts))
}

/// Writes `model` to `path` in the interchange layout.
pub fn save_model<P: AsRef<Path>>(path: P, model: &ContextModel) -> Result<(), FcmError> {
	let bytes = encode(model);
	fs::write(&path, &bytes)?;
	info!(
		"saved model ({} contexts, {} bytes) to {}",
		model.len(),
		bytes.len(),
		path.as_ref().display()
	);
	Ok(())
}

/// Reads a model from `path` in the interchange layout.
///
/// # Errors
/// - [`FcmError::CorruptModel`] for a malformed file
/// - [`FcmError::EmptyModel`] for a well-formed file with zero contexts
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ContextModel, FcmError> {
	let model = decode(&read_bytes(&path)?)?;
	if model.is_empty() {
		return Err(FcmError::EmptyModel);
	}
	info!(
		"loaded model ({} contexts, order {}) from {}",
		model.len(),
		model.order(),
		path.as_ref().display()
	);
	Ok(model)
}

/// Trains a model from a text file, reusing a snapshot cache when one
/// exists.
///
/// The snapshot lives beside the input with a `bin` extension
/// (`corpus.txt` → `corpus.bin`). A snapshot trained with a different
/// order is ignored and rebuilt.
///
/// # Errors
/// - [`FcmError::InvalidOrder`] if the text cannot support order `k`
/// - [`FcmError::Io`] / [`FcmError::Snapshot`] for file failures
pub fn train_with_snapshot<P: AsRef<Path>>(text_path: P, k: usize) -> Result<ContextModel, FcmError> {
	let snapshot_path = build_output_path(&text_path, "bin")?;

	if snapshot_path.exists() {
		let model: ContextModel = postcard::from_bytes(&read_bytes(&snapshot_path)?)?;
		if model.order() == k {
			info!("reusing snapshot {}", snapshot_path.display());
			return Ok(model);
		}
		info!(
			"snapshot {} has order {}, retraining with order {}",
			snapshot_path.display(),
			model.order(),
			k
		);
	}

	let text = read_bytes(&text_path)?;
	let model = ContextModel::train(&text, k)?;

	let bytes = postcard::to_stdvec(&model)?;
	fs::write(&snapshot_path, bytes)?;

	Ok(model)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roundtrip_preserves_the_model() {
		let model = ContextModel::train(b"the rain in spain stays mainly in the plain", 3).unwrap();
		let decoded = decode(&encode(&model)).unwrap();
		assert_eq!(decoded, model);
		assert_eq!(decoded.order(), 3);
	}

	#[test]
	fn equal_models_encode_to_identical_bytes() {
		let text = b"deterministic bytes from sorted iteration";
		let a = ContextModel::train(text, 2).unwrap();
		let b = ContextModel::train(text, 2).unwrap();
		assert_eq!(encode(&a), encode(&b));
	}

	#[test]
	fn empty_stream_is_corrupt() {
		assert!(matches!(decode(&[]), Err(FcmError::CorruptModel(_))));
	}

	#[test]
	fn truncation_anywhere_is_corrupt() {
		let bytes = encode(&ContextModel::train(b"aaab", 1).unwrap());
		// Chop the stream at every possible point; everything short of
		// the full buffer must fail structurally.
		for cut in 0..bytes.len() {
			assert!(
				matches!(decode(&bytes[..cut]), Err(FcmError::CorruptModel(_))),
				"cut at {cut} decoded successfully"
			);
		}
	}

	#[test]
	fn negative_count_is_corrupt() {
		let mut bytes = encode(&ContextModel::train(b"aaab", 1).unwrap());
		// Layout for "aaab", k=1: one context "a" with entries
		// (a, 2), (b, 1); the first count starts after
		// 8 (context count) + 8 (context len) + 1 (context) + 8 (entries) + 1 (symbol).
		let count_offset = 8 + 8 + 1 + 8 + 1;
		bytes[count_offset..count_offset + 4].copy_from_slice(&(-5i32).to_le_bytes());
		assert!(matches!(
			decode(&bytes),
			Err(FcmError::CorruptModel("negative count"))
		));
	}

	#[test]
	fn decode_infers_order_from_first_context() {
		let model = ContextModel::train(b"abcdefgh", 4).unwrap();
		let decoded = decode(&encode(&model)).unwrap();
		assert_eq!(decoded.order(), 4);
		assert!(decoded.ensure_order(4).is_ok());
	}

	#[test]
	fn zero_context_stream_decodes_to_empty_model() {
		let decoded = decode(&0u64.to_le_bytes()).unwrap();
		assert!(decoded.is_empty());
	}
}
