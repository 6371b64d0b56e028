use thiserror::Error;

/// Failures reported by the modeling core.
///
/// All conditions are detected eagerly, before the main algorithm of an
/// operation runs. The one deliberate non-error is the scorer skipping a
/// context it has never seen; that behavior is documented on
/// [`crate::model::scorer::average_information`].
#[derive(Debug, Error)]
pub enum FcmError {
	/// The order is zero or the text is too short to produce a single
	/// context window.
	#[error("invalid order: k = {k} with text length {text_len} (need k >= 1 and text length > k)")]
	InvalidOrder { k: usize, text_len: usize },

	/// The generation prior is shorter than the model order.
	#[error("prior too short: {actual} symbols, need at least {required}")]
	InsufficientPrior { required: usize, actual: usize },

	/// A persisted model could not be decoded.
	#[error("corrupt model: {0}")]
	CorruptModel(&'static str),

	/// The caller-supplied order disagrees with the context length found
	/// in a loaded model.
	#[error("order mismatch: expected k = {expected}, model contexts have length {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// The model holds no contexts; scoring and generation are meaningless.
	#[error("model has no contexts")]
	EmptyModel,

	/// Propagated file I/O failure.
	#[error("i/o failure: {0}")]
	Io(#[from] std::io::Error),

	/// The snapshot cache could not be read or written.
	#[error("snapshot failure: {0}")]
	Snapshot(#[from] postcard::Error),
}
